pub mod health;
pub mod swagger;
pub mod users;

use actix_web::web;

/// Registers the users routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            // Must stay ahead of "/{id}"
            .route("/search", web::get().to(users::search_users))
            .route("/{id}", web::put().to(users::upsert_user))
            .route("/{id}", web::delete().to(users::delete_user)),
    );
}

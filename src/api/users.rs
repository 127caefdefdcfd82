use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use crate::{
    models::{
        messages, parse_user_id, render_user, CreatedResponse, MessageResponse, UpsertOutcome,
        UserFields, UserSearchQuery,
    },
    services::UserStore,
};

fn invalid_id(raw: &str) -> HttpResponse {
    log::warn!("⚠️ Invalid user id: {}", raw);
    HttpResponse::BadRequest().json(MessageResponse::new(messages::INVALID_ID))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every stored user document, `_id` as hex"),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn list_users(store: web::Data<dyn UserStore>) -> HttpResponse {
    log::info!("📋 GET /users - Listing all users");

    match store.list().await {
        Ok(users) => {
            log::info!("✅ Users retrieved: {}", users.len());
            let body: Vec<serde_json::Value> = users.into_iter().map(render_user).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            log::error!("❌ Failed to list users: {}", e);
            HttpResponse::InternalServerError().json(MessageResponse::new(messages::LIST_FAILED))
        }
    }
}

#[utoipa::path(
    get,
    path = "/users/search",
    tag = "Users",
    params(
        ("first_name" = Option<String>, Query, description = "Exact first name"),
        ("last_name" = Option<String>, Query, description = "Exact last name"),
        ("email" = Option<String>, Query, description = "Exact email")
    ),
    responses(
        (status = 200, description = "Matching user documents, `_id` as hex"),
        (status = 404, description = "No user matched", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn search_users(
    store: web::Data<dyn UserStore>,
    query: web::Query<UserSearchQuery>,
) -> HttpResponse {
    log::info!("🔍 GET /users/search - {:?}", query.constraints());

    match store.search(&query).await {
        Ok(users) if users.is_empty() => {
            log::info!("⚠️ No users matched");
            HttpResponse::NotFound().json(MessageResponse::new(messages::SEARCH_EMPTY))
        }
        Ok(users) => {
            log::info!("✅ Found {} users", users.len());
            let body: Vec<serde_json::Value> = users.into_iter().map(render_user).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            log::error!("❌ Failed to search users: {}", e);
            HttpResponse::InternalServerError().json(MessageResponse::new(messages::SEARCH_FAILED))
        }
    }
}

/// PUT /users/{id} - Replaces the seven user fields, creating the document when missing
///
/// The id is checked before the body is looked at. A missing body, or one not
/// sent as JSON, writes all seven fields as null.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "24-char hex ObjectId")
    ),
    request_body = UserFields,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Invalid id or body", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn upsert_user(
    req: HttpRequest,
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let raw_id = path.into_inner();
    let id = match parse_user_id(&raw_id) {
        Ok(id) => id,
        Err(_) => return invalid_id(&raw_id),
    };

    let fields = match UserFields::from_body(req.content_type(), &body) {
        Ok(fields) => fields,
        Err(e) => {
            log::warn!("⚠️ Rejected body for user {}: {}", id, e);
            return HttpResponse::BadRequest().json(MessageResponse::new(messages::INVALID_BODY));
        }
    };

    log::info!("📝 PUT /users/{} - Upserting user", id);

    match store.upsert(id, fields).await {
        Ok(UpsertOutcome::Updated) => {
            log::info!("✅ User {} updated", id);
            HttpResponse::Ok().json(MessageResponse::new(messages::UPDATED))
        }
        Ok(UpsertOutcome::Created(new_id)) => {
            log::info!("✅ User {} created", new_id);
            HttpResponse::Created().json(CreatedResponse {
                message: messages::CREATED.to_string(),
                new_user: new_id.to_hex(),
            })
        }
        Err(e) => {
            log::error!("❌ Failed to upsert user {}: {}", id, e);
            HttpResponse::InternalServerError().json(MessageResponse::new(messages::UPSERT_FAILED))
        }
    }
}

/// DELETE /users/{id}
///
/// A missing user answers `204` with a `{ message }` body for compatibility with
/// existing clients; HTTP/1.1 encoders drop the body of a 204 on the wire.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "24-char hex ObjectId")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 204, description = "No user with that id"),
        (status = 400, description = "Invalid id", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn delete_user(store: web::Data<dyn UserStore>, path: web::Path<String>) -> HttpResponse {
    let raw_id = path.into_inner();
    let id = match parse_user_id(&raw_id) {
        Ok(id) => id,
        Err(_) => return invalid_id(&raw_id),
    };

    log::info!("🗑️ DELETE /users/{}", id);

    match store.delete(id).await {
        Ok(0) => {
            log::info!("⚠️ User {} not found", id);
            HttpResponse::NoContent().json(MessageResponse::new(messages::DELETE_NOT_FOUND))
        }
        Ok(_) => {
            log::info!("✅ User {} deleted", id);
            HttpResponse::Ok().json(MessageResponse::new(messages::DELETED))
        }
        Err(e) => {
            log::error!("❌ Failed to delete user {}: {}", id, e);
            HttpResponse::InternalServerError().json(MessageResponse::new(messages::DELETE_FAILED))
        }
    }
}

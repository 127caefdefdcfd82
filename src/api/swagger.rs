use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "CRUD-style API over the `users` collection.\n\n**Features:**\n- List and search users\n- Upsert a user by ObjectId\n- Delete a user by ObjectId\n- Health monitoring"
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::search_users,
        crate::api::users::upsert_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::UserFields,
            crate::models::MessageResponse,
            crate::models::CreatedResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User documents. Ids are 24-char hex MongoDB ObjectIds."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;

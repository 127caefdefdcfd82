use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use crate::services::UserStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    /// "up" when the store answers a ping, "down" otherwise
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn UserStore>) -> impl Responder {
    let (status, database) = match store.ping().await {
        Ok(()) => ("healthy", "up"),
        Err(e) => {
            log::warn!("⚠️ Health check: store unreachable: {}", e);
            ("degraded", "down")
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database: database.to_string(),
    };

    if database == "up" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FailingUserStore, MemoryUserStore};
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_store_state() {
        let up: Arc<dyn UserStore> = Arc::new(MemoryUserStore::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(up))
                .route("/health", web::get().to(health_check)),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: HealthResponse = test::read_body_json(resp).await;
        assert_eq!(body.database, "up");
        assert_eq!(body.service, "users-service");

        let down: Arc<dyn UserStore> = Arc::new(FailingUserStore);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(down))
                .route("/health", web::get().to(health_check)),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

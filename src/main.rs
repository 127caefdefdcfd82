use actix_cors::Cors;
use actix_web::{
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
use std::io;
use std::sync::Arc;
use users_service::{
    api,
    config::Settings,
    database::MongoDB,
    services::{MongoUserStore, UserStore},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Users Service...");
    log::info!("📊 Database: {} ({})", settings.mongodb_uri, settings.database);

    // Refuse to start without a reachable store
    let db = MongoDB::new(&settings.mongodb_uri, &settings.database)
        .await
        .map_err(|e| {
            log::error!("❌ Error al conectar a MongoDB: {}", e);
            io::Error::new(io::ErrorKind::Other, e.to_string())
        })?;

    log::info!("✅ Conectado a MongoDB");

    let store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(db, &settings.collection));
    let store_data = web::Data::from(store);
    let allowed_origins = settings.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        if allowed_origins.is_empty() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Users
            .configure(api::configure)
    })
    .bind(settings.bind_address())?;

    log::info!("🌐 Servidor escuchando en http://localhost:{}", settings.port);
    log::info!("📚 Swagger UI available at: http://localhost:{}/swagger-ui/", settings.port);

    server.run().await
}

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use cuadrillas_api::database::{
    init_database,
    repositories::{
        CuadrillaRepository, MensajeRepository, RegistroReclamoRepository, RolRepository,
    },
};
use cuadrillas_api::handlers::shared::{json_config, path_config, query_config};
use cuadrillas_api::middleware::RequestId;
use cuadrillas_api::routes;
use cuadrillas_api::{AppState, Config, HttpComplaintsClient};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Cuadrillas API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting cuadrillas API server...");

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );
    if !config.is_production() {
        log::warn!("Running outside production; development defaults may be in use");
    }

    let pool = init_database(&config.database_url, config.database_max_connections).await?;
    log::info!("Database initialized");

    let complaints = HttpComplaintsClient::from_config(&config)?;
    log::info!("Complaints service at {}", complaints.base_url());

    let app_state = web::Data::new(AppState::new(
        Arc::new(CuadrillaRepository::new(pool.clone())),
        Arc::new(RegistroReclamoRepository::new(pool.clone())),
        Arc::new(MensajeRepository::new(pool.clone())),
        Arc::new(RolRepository::new(pool)),
        Arc::new(complaints),
    ));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(app_state.clone())
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.cors_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

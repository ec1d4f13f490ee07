use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use clinical_api::{config::Config, db, routes, telemetry, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = Config::from_env().expect("Failed to load configuration from environment");
    config
        .validate()
        .expect("Configuration failed startup validation");

    tracing::info!(
        "Starting clinical-api v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server_host,
        config.server_port
    );

    let pool = db::create_pool(&config.database_url, 5)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database connection pool initialized");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let state = AppState::new(config.clone(), pool);

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}

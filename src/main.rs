use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod engine;
mod error;
mod export;
mod gateway;
mod model;
mod models;
mod routes;


use auth::credentials::{ConfiguredCredentials, CredentialStore};
use config::Config;
use db::init_db;
use engine::AttendanceService;
use gateway::mysql::MySqlGateway;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // `bodega hash-password <password>` prints the PHC string for *_PASSWORD_HASH
    let args: Vec<String> = std::env::args().collect();
    if let [_, command, password] = args.as_slice() {
        if command == "hash-password" {
            let hashed = auth::password::hash_password(password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
            println!("{hashed}");
            return Ok(());
        }
    }

    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let service = Data::new(AttendanceService::new(
        Arc::new(MySqlGateway::new(pool)),
        config.day_boundary,
        config.catalog.clone(),
    ));
    let credentials: Data<dyn CredentialStore> = Data::from(
        Arc::new(ConfiguredCredentials::from_config(&config)) as Arc<dyn CredentialStore>,
    );
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .app_data(credentials.clone())
            .app_data(config_data.clone())
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config_data))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}

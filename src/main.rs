use actix_web::{web, HttpServer};
use std::sync::Arc;

use blogforge::config::Config;
use blogforge::store::{MemoryStore, PgStore};
use blogforge::{create_app, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let state = if config.uses_memory_store() {
        log::warn!("DATABASE_URL=memory: data lives in this process only");
        AppState::new(Arc::new(MemoryStore::new()), &config)
    } else {
        let store = PgStore::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(|e| {
                log::error!("Failed to connect to database: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;
        AppState::new(Arc::new(store), &config)
    };
    let state = web::Data::new(state);

    log::info!("Starting blogforge server at {}", config.server_url());
    HttpServer::new(move || create_app(state.clone()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await
}

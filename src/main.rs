use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!(
        "Starting Sheets Link in {:?} mode",
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to connect to the database: {e}");
            process::exit(1);
        }
    };

    let service_state = AppState::new(config, &db);

    // Missing Google or identity settings stop startup rather than failing every request.
    let app_state = match web::AppState::new(&service_state) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        process::exit(1);
    }
}

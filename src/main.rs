use std::time::Duration;

use tracing::{error, info, warn};

use files_manager::{build_services, Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = files_manager::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        files_manager::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Files Manager starting");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database at {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };

    let services = build_services(&config, db);

    let server = match WebServer::new(&config.server, services.state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server failed: {}", e);
    }

    // The server owned the last queue handle; let workers drain.
    if tokio::time::timeout(Duration::from_secs(10), services.workers.join())
        .await
        .is_err()
    {
        warn!("Thumbnail workers did not stop in time");
    }

    info!("Files Manager stopped");
}

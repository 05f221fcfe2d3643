//! Vibe Videos shell binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vibevid_api::{ApiClient, ApiConfig};
use vibevid_app::Shell;
use vibevid_session::SessionStore;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vibevid=info".parse().expect("static directive parses"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vibevid shell");

    let config = ApiConfig::from_env();
    info!("API config: base_url={}", config.base_url);

    let api = match ApiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    let store = SessionStore::from_env();
    let shell = Shell::new(api, store);

    if let Err(e) = shell.run().await {
        error!("Shell exited with error: {}", e);
        std::process::exit(1);
    }
}

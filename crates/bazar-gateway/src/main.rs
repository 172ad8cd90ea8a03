//! Bazar Edge Gateway — the single authenticated ingress.

use tracing_subscriber::{EnvFilter, fmt};

use bazar_gateway::config::GatewayAppConfig;

#[tokio::main]
async fn main() {
    let env = std::env::var("BAZAR_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match GatewayAppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match config.logging.format.as_str() {
        "json" => fmt().json().with_env_filter(filter).with_target(true).init(),
        _ => fmt().pretty().with_env_filter(filter).with_target(true).init(),
    }

    if let Err(e) = bazar_gateway::server::run(config).await {
        tracing::error!("Gateway error: {e}");
        std::process::exit(1);
    }
}

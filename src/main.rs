use std::sync::{Arc, Mutex};

use relaycast::config::load_config;
use relaycast::relay::Relay;
use relaycast::transport::websocket::start_websocket_server;
use relaycast::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.log.level);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let relay = Arc::new(Mutex::new(Relay::new()));

    tokio::select! {
        _ = start_websocket_server(&addr, relay) => {
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}

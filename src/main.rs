//! flipflop-auth - Entry Point
//!
//! A small credential registration and login service speaking a
//! line-based protocol over TCP.

use log::info;

use flipflop_auth::Server;
use flipflop_auth::config::ServerConfig;
use flipflop_auth::error::ServerError;
use flipflop_auth::error::handlers::handle_error;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching flipflop-auth...");

    let server = match load_and_bind().await {
        Ok(server) => server,
        Err(e) => {
            handle_error(&e);
            std::process::exit(1);
        }
    };

    server.start().await;
}

async fn load_and_bind() -> Result<Server, ServerError> {
    let config = ServerConfig::load()?;
    Server::bind(config).await
}

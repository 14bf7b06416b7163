//! Application configuration loading.

use tracing::info;

/// Load configuration from `.env` and environment variables, then apply
/// command-line overrides for the listen address.
pub fn load_config(host: Option<String>, port: Option<u16>) -> distboard_core::Config {
    distboard_core::config::load_dotenv();
    let mut config = distboard_core::Config::from_env();

    if let Some(host) = host {
        info!("Overriding host from command line: {}", host);
        config.server.host = host;
    }
    if let Some(port) = port {
        info!("Overriding port from command line: {}", port);
        config.server.port = port;
    }
    config
}

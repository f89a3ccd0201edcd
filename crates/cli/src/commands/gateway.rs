//! `ecochat gateway` — Start the HTTP API server.

use ecochat_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    tracing::debug!(?config, "Configuration loaded");

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🌱 EcoChat Gateway");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Provider:  {}", config.provider);
    println!("   Debug:     http://{}:{}/debug", config.gateway.host, config.gateway.port);

    ecochat_gateway::start(config).await?;

    Ok(())
}

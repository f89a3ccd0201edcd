//! `ecochat status` — Show configuration and credential status.

use ecochat_config::{AppConfig, ProviderKind};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌱 EcoChat Status");
    println!("=================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    if let Some(model) = config
        .providers
        .get(config.provider)
        .and_then(|p| p.model.as_deref())
        .or(config.provider.default_model())
    {
        println!("  Model:        {model}");
    }
    println!("  Retention:    {} turns", config.session.retention_window);
    println!("  Timeout:      {}s", config.providers.request_timeout_secs);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Environment:  {}", config.environment);
    println!();

    for kind in ProviderKind::ALL {
        if let Some(var) = kind.credential_var() {
            let mark = if config.has_credential(kind) { "✅" } else { "—" };
            println!("  {mark} {var}");
        }
    }

    if config.provider.is_network() && !config.has_credential(config.provider) {
        println!();
        println!(
            "  ⚠️  {} is selected but {} is not set; /send will answer 400",
            config.provider,
            config.provider.credential_var().unwrap_or("its API key")
        );
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ℹ️  No config file, using defaults and environment");
    }

    Ok(())
}

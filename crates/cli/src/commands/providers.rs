//! `ecochat providers` — List provider selections.

use ecochat_config::ProviderKind;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🤖 Provider Selections");
    println!("======================");
    println!();
    println!("  ┌─────────────┬────────────────────────────────┬────────────────┐");
    println!("  │ Selection   │ Endpoint                       │ Credential     │");
    println!("  ├─────────────┼────────────────────────────────┼────────────────┤");
    for kind in ProviderKind::ALL {
        println!("  │ {:<11} │ {:<30} │ {:<14} │", kind.as_str(), endpoint(kind), credential(kind));
    }
    println!("  └─────────────┴────────────────────────────────┴────────────────┘");
    println!();
    println!("  Select with API_CHOICE (or ECOCHAT_PROVIDER), or in config.toml:");
    println!("    provider = \"GROQ\"");
    println!("    [providers.groq]");
    println!("    api_key = \"gsk_...\"");

    Ok(())
}

fn endpoint(kind: ProviderKind) -> &'static str {
    match kind.default_base_url() {
        Some(url) => url.trim_start_matches("https://"),
        None => "offline fallback responder",
    }
}

fn credential(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Groq | ProviderKind::OpenAi => kind.credential_var().unwrap_or("-"),
        _ => "none",
    }
}

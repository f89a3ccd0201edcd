//! `ecochat chat` — Interactive or single-message chat, without the gateway.

use ecochat_agent::{ChatError, ChatOrchestrator, session_or_default};
use ecochat_config::AppConfig;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    tracing::debug!(?config, "Configuration loaded");

    let orchestrator = ChatOrchestrator::from_config(&config);
    let session_id = session_or_default(session.as_deref()).to_string();

    if let Err(e) = orchestrator.router().ensure_ready() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set the key in your environment, pick another provider with");
        eprintln!("  API_CHOICE=MOCK, or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err(e.to_string().into());
    }

    if let Some(msg) = message {
        let reply = orchestrator.handle_turn(&session_id, &msg).await?;
        println!("{}", reply.reply);
        return Ok(());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        🌱 EcoChat — Interactive Mode          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Session:   {session_id}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/clear' to reset the conversation, 'exit' to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "exit" | "quit" | "/exit" | "/quit" => break,
            "/clear" => {
                orchestrator.clear_session(&session_id).await?;
                println!("  Session cleared.\n");
            }
            text => match orchestrator.handle_turn(&session_id, text).await {
                Ok(reply) => {
                    let marker = if reply.degraded { " (offline)" } else { "" };
                    println!("\n  EcoChat{marker} >\n{}\n", reply.reply);
                }
                Err(e @ ChatError::Session(_)) => {
                    eprintln!("  Error: {e}");
                    println!("\n  EcoChat >\n{}\n", orchestrator.fallback_reply(Some(text)));
                }
                Err(e) => eprintln!("  Error: {e}"),
            },
        }
        prompt()?;
    }

    println!("\n  Goodbye! 🌍");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}

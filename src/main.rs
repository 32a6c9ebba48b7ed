//! promptgate CLI - send a single prompt to an OpenAI-compatible endpoint.

use clap::Parser;
use promptgate::{ConfigFileInstaller, Gateway, GatewayConfig, ensure_installed};

/// Send a single prompt to an OpenAI-compatible completion endpoint.
#[derive(Parser, Debug)]
#[command(name = "promptgate", version, about)]
struct Args {
    /// The prompt to complete
    #[arg(required = true)]
    prompt: Vec<String>,

    /// Model id (overrides the configured default)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the completion text.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let prompt = args.prompt.join(" ");

    let config_file = GatewayConfig::config_file()?;
    ensure_installed(&ConfigFileInstaller::new(config_file.clone()))?;
    let config = GatewayConfig::load(&config_file)?;

    let gateway = Gateway::new(config);
    let answer = match &args.model {
        Some(model) => gateway.complete_with_model(&prompt, model).await?,
        None => gateway.complete(&prompt).await?,
    };

    println!("{answer}");
    Ok(())
}

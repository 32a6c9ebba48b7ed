//! # promptgate
//!
//! One-shot completions against OpenAI-compatible endpoints, with guarded
//! credential setup.
//!
//! A [`Gateway`] resolves an API key (process environment first, masked
//! terminal prompt second), validates it against the remote service before
//! accepting it, lazily builds a single shared client, and forwards one text
//! prompt at a time to the chat-completions endpoint at temperature 0.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promptgate::{Gateway, GatewayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Gateway::new(GatewayConfig::default());
//!     let answer = gateway.complete("Say hello").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod setup;

pub use crate::core::HttpClientConfig;
pub use config::GatewayConfig;
pub use credential::{
    ApiKey, CredentialPrompt, CredentialResolver, CredentialStore, CredentialValidator,
    ModelListProbe, ProcessEnv, TerminalPrompt,
};
pub use error::GatewayError;
pub use gateway::Gateway;
pub use provider::{ModelInfo, OpenAiClient, OpenAiConfig};
pub use setup::{ConfigFileInstaller, InstallOutcome, Installer, ensure_installed};

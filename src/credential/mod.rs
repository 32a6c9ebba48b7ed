//! Credential acquisition and validation.

mod resolver;
mod types;

pub use resolver::{
    CredentialPrompt, CredentialResolver, CredentialStore, CredentialValidator, ModelListProbe,
    ProcessEnv, TerminalPrompt,
};
pub use types::ApiKey;

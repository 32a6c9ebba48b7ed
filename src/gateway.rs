//! The gateway context object: owns configuration, credential seams, and the
//! lazily built provider client.

use tokio::sync::OnceCell;
use tracing::info;

use crate::config::GatewayConfig;
use crate::credential::{
    ApiKey, CredentialPrompt, CredentialResolver, CredentialStore, ModelListProbe, ProcessEnv,
    TerminalPrompt,
};
use crate::error::GatewayError;
use crate::provider::{OpenAiClient, OpenAiConfig};

/// One gateway per logical consumer. The provider client is constructed on
/// first use, behind credential resolution, and reused for the life of the
/// gateway.
pub struct Gateway {
    config: GatewayConfig,
    store: Box<dyn CredentialStore>,
    prompt: Box<dyn CredentialPrompt>,
    client: OnceCell<OpenAiClient>,
}

impl Gateway {
    /// Gateway with production seams: process-environment credential store
    /// and masked terminal prompt.
    pub fn new(config: GatewayConfig) -> Self {
        let store = Box::new(ProcessEnv::new(config.api_key_env_var.clone()));
        let prompt = Box::new(TerminalPrompt::new(format!(
            "{} not found. Please enter your API key: ",
            config.api_key_env_var
        )));

        Self {
            store,
            prompt,
            client: OnceCell::new(),
            config,
        }
    }

    /// Swap the credential store (tests, embedding).
    pub fn with_store(mut self, store: Box<dyn CredentialStore>) -> Self {
        self.store = store;
        self
    }

    /// Swap the credential prompt (tests, embedding).
    pub fn with_prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The shared client, building it on first use.
    ///
    /// Construction resolves and validates the credential; every subsequent
    /// call returns the same handle.
    pub async fn client(&self) -> Result<&OpenAiClient, GatewayError> {
        self.client.get_or_try_init(|| self.build_client()).await
    }

    async fn build_client(&self) -> Result<OpenAiClient, GatewayError> {
        let key = self.resolve_credential().await?;
        info!(key_prefix = %key.prefix(), "Completion client ready");

        let config = OpenAiConfig::new(key)
            .with_base_url(self.config.base_url.clone())
            .with_default_model(self.config.default_model.clone())
            .with_http_config(self.config.http.clone());
        OpenAiClient::new(config)
    }

    async fn resolve_credential(&self) -> Result<ApiKey, GatewayError> {
        let validator = ModelListProbe::new(self.config.base_url.clone(), self.config.http.clone());
        let resolver = CredentialResolver::new(
            self.store.as_ref(),
            self.prompt.as_ref(),
            &validator,
            self.config.max_credential_attempts,
        );
        resolver.resolve().await
    }

    /// Complete `prompt` with the configured default model and return the
    /// first choice's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let model = self.config.default_model.clone();
        self.complete_with_model(prompt, &model).await
    }

    /// Complete `prompt` with an explicit model id.
    ///
    /// Remote failures propagate to the caller unmodified.
    pub async fn complete_with_model(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<String, GatewayError> {
        let client = self.client().await?;
        client.chat_completion(prompt, model).await
    }
}

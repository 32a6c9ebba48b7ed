use async_trait::async_trait;
use tracing::{debug, warn};

use super::ApiKey;
use crate::core::HttpClientConfig;
use crate::error::GatewayError;
use crate::provider::{OpenAiClient, OpenAiConfig};

/// Where a credential persists between resolutions.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<ApiKey>;
    fn store(&self, key: &ApiKey);
    fn clear(&self);
}

/// Process-environment store reading and writing a named variable.
pub struct ProcessEnv {
    var: String,
}

impl ProcessEnv {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialStore for ProcessEnv {
    fn load(&self) -> Option<ApiKey> {
        std::env::var(&self.var)
            .ok()
            .filter(|value| !value.is_empty())
            .map(ApiKey::new)
    }

    fn store(&self, key: &ApiKey) {
        // SAFETY: the resolver runs during single-threaded gateway setup;
        // nothing else mutates the environment concurrently.
        unsafe { std::env::set_var(&self.var, key.expose()) };
    }

    fn clear(&self) {
        // SAFETY: see `store`.
        unsafe { std::env::remove_var(&self.var) };
    }
}

/// Operator-facing source for a key when the store is empty.
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn read_key(&self) -> Result<ApiKey, GatewayError>;
}

/// Masked terminal prompt.
pub struct TerminalPrompt {
    message: String,
}

impl TerminalPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new("Please enter your API key: ")
    }
}

#[async_trait]
impl CredentialPrompt for TerminalPrompt {
    async fn read_key(&self) -> Result<ApiKey, GatewayError> {
        let message = self.message.clone();

        // rpassword blocks on the tty; keep it off the runtime threads.
        let secret = tokio::task::spawn_blocking(move || rpassword::prompt_password(message))
            .await
            .map_err(|e| GatewayError::Prompt {
                source: std::io::Error::other(e),
            })?
            .map_err(|e| GatewayError::Prompt { source: e })?;

        Ok(ApiKey::new(secret))
    }
}

/// Liveness/auth check for a candidate key.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, key: &ApiKey) -> Result<(), GatewayError>;
}

/// Validates a key by listing models with a transient client.
pub struct ModelListProbe {
    base_url: String,
    http_config: HttpClientConfig,
}

impl ModelListProbe {
    pub fn new(base_url: impl Into<String>, http_config: HttpClientConfig) -> Self {
        Self {
            base_url: base_url.into(),
            http_config,
        }
    }
}

#[async_trait]
impl CredentialValidator for ModelListProbe {
    async fn validate(&self, key: &ApiKey) -> Result<(), GatewayError> {
        let config = OpenAiConfig::new(key.clone())
            .with_base_url(self.base_url.clone())
            .with_http_config(self.http_config.clone());
        let client = OpenAiClient::new(config)?;

        let models = client.list_models().await?;
        debug!(count = models.len(), "Credential accepted by model listing");
        Ok(())
    }
}

/// Bounded-attempts credential resolution.
///
/// Takes the stored key when present, otherwise prompts the operator; every
/// candidate must pass remote validation before it is stored and returned.
/// Candidates that fail validation are cleared from the store before the
/// next attempt.
pub struct CredentialResolver<'a> {
    store: &'a dyn CredentialStore,
    prompt: &'a dyn CredentialPrompt,
    validator: &'a dyn CredentialValidator,
    max_attempts: u32,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(
        store: &'a dyn CredentialStore,
        prompt: &'a dyn CredentialPrompt,
        validator: &'a dyn CredentialValidator,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            prompt,
            validator,
            max_attempts,
        }
    }

    /// Resolve a validated key, or report why the attempt budget ran out.
    ///
    /// Prompt failures (e.g. no tty in a non-interactive context) abort
    /// resolution immediately rather than consuming attempts.
    pub async fn resolve(&self) -> Result<ApiKey, GatewayError> {
        let mut last_failure: Option<GatewayError> = None;

        for attempt in 1..=self.max_attempts {
            let candidate = match self.store.load() {
                Some(key) => key,
                None => self.prompt.read_key().await?,
            };

            match self.validator.validate(&candidate).await {
                Ok(()) => {
                    self.store.store(&candidate);
                    debug!(key_prefix = %candidate.prefix(), "Credential validated");
                    return Ok(candidate);
                }
                Err(cause) => {
                    warn!(attempt, error = %cause, "Credential validation failed");
                    self.store.clear();
                    last_failure = Some(cause);
                }
            }
        }

        Err(GatewayError::CredentialRejected {
            attempts: self.max_attempts,
            source: Box::new(last_failure.unwrap_or_else(|| {
                GatewayError::Configuration(
                    "Credential resolution needs at least one attempt".to_string(),
                )
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct MemoryStore {
        slot: Mutex<Option<String>>,
    }

    impl MemoryStore {
        fn empty() -> Self {
            Self {
                slot: Mutex::new(None),
            }
        }

        fn with_key(key: &str) -> Self {
            Self {
                slot: Mutex::new(Some(key.to_string())),
            }
        }

        fn current(&self) -> Option<String> {
            self.slot.lock().unwrap().clone()
        }
    }

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Option<ApiKey> {
            self.slot.lock().unwrap().clone().map(ApiKey::new)
        }

        fn store(&self, key: &ApiKey) {
            *self.slot.lock().unwrap() = Some(key.expose().to_string());
        }

        fn clear(&self) {
            *self.slot.lock().unwrap() = None;
        }
    }

    struct ScriptedPrompt {
        keys: Mutex<Vec<&'static str>>,
        reads: AtomicUsize,
    }

    impl ScriptedPrompt {
        fn new(keys: Vec<&'static str>) -> Self {
            Self {
                keys: Mutex::new(keys),
                reads: AtomicUsize::new(0),
            }
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialPrompt for ScriptedPrompt {
        async fn read_key(&self) -> Result<ApiKey, GatewayError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let mut keys = self.keys.lock().unwrap();
            assert!(!keys.is_empty(), "prompt script exhausted");
            Ok(ApiKey::new(keys.remove(0)))
        }
    }

    struct AcceptOnly {
        valid: &'static str,
    }

    #[async_trait]
    impl CredentialValidator for AcceptOnly {
        async fn validate(&self, key: &ApiKey) -> Result<(), GatewayError> {
            if key.expose() == self.valid {
                Ok(())
            } else {
                Err(GatewayError::Api {
                    message: "Incorrect API key provided".to_string(),
                    status_code: 401,
                })
            }
        }
    }

    #[test]
    fn process_env_round_trips_through_the_environment() {
        // Variable name is unique to this test; no other test touches it.
        let store = ProcessEnv::new("PROMPTGATE_RESOLVER_TEST_KEY");

        assert!(store.load().is_none());

        store.store(&ApiKey::new("sk-test"));
        assert_eq!(store.load().unwrap().expose(), "sk-test");

        store.clear();
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn invalid_then_valid_prompt_sequence_returns_only_the_valid_key() {
        let store = MemoryStore::empty();
        let prompt = ScriptedPrompt::new(vec!["bad-key", "good-key"]);
        let validator = AcceptOnly { valid: "good-key" };

        let resolver = CredentialResolver::new(&store, &prompt, &validator, 3);
        let key = resolver.resolve().await.expect("valid key");

        assert_eq!(key.expose(), "good-key");
        assert_eq!(store.current().as_deref(), Some("good-key"));
        assert_eq!(prompt.read_count(), 2);
    }

    #[tokio::test]
    async fn invalid_stored_key_is_cleared_before_reprompting() {
        let store = MemoryStore::with_key("stale-key");
        let prompt = ScriptedPrompt::new(vec!["good-key"]);
        let validator = AcceptOnly { valid: "good-key" };

        let resolver = CredentialResolver::new(&store, &prompt, &validator, 3);
        let key = resolver.resolve().await.expect("valid key");

        assert_eq!(key.expose(), "good-key");
        assert_eq!(store.current().as_deref(), Some("good-key"));
    }

    #[tokio::test]
    async fn stored_valid_key_never_touches_the_prompt() {
        let store = MemoryStore::with_key("good-key");
        let prompt = ScriptedPrompt::new(vec![]);
        let validator = AcceptOnly { valid: "good-key" };

        let resolver = CredentialResolver::new(&store, &prompt, &validator, 3);
        let key = resolver.resolve().await.expect("valid key");

        assert_eq!(key.expose(), "good-key");
        assert_eq!(prompt.read_count(), 0);
    }

    #[tokio::test]
    async fn exhausted_attempts_surface_the_last_cause() {
        let store = MemoryStore::empty();
        let prompt = ScriptedPrompt::new(vec!["bad-1", "bad-2"]);
        let validator = AcceptOnly { valid: "good-key" };

        let resolver = CredentialResolver::new(&store, &prompt, &validator, 2);
        let error = resolver.resolve().await.unwrap_err();

        match error {
            GatewayError::CredentialRejected { attempts, source } => {
                assert_eq!(attempts, 2);
                match *source {
                    GatewayError::Api { status_code, .. } => assert_eq!(status_code, 401),
                    other => panic!("Expected Api cause, got {other:?}"),
                }
            }
            other => panic!("Expected CredentialRejected, got {other:?}"),
        }

        assert_eq!(store.current(), None);
    }
}

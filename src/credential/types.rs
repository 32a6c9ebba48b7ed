use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// API key secret - automatically zeroed when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw secret, for building auth headers.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// First characters for display (e.g. "sk-pro...").
    pub fn prefix(&self) -> String {
        let head: String = self.value.chars().take(6).collect();
        format!("{head}...")
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}

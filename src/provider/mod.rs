pub(crate) mod constants;
pub(crate) mod openai;

pub use openai::{ModelInfo, OpenAiClient, OpenAiConfig};

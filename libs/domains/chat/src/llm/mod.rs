mod gemini;
mod provider;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use provider::LlmProvider;

#[cfg(test)]
pub(crate) use provider::MockLlmProvider;

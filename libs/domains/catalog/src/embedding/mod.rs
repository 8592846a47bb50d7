mod openai;
mod provider;

pub use openai::{OpenAIConfig, OpenAIEmbeddings};
pub use provider::{EmbeddingModel, EmbeddingProvider};

#[cfg(test)]
pub(crate) use provider::MockEmbeddingProvider;

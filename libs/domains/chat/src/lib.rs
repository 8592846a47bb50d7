//! Commerce chat domain: intent routing, retrieval, and response formatting.
//!
//! - [`router`]: LLM routing with keyword-heuristic fallback
//! - [`vision`]: image attribute extraction via a vision model
//! - [`formatter`]: LLM narration with deterministic templates
//! - [`pipeline`]: the route → retrieve → format engine
//! - [`llm`]: completion providers (Gemini)
//! - [`fallback`]: the shared try-primary/fall-back combinator

pub mod error;
pub mod fallback;
pub mod formatter;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod router;
pub mod vision;

pub use error::{ChatError, ChatResult};
pub use fallback::with_fallback;
pub use formatter::ResponseFormatter;
pub use llm::{GeminiConfig, GeminiProvider, LlmProvider};
pub use models::{
    ChatRequest, ChatResponse, ConversationTurn, Intent, RoutedIntent, VisionAttributes,
};
pub use pipeline::ChatEngine;
pub use router::IntentRouter;
pub use vision::ImageDescriber;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::error::{ChatError, ChatResult};
use crate::llm::LlmProvider;
use crate::models::VisionAttributes;

const VISION_PROMPT: &str = "Analyze the product in this image. Respond with ONLY a JSON object, \
no prose and no markdown fences, with exactly these keys:\n\
{\"item_type\": \"\", \"category\": \"\", \"color\": \"\", \"material\": \"\", \
\"pattern\": \"\", \"style\": \"\", \"keywords\": []}\n\
Use empty strings for attributes you cannot determine. keywords is a list of \
up to five short search terms.";

static JSON_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap_or_else(|e| panic!("invalid JSON regex: {e}")));

/// Extracts structured attributes from a product image via a vision model.
pub struct ImageDescriber {
    llm: Arc<dyn LlmProvider>,
}

impl ImageDescriber {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Describe an image as catalog-searchable attributes.
    ///
    /// Fails with [`ChatError::MalformedVisionOutput`] when the input is not
    /// valid base64 or the model strays from the JSON schema; the pipeline
    /// turns that into a terminal re-prompt, never a retry.
    #[instrument(skip(self, image_base64))]
    pub async fn describe(&self, image_base64: &str) -> ChatResult<VisionAttributes> {
        let clean = Self::strip_data_url_prefix(image_base64);

        BASE64
            .decode(clean)
            .map_err(|e| ChatError::MalformedVisionOutput(format!("Invalid base64 image: {e}")))?;

        let answer = self.llm.complete_vision(clean, VISION_PROMPT).await?;
        Self::parse_attributes(&answer)
    }

    /// Accept both raw base64 and `data:image/...;base64,` URLs.
    fn strip_data_url_prefix(input: &str) -> &str {
        let trimmed = input.trim();
        match trimmed.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => trimmed,
        }
    }

    fn parse_attributes(answer: &str) -> ChatResult<VisionAttributes> {
        let block = JSON_BLOCK_RE.find(answer).ok_or_else(|| {
            ChatError::MalformedVisionOutput(format!("No JSON object in vision output: {answer}"))
        })?;

        let attributes: VisionAttributes = serde_json::from_str(block.as_str())
            .map_err(|e| ChatError::MalformedVisionOutput(format!("Invalid JSON: {e}")))?;

        if attributes.item_type.trim().is_empty() {
            return Err(ChatError::MalformedVisionOutput(
                "Vision output missing item_type".to_string(),
            ));
        }

        Ok(attributes)
    }
}

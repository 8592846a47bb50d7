use std::fmt::Write as _;
use std::sync::Arc;

use domain_catalog::ScoredProduct;
use tracing::instrument;

use crate::error::ChatResult;
use crate::fallback::with_fallback;
use crate::llm::LlmProvider;
use crate::models::ConversationTurn;

const DESCRIPTION_PREVIEW_CHARS: usize = 50;

const EMPTY_RESULT_MESSAGE: &str = "I couldn't find any products matching your request. \
Could you try describing what you're looking for differently?";

/// Turns retrieved products (or a plain chat turn) into a markdown answer.
///
/// The LLM narrates when it can; every branch has a deterministic template
/// standing by for provider failures.
pub struct ResponseFormatter {
    llm: Arc<dyn LlmProvider>,
}

impl ResponseFormatter {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Conversational reply for the general-chat branch.
    #[instrument(skip(self, history))]
    pub async fn general_reply(&self, text: &str, history: &[ConversationTurn]) -> String {
        let canned = text.to_string();
        with_fallback(self.general_via_llm(text, history), move || {
            Self::canned_reply(&canned)
        })
        .await
    }

    async fn general_via_llm(
        &self,
        text: &str,
        history: &[ConversationTurn],
    ) -> ChatResult<String> {
        let mut prompt = String::from(
            "You are a friendly shopping assistant for an online store. \
             Reply briefly and helpfully. Do not invent products or prices.\n\n",
        );

        // Keep only the most recent turns so the prompt stays small.
        for turn in history.iter().rev().take(5).rev() {
            let _ = writeln!(prompt, "User: {}", turn.user_input);
            let _ = writeln!(prompt, "Assistant: {}", turn.agent_response);
        }
        let _ = write!(prompt, "User: {text}\nAssistant:");

        self.llm.complete(&prompt).await
    }

    /// Deterministic conversational reply.
    fn canned_reply(text: &str) -> String {
        let lowered = text.to_lowercase();

        if ["hi", "hello", "hey"]
            .iter()
            .any(|g| lowered.split_whitespace().any(|t| t == *g))
        {
            return "Hi! I'm your shopping assistant. Ask me about products, \
                    or send a photo of something you'd like to find."
                .to_string();
        }

        if lowered.contains("thank") {
            return "You're welcome! Let me know if there's anything else I can help you find."
                .to_string();
        }

        if lowered.contains("help") {
            return "I can help you find products. Try asking for something specific, \
                    like \"red t-shirt\" or \"running shoes under $50\", or send a photo."
                .to_string();
        }

        "I'm here to help you shop. Tell me what you're looking for, \
         or send a photo of an item you'd like to find."
            .to_string()
    }

    /// Markdown reply for the product-search branches.
    ///
    /// At most three products are ever rendered; an empty retrieval yields a
    /// fixed "couldn't find" message without touching the LLM.
    #[instrument(skip(self, results), fields(count = results.len()))]
    pub async fn product_reply(&self, query: &str, results: &[ScoredProduct]) -> String {
        if results.is_empty() {
            return EMPTY_RESULT_MESSAGE.to_string();
        }

        let results = &results[..results.len().min(3)];
        with_fallback(self.products_via_llm(query, results), || {
            Self::render_template(results)
        })
        .await
    }

    async fn products_via_llm(&self, query: &str, results: &[ScoredProduct]) -> ChatResult<String> {
        let mut prompt = format!(
            "You are a shopping assistant. The user asked: \"{query}\".\n\
             Present these products in friendly markdown. Use only the data given; \
             do not invent details. Include each product's name and price.\n\n"
        );

        for (i, result) in results.iter().enumerate() {
            let product = &result.product;
            let _ = writeln!(
                prompt,
                "{}. {} | ${:.2} | {}",
                i + 1,
                product.name,
                product.price,
                product.description
            );
        }

        self.llm.complete(&prompt).await
    }

    /// Deterministic markdown template: name, price, truncated description.
    fn render_template(results: &[ScoredProduct]) -> String {
        let mut out = String::from("**Top Recommendations:**\n\n");

        for (i, result) in results.iter().enumerate() {
            let product = &result.product;
            let preview: String = product
                .description
                .chars()
                .take(DESCRIPTION_PREVIEW_CHARS)
                .collect();
            let ellipsis = if product.description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
                "..."
            } else {
                ""
            };

            let _ = writeln!(
                out,
                "{}. **{}** - ${:.2}\n   {}{}",
                i + 1,
                product.name,
                product.price,
                preview,
                ellipsis
            );
        }

        out
    }
}

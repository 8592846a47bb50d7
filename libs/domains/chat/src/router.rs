use std::sync::Arc;

use domain_catalog::Vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{ChatError, ChatResult};
use crate::fallback::with_fallback;
use crate::llm::LlmProvider;
use crate::models::{Intent, RoutedIntent};

static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\s*\d+|\d+\s*(?:dollars|bucks|usd)|under\s+\d+")
        .unwrap_or_else(|e| panic!("invalid price regex: {e}"))
});

const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "howdy", "thanks", "thank", "bye", "goodbye", "morning", "afternoon",
    "evening",
];

const PRODUCT_KEYWORDS: &[&str] = &[
    "shirt", "tshirt", "t-shirt", "tee", "shoes", "sneakers", "boots", "jeans", "pants",
    "trousers", "dress", "skirt", "jacket", "coat", "hoodie", "sweater", "hat", "cap", "bag",
    "wallet", "belt", "socks", "buy", "purchase", "shop", "price", "cost", "cheap", "expensive",
    "wear", "outfit", "size", "fit", "recommend", "looking",
];

/// Routes a user query to a handling branch.
///
/// An attached image always wins: the router answers `image_search` without
/// consulting the LLM. Otherwise the LLM is asked for a strict-JSON verdict,
/// and on any provider failure the keyword heuristics take over immediately.
pub struct IntentRouter {
    llm: Arc<dyn LlmProvider>,
    vocabulary: Vocabulary,
}

#[derive(Debug, Deserialize)]
struct RouteVerdict {
    route: String,
    #[serde(default)]
    #[allow(dead_code)]
    rationale: String,
}

impl IntentRouter {
    pub fn new(llm: Arc<dyn LlmProvider>, vocabulary: Vocabulary) -> Self {
        Self { llm, vocabulary }
    }

    #[instrument(skip(self))]
    pub async fn route(&self, text: Option<&str>, has_image: bool) -> RoutedIntent {
        if has_image {
            return RoutedIntent {
                intent: Intent::ImageSearch,
                confidence: 0.9,
            };
        }

        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return RoutedIntent::default_route();
        };

        with_fallback(self.route_via_llm(text), || self.route_via_heuristics(text)).await
    }

    async fn route_via_llm(&self, text: &str) -> ChatResult<RoutedIntent> {
        let prompt = format!(
            "You are an intent classifier for a shopping assistant.\n\
             Classify the user message into exactly one route:\n\
             - general_chat: greetings, small talk, questions not about products\n\
             - product_search: looking for, asking about, or comparing products\n\
             - image_search: the user refers to an attached image\n\n\
             Respond with ONLY a JSON object, no prose:\n\
             {{\"route\": \"<route>\", \"rationale\": \"<one short sentence>\"}}\n\n\
             User message: {text}"
        );

        let answer = self.llm.complete(&prompt).await?;
        let intent = Self::parse_verdict(&answer)?;
        Ok(RoutedIntent::llm(intent))
    }

    /// Parse the LLM verdict: strict JSON first, then a bare-token scan for
    /// models that refuse to stay inside the schema.
    fn parse_verdict(answer: &str) -> ChatResult<Intent> {
        static JSON_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?s)\{.*\}").unwrap_or_else(|e| panic!("invalid JSON regex: {e}"))
        });

        if let Some(block) = JSON_RE.find(answer) {
            if let Ok(verdict) = serde_json::from_str::<RouteVerdict>(block.as_str()) {
                if let Ok(intent) = verdict.route.trim().parse::<Intent>() {
                    return Ok(intent);
                }
            }
        }

        let lowered = answer.to_lowercase();
        for intent in [
            Intent::ImageSearch,
            Intent::ProductSearch,
            Intent::GeneralChat,
        ] {
            if lowered.contains(&intent.to_string()) {
                return Ok(intent);
            }
        }

        Err(ChatError::ProviderUnavailable(format!(
            "Unparseable routing verdict: {answer}"
        )))
    }

    /// Deterministic keyword routing, fired when the LLM is unavailable.
    pub fn route_via_heuristics(&self, text: &str) -> RoutedIntent {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '-')
            .filter(|t| !t.is_empty())
            .collect();

        let product_signal = tokens.iter().any(|token| {
            PRODUCT_KEYWORDS.contains(token) || self.vocabulary.recognizes(token)
        }) || PRICE_RE.is_match(&lowered);

        if product_signal {
            return RoutedIntent::heuristic(Intent::ProductSearch);
        }

        if tokens.iter().any(|token| GREETINGS.contains(token)) {
            return RoutedIntent::heuristic(Intent::GeneralChat);
        }

        RoutedIntent::default_route()
    }
}

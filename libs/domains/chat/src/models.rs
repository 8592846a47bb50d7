use domain_catalog::Product;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Classified purpose of a user query, selecting the handling branch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    GeneralChat,
    ProductSearch,
    ImageSearch,
}

/// Routing decision with a confidence scalar.
///
/// Confidence reflects the decision source: 0.9 for an LLM verdict, 0.8 for
/// a positive heuristic match, 0.5 for the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedIntent {
    pub intent: Intent,
    pub confidence: f64,
}

impl RoutedIntent {
    pub fn llm(intent: Intent) -> Self {
        Self {
            intent,
            confidence: 0.9,
        }
    }

    pub fn heuristic(intent: Intent) -> Self {
        Self {
            intent,
            confidence: 0.8,
        }
    }

    pub fn default_route() -> Self {
        Self {
            intent: Intent::GeneralChat,
            confidence: 0.5,
        }
    }
}

/// One prior exchange in the conversation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ConversationTurn {
    pub user_input: String,
    pub agent_response: String,
}

/// Inbound chat request.
///
/// At least one of `text_input` / `image_base64` must be present; when both
/// are, the image drives retrieval.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub text_input: Option<String>,
    pub image_base64: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub conversation_context: Option<Value>,
}

impl ChatRequest {
    pub fn text(&self) -> Option<&str> {
        self.text_input.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image_base64
            .as_deref()
            .filter(|i| !i.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.image().is_none()
    }
}

/// Outbound chat response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub products: Vec<Product>,
    pub intent: Intent,
    pub confidence: f64,
    pub metadata: Value,
}

impl ChatResponse {
    /// A conversational reply: no products, empty metadata.
    pub fn conversational(response: String, routed: RoutedIntent) -> Self {
        Self {
            response,
            products: vec![],
            intent: routed.intent,
            confidence: routed.confidence,
            metadata: json!({}),
        }
    }
}

/// Structured attributes extracted from a product image by the vision model.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VisionAttributes {
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl VisionAttributes {
    /// Concatenate non-empty fields into a text query for catalog search.
    pub fn to_query(&self) -> String {
        let mut parts: Vec<&str> = [
            self.color.as_str(),
            self.material.as_str(),
            self.pattern.as_str(),
            self.style.as_str(),
            self.item_type.as_str(),
            self.category.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();

        for keyword in &self.keywords {
            if !keyword.trim().is_empty() {
                parts.push(keyword);
            }
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Intent::ProductSearch).unwrap(),
            json!("product_search")
        );
        assert_eq!(Intent::GeneralChat.to_string(), "general_chat");
        assert_eq!(
            "image_search".parse::<Intent>().unwrap(),
            Intent::ImageSearch
        );
    }

    #[test]
    fn request_blank_text_counts_as_absent() {
        let request = ChatRequest {
            text_input: Some("   ".to_string()),
            image_base64: None,
            conversation_history: vec![],
            conversation_context: None,
        };
        assert!(request.text().is_none());
        assert!(request.is_empty());
    }

    #[test]
    fn vision_attributes_query_skips_empty_fields() {
        let attributes = VisionAttributes {
            item_type: "t-shirt".to_string(),
            color: "red".to_string(),
            keywords: vec!["casual".to_string(), "".to_string()],
            ..Default::default()
        };
        assert_eq!(attributes.to_query(), "red t-shirt casual");
    }

    #[test]
    fn conversational_response_has_no_products_or_metadata() {
        let response =
            ChatResponse::conversational("Hi there!".to_string(), RoutedIntent::default_route());
        assert!(response.products.is_empty());
        assert_eq!(response.metadata, json!({}));
        assert_eq!(response.intent, Intent::GeneralChat);
    }
}

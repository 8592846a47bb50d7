use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

/// Structured product attributes.
///
/// `size` is a list in the domain model but the vector store payload is flat,
/// so it round-trips through a JSON-encoded string (see [`Product::to_payload`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductAttributes {
    pub brand: String,
    pub color_family: String,
    pub material: String,
    #[serde(default)]
    pub size: Vec<String>,
}

/// A catalog product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub availability: bool,
    /// Categories; only the first element survives a store round trip.
    #[serde(default)]
    pub category: Vec<String>,
    pub attributes: ProductAttributes,
}

/// A product with its similarity score from vector search.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: f32,
}

/// Namespace for deriving deterministic point IDs from product IDs.
const POINT_ID_NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

impl Product {
    /// Deterministic vector-store point ID derived from the product ID.
    ///
    /// Re-upserting the same product always hits the same point.
    pub fn point_id(&self) -> Uuid {
        Uuid::new_v5(&POINT_ID_NAMESPACE, self.id.as_bytes())
    }

    /// Text used for embedding and for keyword-overlap fallback matching.
    pub fn search_text(&self) -> String {
        let mut parts = vec![
            self.name.clone(),
            self.description.clone(),
            self.attributes.brand.clone(),
            self.attributes.color_family.clone(),
            self.attributes.material.clone(),
        ];
        parts.extend(self.category.iter().cloned());
        parts.retain(|p| !p.is_empty());
        parts.join(" ").to_lowercase()
    }

    /// Flatten into a vector-store payload.
    ///
    /// The store only accepts scalar payload values, so:
    /// - `category` collapses to its first element
    /// - `size` is serialized to a JSON string
    pub fn to_payload(&self) -> CatalogResult<Value> {
        let size_json = serde_json::to_string(&self.attributes.size)?;
        Ok(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price,
            "availability": self.availability,
            "category": self.category.first().cloned().unwrap_or_default(),
            "brand": self.attributes.brand,
            "color_family": self.attributes.color_family,
            "material": self.attributes.material,
            "size": size_json,
        }))
    }

    /// Rebuild a product from a flat store payload.
    ///
    /// Inverse of [`Product::to_payload`]: the scalar `category` becomes a
    /// one-element list and the JSON-string `size` is parsed back to a list.
    pub fn from_payload(payload: &Value) -> CatalogResult<Self> {
        let str_field = |key: &str| -> CatalogResult<String> {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| CatalogError::Payload(format!("missing or non-string field '{key}'")))
        };

        let price = payload
            .get("price")
            .and_then(Value::as_f64)
            .ok_or_else(|| CatalogError::Payload("missing or non-numeric field 'price'".into()))?;

        let availability = payload
            .get("availability")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let category_scalar = str_field("category")?;
        let category = if category_scalar.is_empty() {
            vec![]
        } else {
            vec![category_scalar]
        };

        let size_raw = str_field("size")?;
        let size: Vec<String> = serde_json::from_str(&size_raw)
            .map_err(|e| CatalogError::Payload(format!("size field is not a JSON list: {e}")))?;

        Ok(Self {
            id: str_field("id")?,
            name: str_field("name")?,
            description: str_field("description")?,
            price,
            availability,
            category,
            attributes: ProductAttributes {
                brand: str_field("brand")?,
                color_family: str_field("color_family")?,
                material: str_field("material")?,
                size,
            },
        })
    }
}

use std::collections::HashSet;

use crate::models::Product;

/// Read-only lookup table of terms observed in the catalog.
///
/// Built from a catalog scan at startup and rebuilt on reload, never
/// recomputed per request. The intent router uses it to recognize brand,
/// color, and category mentions that static keyword lists would miss.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    brands: HashSet<String>,
    colors: HashSet<String>,
    categories: HashSet<String>,
}

impl Vocabulary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut vocabulary = Self::default();

        for product in products {
            let brand = product.attributes.brand.trim().to_lowercase();
            if !brand.is_empty() {
                vocabulary.brands.insert(brand);
            }

            let color = product.attributes.color_family.trim().to_lowercase();
            if !color.is_empty() {
                vocabulary.colors.insert(color);
            }

            for category in &product.category {
                let category = category.trim().to_lowercase();
                if !category.is_empty() {
                    vocabulary.categories.insert(category);
                }
            }
        }

        vocabulary
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty() && self.colors.is_empty() && self.categories.is_empty()
    }

    pub fn contains_brand(&self, token: &str) -> bool {
        self.brands.contains(&token.to_lowercase())
    }

    pub fn contains_color(&self, token: &str) -> bool {
        self.colors.contains(&token.to_lowercase())
    }

    pub fn contains_category(&self, token: &str) -> bool {
        self.categories.contains(&token.to_lowercase())
    }

    /// True when the token names any known brand, color, or category.
    pub fn recognizes(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.brands.contains(&token)
            || self.colors.contains(&token)
            || self.categories.contains(&token)
    }
}

//! Product document.
//!
//! A product is stored and served as a single JSON document. Field names are
//! camelCase on the wire so that documents exported from the catalog tool can
//! be loaded unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

const fn default_true() -> bool {
    true
}

/// A hosted image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Public URL.
    #[serde(default)]
    pub url: String,
    /// Identifier at the image host, used when replacing the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// A typed group of "details and care" lines (materials, fit, care, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsAndCare {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: Vec<String>,
}

/// A delivery information row, e.g. `Shipping` / `Free over $100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// One axis of variation and its allowed values, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOption {
    /// Variation type name, e.g. `color` or `size`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Allowed values. The first value is the default selection.
    pub values: Vec<String>,
}

impl VariationOption {
    /// Create a variation option.
    #[must_use]
    pub fn new(kind: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: kind.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The default value (`values[0]`), if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Whether `value` is one of the declared values.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A purchasable SKU: one value per price-determining variation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationCombination {
    /// Variation type to value, e.g. `{color: black, size: M}`.
    pub options: BTreeMap<String, String>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl VariationCombination {
    /// Create an in-stock combination from `(type, value)` pairs.
    #[must_use]
    pub fn new<K, V>(options: impl IntoIterator<Item = (K, V)>, price: Price) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            options: options
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            price,
            original_price: None,
            in_stock: true,
            stock_count: 0,
            sku: None,
            image: None,
        }
    }

    /// Display label: option values in `keys` order joined with ` / `.
    ///
    /// Keys the combination does not carry are skipped.
    #[must_use]
    pub fn label(&self, keys: &[String]) -> String {
        keys.iter()
            .filter_map(|key| self.options.get(key).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    /// Base price, used when no combination determines the price.
    pub price: Price,
    /// Pre-discount price, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub variation_options: Vec<VariationOption>,
    /// Variation types whose values select a distinct price and stock SKU.
    #[serde(default)]
    pub price_determined_by: Vec<String>,
    #[serde(default)]
    pub variation_combinations: Vec<VariationCombination>,
    #[serde(default)]
    pub category: Vec<Category>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Merchandising badge such as `New` or `Limited Edition`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default)]
    pub details_and_care: Vec<DetailsAndCare>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub delivery_info: Vec<DeliveryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a minimal in-stock product with no variations.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, brand: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
            price,
            original_price: None,
            short_description: None,
            description: String::new(),
            images: Vec::new(),
            variation_options: Vec::new(),
            price_determined_by: Vec::new(),
            variation_combinations: Vec::new(),
            category: Vec::new(),
            features: Vec::new(),
            tags: Vec::new(),
            badge: None,
            details_and_care: Vec::new(),
            in_stock: true,
            delivery_info: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// URL of the first image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Look up a variation option by type name.
    #[must_use]
    pub fn variation_option(&self, kind: &str) -> Option<&VariationOption> {
        self.variation_options.iter().find(|option| option.kind == kind)
    }

    /// Whether the product belongs to `category`.
    #[must_use]
    pub fn in_category(&self, category: Category) -> bool {
        self.category.contains(&category)
    }
}

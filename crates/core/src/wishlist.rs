//! Wishlist container.
//!
//! Entries are keyed by product alone: variants are chosen when the product
//! moves to the cart, not when it is saved.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
}

impl From<&Product> for WishlistEntry {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            image: product.primary_image().map(String::from),
            original_price: product.original_price,
        }
    }
}

/// A session's wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// An empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Add an entry. Re-adding a product replaces its entry in place.
    pub fn add(&mut self, entry: WishlistEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.product_id == entry.product_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove the entry for `product_id`. Returns `false` if absent.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != product_id);
        self.entries.len() != before
    }

    /// Add the entry if absent, otherwise remove it.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, entry: WishlistEntry) -> bool {
        if self.remove(entry.product_id) {
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    /// Whether `product_id` is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.product_id == product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

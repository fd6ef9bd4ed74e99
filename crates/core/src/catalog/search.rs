//! Catalog search and category filtering.

use serde::Deserialize;

use super::product::Product;
use crate::types::Category;

/// Search parameters for the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against name and brand.
    #[serde(default)]
    pub q: Option<String>,
    /// Restrict to products in this category.
    #[serde(default)]
    pub category: Option<Category>,
}

impl CatalogQuery {
    /// Whether `product` satisfies the query.
    ///
    /// A blank `q` matches every product.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if !product.in_category(category) {
                return false;
            }
        }

        match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.brand.to_lowercase().contains(&needle)
            }
        }
    }

    /// Filter `catalog`, keeping catalog order.
    pub fn apply<'a>(&self, catalog: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        catalog
            .into_iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

//! In-memory catalog loaded from a JSON or YAML file.
//!
//! Used when no database is configured and by the integration tests. The
//! catalog is read once at start-up and never changes afterwards.

use std::collections::HashMap;
use std::path::Path;

use urban_threadz_core::catalog::{
    CatalogDocument, CatalogQuery, Product, ProductWithReviews, Review, ReviewRecord,
    SIMILAR_PRODUCTS_LIMIT, similar_products,
};
use urban_threadz_core::{CustomerId, ProductId};

use crate::db::RepositoryError;

/// Read a catalog document, choosing the format from the file extension.
///
/// `.yaml` and `.yml` files are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns `RepositoryError::Io` if the file cannot be read, or
/// `RepositoryError::Parse` if it is not a valid catalog document.
pub fn read_catalog_document(path: &Path) -> Result<CatalogDocument, RepositoryError> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| RepositoryError::Parse(format!("{}: {e}", path.display())))
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| RepositoryError::Parse(format!("{}: {e}", path.display())))
    }
}

/// A read-only catalog held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    reviews: Vec<ReviewRecord>,
    customers: HashMap<CustomerId, String>,
}

impl MemoryCatalog {
    /// Build a catalog from a document.
    ///
    /// Inconsistent variation data is logged and kept; lookups stay best
    /// effort.
    #[must_use]
    pub fn new(document: CatalogDocument) -> Self {
        for issue in document.validate() {
            tracing::warn!(%issue, "Catalog issue");
        }

        Self {
            customers: document
                .customers
                .into_iter()
                .map(|customer| (customer.id, customer.name))
                .collect(),
            products: document.products,
            reviews: document.reviews,
        }
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::Parse` if the file
    /// cannot be read.
    pub fn load(path: &Path) -> Result<Self, RepositoryError> {
        let document = read_catalog_document(path)?;
        tracing::info!(
            path = %path.display(),
            products = document.products.len(),
            reviews = document.reviews.len(),
            "Catalog loaded"
        );
        Ok(Self::new(document))
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Reviews for `id`, newest first.
    fn reviews_for(&self, id: ProductId, with_names: bool) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|review| review.product == id)
            .map(|review| {
                let name = with_names
                    .then(|| self.customers.get(&review.customer).cloned())
                    .flatten();
                Review::from_record(review.clone(), name)
            })
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Every product with reviews attached; reviewers by id only.
    #[must_use]
    pub fn list_with_reviews(&self) -> Vec<ProductWithReviews> {
        self.products
            .iter()
            .map(|product| {
                ProductWithReviews::new(product.clone(), self.reviews_for(product.id, false))
            })
            .collect()
    }

    /// A product with its reviews, naming each reviewer.
    #[must_use]
    pub fn get_with_reviews(&self, id: ProductId) -> Option<ProductWithReviews> {
        self.get(id)
            .map(|product| ProductWithReviews::new(product.clone(), self.reviews_for(id, true)))
    }

    /// Products similar to `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` is not in the catalog.
    pub fn similar(&self, id: ProductId) -> Result<Vec<Product>, RepositoryError> {
        let reference = self.get(id).ok_or(RepositoryError::NotFound)?;
        Ok(similar_products(reference, &self.products, SIMILAR_PRODUCTS_LIMIT)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Products matching `query`.
    #[must_use]
    pub fn search(&self, query: &CatalogQuery) -> Vec<Product> {
        query.apply(&self.products).into_iter().cloned().collect()
    }
}

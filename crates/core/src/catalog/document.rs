//! Whole-catalog export format.
//!
//! A catalog document bundles products, the customers who reviewed them and
//! their reviews. It is what the in-memory store loads and what the CLI seeds
//! into the database.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::product::Product;
use super::review::{Customer, ReviewRecord};
use super::validation::{CatalogIssue, validate_product};
use crate::types::{ProductId, ReviewId};

/// Products, customers and reviews in storage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

/// A problem found in a catalog document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentIssue {
    #[error("product {id} ({name}): {issue}")]
    Product {
        id: ProductId,
        name: String,
        issue: CatalogIssue,
    },

    #[error("product id {0} appears more than once")]
    DuplicateProduct(ProductId),

    #[error("review {0} references an unknown product")]
    OrphanReview(ReviewId),

    #[error("review {0} references an unknown customer")]
    UnknownReviewer(ReviewId),
}

impl CatalogDocument {
    /// Check every product and every review reference.
    #[must_use]
    pub fn validate(&self) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();

        let mut product_ids = HashSet::new();
        for product in &self.products {
            if !product_ids.insert(product.id) {
                issues.push(DocumentIssue::DuplicateProduct(product.id));
            }
            issues.extend(validate_product(product).into_iter().map(|issue| {
                DocumentIssue::Product {
                    id: product.id,
                    name: product.name.clone(),
                    issue,
                }
            }));
        }

        let customer_ids: HashSet<_> = self.customers.iter().map(|c| c.id).collect();
        for review in &self.reviews {
            if !product_ids.contains(&review.product) {
                issues.push(DocumentIssue::OrphanReview(review.id));
            }
            if !customer_ids.contains(&review.customer) {
                issues.push(DocumentIssue::UnknownReviewer(review.id));
            }
        }

        issues
    }
}

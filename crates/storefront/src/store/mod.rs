//! Product store: the read side of the catalog.
//!
//! Handlers talk to [`ProductStore`], which dispatches to `PostgreSQL` or to
//! an in-memory catalog depending on configuration.

pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

use urban_threadz_core::ProductId;
use urban_threadz_core::catalog::{CatalogQuery, Product, ProductWithReviews};

use crate::db::{ProductRepository, RepositoryError};

pub use memory::{MemoryCatalog, read_catalog_document};

/// Where product data comes from.
#[derive(Clone)]
pub enum ProductStore {
    /// `storefront.product` and friends.
    Postgres(PgPool),
    /// A catalog file loaded at start-up.
    Memory(Arc<MemoryCatalog>),
}

impl ProductStore {
    /// Wrap an in-memory catalog.
    #[must_use]
    pub fn memory(catalog: MemoryCatalog) -> Self {
        Self::Memory(Arc::new(catalog))
    }

    /// Every product with reviews and rating summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn list_with_reviews(&self) -> Result<Vec<ProductWithReviews>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).list_with_reviews().await,
            Self::Memory(catalog) => Ok(catalog.list_with_reviews()),
        }
    }

    /// One product with named reviewers, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn get_with_reviews(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithReviews>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).get_with_reviews(id).await,
            Self::Memory(catalog) => Ok(catalog.get_with_reviews(id)),
        }
    }

    /// One product without reviews, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).get(id).await,
            Self::Memory(catalog) => Ok(catalog.get(id).cloned()),
        }
    }

    /// Up to eight products similar to `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` is unknown.
    pub async fn similar(&self, id: ProductId) -> Result<Vec<Product>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).similar(id).await,
            Self::Memory(catalog) => catalog.similar(id),
        }
    }

    /// Products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).search(query).await,
            Self::Memory(catalog) => Ok(catalog.search(query)),
        }
    }

    /// Check that the store can serve requests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(pool) => ProductRepository::new(pool).ping().await,
            Self::Memory(_) => Ok(()),
        }
    }
}

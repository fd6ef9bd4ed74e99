//! Product repository over the JSONB document table.
//!
//! Products are stored whole in `storefront.product.document`. The `id`
//! column is authoritative; timestamps come from the row, not the document.
//! `seq` records insertion order, which is the catalog's natural order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use urban_threadz_core::catalog::{
    CatalogDocument, CatalogQuery, Product, ProductWithReviews, Review, ReviewRecord,
    SIMILAR_PRODUCTS_LIMIT,
};
use urban_threadz_core::{CustomerId, ProductId, Rating, ReviewId};

use super::RepositoryError;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    document: Json<Product>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let mut product = row.document.0;
        product.id = row.id;
        product.created_at = Some(row.created_at);
        product.updated_at = Some(row.updated_at);
        product
    }
}

/// Internal row type for review queries, joined with the customer name.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    customer_id: CustomerId,
    rating: i16,
    title: Option<String>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    customer_name: Option<String>,
}

impl ReviewRow {
    /// Split into the stored review and the reviewer's name.
    fn into_parts(self) -> Result<(ReviewRecord, Option<String>), RepositoryError> {
        let rating = Rating::new(i64::from(self.rating)).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating for review {}: {e}", self.id))
        })?;

        let record = ReviewRecord {
            id: self.id,
            product: self.product_id,
            customer: self.customer_id,
            rating,
            title: self.title,
            comment: self.comment,
            created_at: self.created_at,
        };
        Ok((record, self.customer_name))
    }
}

/// Rows written by [`ProductRepository::import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub products: usize,
    pub customers: usize,
    pub reviews: usize,
}

/// Repository for product, customer and review database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, document, created_at, updated_at
            FROM storefront.product
            ORDER BY seq
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, document, created_at, updated_at
            FROM storefront.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Reviews for the given products, newest first, with customer names.
    async fn reviews_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<(ReviewRecord, Option<String>)>, RepositoryError> {
        let ids: Vec<Uuid> = product_ids.iter().map(ProductId::as_uuid).collect();

        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT r.id, r.product_id, r.customer_id, r.rating, r.title, r.comment,
                   r.created_at, c.name AS customer_name
            FROM storefront.review r
            LEFT JOIN storefront.customer c ON c.id = r.customer_id
            WHERE r.product_id = ANY($1)
            ORDER BY r.created_at DESC
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ReviewRow::into_parts).collect()
    }

    /// List every product with its reviews attached.
    ///
    /// Listings identify reviewers by id only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored rating is out of range.
    pub async fn list_with_reviews(&self) -> Result<Vec<ProductWithReviews>, RepositoryError> {
        let products = self.list().await?;
        let ids: Vec<ProductId> = products.iter().map(|product| product.id).collect();

        let mut by_product: HashMap<ProductId, Vec<Review>> = HashMap::new();
        for (record, _) in self.reviews_for(&ids).await? {
            by_product
                .entry(record.product)
                .or_default()
                .push(Review::from_record(record, None));
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let reviews = by_product.remove(&product.id).unwrap_or_default();
                ProductWithReviews::new(product, reviews)
            })
            .collect())
    }

    /// Get a product with its reviews, naming each reviewer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored rating is out of range.
    pub async fn get_with_reviews(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithReviews>, RepositoryError> {
        let Some(product) = self.get(id).await? else {
            return Ok(None);
        };

        let reviews = self
            .reviews_for(&[id])
            .await?
            .into_iter()
            .map(|(record, name)| Review::from_record(record, name))
            .collect();

        Ok(Some(ProductWithReviews::new(product, reviews)))
    }

    /// Products with the same category list or a shared tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reference product does not
    /// exist, or `RepositoryError::Database` if a query fails.
    pub async fn similar(&self, id: ProductId) -> Result<Vec<Product>, RepositoryError> {
        let reference = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let limit = i64::try_from(SIMILAR_PRODUCTS_LIMIT).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, document, created_at, updated_at
            FROM storefront.product
            WHERE id <> $1
              AND (
                  (jsonb_array_length($2) > 0 AND document->'category' = $2)
                  OR COALESCE(document->'tags', '[]'::jsonb) ?| $3
              )
            ORDER BY seq
            LIMIT $4
            ",
        )
        .bind(id)
        .bind(Json(&reference.category))
        .bind(&reference.tags)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Products matching a catalog query, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.list().await?;
        products.retain(|product| query.matches(product));
        Ok(products)
    }

    /// Insert or replace every product, customer and review in `catalog`.
    ///
    /// Runs in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is written in that case.
    pub async fn import(&self, catalog: &CatalogDocument) -> Result<ImportSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for product in &catalog.products {
            sqlx::query(
                r"
                INSERT INTO storefront.product (id, document)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE
                SET document = EXCLUDED.document, updated_at = now()
                ",
            )
            .bind(product.id)
            .bind(Json(product))
            .execute(&mut *tx)
            .await?;
        }

        for customer in &catalog.customers {
            sqlx::query(
                r"
                INSERT INTO storefront.customer (id, name)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
                ",
            )
            .bind(customer.id)
            .bind(&customer.name)
            .execute(&mut *tx)
            .await?;
        }

        for review in &catalog.reviews {
            sqlx::query(
                r"
                INSERT INTO storefront.review
                    (id, product_id, customer_id, rating, title, comment, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE
                SET rating = EXCLUDED.rating,
                    title = EXCLUDED.title,
                    comment = EXCLUDED.comment
                ",
            )
            .bind(review.id)
            .bind(review.product)
            .bind(review.customer)
            .bind(i16::from(review.rating.value()))
            .bind(&review.title)
            .bind(&review.comment)
            .bind(review.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ImportSummary {
            products: catalog.products.len(),
            customers: catalog.customers.len(),
            reviews: catalog.reviews.len(),
        })
    }

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self.pool).await?;
        Ok(())
    }
}

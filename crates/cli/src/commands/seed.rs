//! Seed the database from a catalog file.
//!
//! The file is validated before any connection is made; a file with any
//! issue is rejected as a whole. Rows are upserted in one transaction, so
//! seeding the same file twice is harmless.

use std::path::Path;

use tracing::info;

use urban_threadz_storefront::db::{self, ProductRepository};

/// Validate and load a catalog file.
///
/// # Arguments
///
/// * `path` - Catalog file (JSON or YAML)
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file is invalid,
/// or database operations fail.
pub async fn catalog(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let document = super::validate::catalog(path)?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = ProductRepository::new(&pool).import(&document).await?;

    info!(
        products = summary.products,
        customers = summary.customers,
        reviews = summary.reviews,
        "Seeding complete"
    );
    Ok(())
}

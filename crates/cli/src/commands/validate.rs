//! Catalog validation command.
//!
//! Reads a catalog file and reports every consistency problem: variation
//! options without values, price-determining types that are not declared,
//! duplicate combinations, reviews for unknown products and the like.

use std::path::Path;

use tracing::{error, info};

use urban_threadz_core::catalog::{CatalogDocument, DocumentIssue};
use urban_threadz_storefront::store::read_catalog_document;

/// Read `path` and return the document with its issues.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(
    path: &Path,
) -> Result<(CatalogDocument, Vec<DocumentIssue>), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Loading catalog");
    let document = read_catalog_document(path)?;
    let issues = document.validate();
    Ok((document, issues))
}

/// Fail with a summary if `issues` is not empty, logging each one.
///
/// # Errors
///
/// Returns an error counting the issues.
pub fn ensure_valid(issues: &[DocumentIssue]) -> Result<(), Box<dyn std::error::Error>> {
    if issues.is_empty() {
        return Ok(());
    }

    error!("Catalog validation failed:");
    for issue in issues {
        error!("  - {issue}");
    }
    Err(format!("{} validation errors found", issues.len()).into())
}

/// Validate a catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or has any issue.
pub fn catalog(path: &Path) -> Result<CatalogDocument, Box<dyn std::error::Error>> {
    let (document, issues) = load(path)?;
    ensure_valid(&issues)?;

    info!(
        products = document.products.len(),
        customers = document.customers.len(),
        reviews = document.reviews.len(),
        "Catalog is valid"
    );
    Ok(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn catalog_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_catalog_passes() {
        let file = catalog_file(
            &serde_json::json!({
                "products": [{
                    "_id": "5d8e3f2a-1b4c-4a6d-9e0f-7a8b9c0d1e2f",
                    "name": "Oversized Hoodie",
                    "brand": "UrbanThreadz",
                    "price": 65,
                    "variationOptions": [{ "type": "color", "values": ["grey", "black"] }],
                    "priceDeterminedBy": ["color"],
                    "variationCombinations": [
                        { "options": { "color": "grey" }, "price": 65 },
                        { "options": { "color": "black" }, "price": 70 }
                    ]
                }]
            })
            .to_string(),
        );

        let document = catalog(file.path()).unwrap();
        assert_eq!(document.products.len(), 1);
    }

    #[test]
    fn test_inconsistent_catalog_fails() {
        let file = catalog_file(
            &serde_json::json!({
                "products": [{
                    "_id": "5d8e3f2a-1b4c-4a6d-9e0f-7a8b9c0d1e2f",
                    "name": "Oversized Hoodie",
                    "brand": "UrbanThreadz",
                    "price": 65,
                    "variationOptions": [{ "type": "color", "values": ["grey"] }],
                    "priceDeterminedBy": ["color", "size"]
                }]
            })
            .to_string(),
        );

        let (_, issues) = load(file.path()).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(catalog(file.path()).is_err());
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/data/catalog.json");
        assert!(catalog(&path).is_ok());
    }
}

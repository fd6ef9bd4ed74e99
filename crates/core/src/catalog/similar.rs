//! "You might also like" matching.
//!
//! A product is similar to the reference when it has the same category list
//! or shares at least one tag. The category comparison is whole-list
//! equality, which is how the document store compares array fields; an empty
//! category list never counts as a match.

use super::product::Product;

/// Maximum number of similar products returned.
pub const SIMILAR_PRODUCTS_LIMIT: usize = 8;

/// Whether `candidate` should be suggested alongside `reference`.
///
/// A product is never similar to itself.
#[must_use]
pub fn is_similar(reference: &Product, candidate: &Product) -> bool {
    if candidate.id == reference.id {
        return false;
    }

    let same_category = !reference.category.is_empty() && candidate.category == reference.category;
    let shared_tag = candidate
        .tags
        .iter()
        .any(|tag| reference.tags.contains(tag));

    same_category || shared_tag
}

/// Up to `limit` products similar to `reference`, in catalog order.
pub fn similar_products<'a>(
    reference: &Product,
    catalog: impl IntoIterator<Item = &'a Product>,
    limit: usize,
) -> Vec<&'a Product> {
    catalog
        .into_iter()
        .filter(|candidate| is_similar(reference, candidate))
        .take(limit)
        .collect()
}

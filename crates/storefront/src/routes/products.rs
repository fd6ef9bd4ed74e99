//! Product route handlers.
//!
//! Listing and detail responses carry reviews and a rating summary; similar
//! and search results are bare products.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use urban_threadz_core::ProductId;
use urban_threadz_core::catalog::{
    CatalogQuery, Offer, Product, ProductWithReviews, PurchaseMode, Resolution, Selection,
    Unresolved,
};

use super::{JsonBody, parse_product_id};
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product with reviews.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductWithReviews>>> {
    let products = state
        .store()
        .list_with_reviews()
        .await
        .map_err(AppError::store("Failed to fetch products"))?;
    Ok(Json(products))
}

/// Display one product with named reviewers.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductWithReviews>> {
    let id = parse_product_id(&id)?;
    let product = state
        .store()
        .get_with_reviews(id)
        .await
        .map_err(AppError::store("Failed to fetch product"))?
        .ok_or_else(AppError::product_not_found)?;
    Ok(Json(product))
}

/// Up to eight products similar to the given one.
#[instrument(skip(state))]
pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let id = parse_product_id(&id)?;
    match state.store().similar(id).await {
        Ok(products) => Ok(Json(products)),
        Err(RepositoryError::NotFound) => Err(AppError::product_not_found()),
        Err(e) => Err(AppError::store("Failed to fetch similar products")(e)),
    }
}

/// Search by text and category.
#[instrument(skip(state, query))]
pub async fn search(
    State(state): State<AppState>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!(q = ?query.q, category = ?query.category, "Catalog search");

    let products = state
        .store()
        .search(&query)
        .await
        .map_err(AppError::store("Failed to search products"))?;
    Ok(Json(products))
}

/// Resolve request body.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    /// Chosen values; unchosen types take their first value.
    #[serde(default)]
    pub selection: Selection,
}

/// One purchasable combination, listed in per-combination mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationView {
    pub index: usize,
    pub label: String,
    pub selection: Selection,
    pub offer: Offer,
}

/// Outcome of resolving a selection, as the product page needs it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionView {
    pub product_id: ProductId,
    /// The selection after defaults were filled in.
    pub selection: Selection,
    pub purchase_mode: PurchaseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combination_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<Offer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<Unresolved>,
    pub can_add_to_cart: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub combinations: Vec<CombinationView>,
}

impl ResolutionView {
    /// Build the view for `product` and an already defaulted `selection`.
    #[must_use]
    pub fn new(product: &Product, selection: Selection) -> Self {
        let resolution = product.resolve(&selection);
        let can_add_to_cart = resolution.can_add_to_cart();
        let purchase_mode = product.purchase_mode();

        let combinations = match purchase_mode {
            PurchaseMode::SingleQuantity => Vec::new(),
            PurchaseMode::PerCombination => product
                .variation_combinations
                .iter()
                .enumerate()
                .map(|(index, combination)| CombinationView {
                    index,
                    label: combination.label(&product.price_determined_by),
                    selection: combination
                        .options
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str()))
                        .collect(),
                    offer: Offer::from_combination(combination),
                })
                .collect(),
        };

        let (combination_index, offer, unresolved) = match resolution {
            Resolution::Base(offer) => (None, Some(offer), None),
            Resolution::Combination { index, offer } => (Some(index), Some(offer), None),
            Resolution::Unresolved(reason) => (None, None, Some(reason)),
        };

        Self {
            product_id: product.id,
            selection,
            purchase_mode,
            combination_index,
            offer,
            unresolved,
            can_add_to_cart,
            combinations,
        }
    }
}

/// Resolve a variation selection to a price and stock state.
#[instrument(skip(state, selection))]
pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(ResolveRequest { selection }): JsonBody<ResolveRequest>,
) -> Result<Json<ResolutionView>> {
    let id = parse_product_id(&id)?;

    let product = state
        .store()
        .get(id)
        .await
        .map_err(AppError::store("Failed to fetch product"))?
        .ok_or_else(AppError::product_not_found)?;

    selection.validate(&product.variation_options)?;
    let selection = selection.with_defaults(&product.variation_options);

    Ok(Json(ResolutionView::new(&product, selection)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use urban_threadz_core::Price;
    use urban_threadz_core::catalog::{VariationCombination, VariationOption};

    use super::*;

    fn jacket() -> Product {
        let mut product = Product::new(
            ProductId::generate(),
            "Bomber Jacket",
            "UrbanThreadz",
            Price::from_units(120),
        );
        product.variation_options = vec![
            VariationOption::new("color", ["black", "olive"]),
            VariationOption::new("size", ["M", "L"]),
        ];
        product.price_determined_by = vec!["color".to_string(), "size".to_string()];
        product.variation_combinations = vec![
            VariationCombination::new([("color", "black"), ("size", "M")], Price::from_units(50)),
            VariationCombination::new([("color", "olive"), ("size", "L")], Price::from_units(55)),
        ];
        product
    }

    #[test]
    fn test_view_for_matching_selection() {
        let product = jacket();
        let view = ResolutionView::new(&product, product.default_selection());

        assert_eq!(view.combination_index, Some(0));
        assert_eq!(view.offer.unwrap().price, Price::from_units(50));
        assert!(view.can_add_to_cart);
        assert_eq!(view.purchase_mode, PurchaseMode::PerCombination);
        assert_eq!(view.combinations.len(), 2);
        assert_eq!(view.combinations[1].label, "olive / L");
    }

    #[test]
    fn test_view_for_unmatched_selection() {
        let product = jacket();
        let selection = Selection::new().with("color", "olive").with("size", "M");
        let view = ResolutionView::new(&product, selection);

        assert!(view.offer.is_none());
        assert!(!view.can_add_to_cart);
        assert_eq!(view.unresolved, Some(Unresolved::NoMatchingCombination));

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["unresolved"]["reason"], "noMatchingCombination");
        assert!(value.get("offer").is_none());
    }
}

//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use urban_threadz_core::{ProductId, Wishlist, WishlistEntry};

use super::{JsonBody, parse_product_id};
use crate::error::{AppError, Result};
use crate::models::SessionWishlist;
use crate::state::AppState;

/// Wishlist as returned by the listing endpoints.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<WishlistEntry>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.entries().to_vec(),
            count: wishlist.count(),
        }
    }
}

/// Membership of one product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    pub product_id: ProductId,
    pub contains: bool,
    pub count: usize,
}

/// Wishlist request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: String,
}

/// Look up the entry for a product id from a request.
async fn entry_for(state: &AppState, product_id: &str) -> Result<WishlistEntry> {
    let product_id = parse_product_id(product_id)?;
    let product = state
        .store()
        .get(product_id)
        .await
        .map_err(AppError::store("Failed to fetch product"))?
        .ok_or_else(AppError::product_not_found)?;
    Ok(WishlistEntry::from(&product))
}

/// Display the session's wishlist.
#[instrument(skip(session))]
pub async fn show(session: SessionWishlist) -> Json<WishlistView> {
    Json(WishlistView::from(&session.wishlist))
}

/// Add a product to the wishlist.
#[instrument(skip(state, session, body))]
pub async fn add(
    State(state): State<AppState>,
    mut session: SessionWishlist,
    body: JsonBody<WishlistRequest>,
) -> Result<Json<WishlistView>> {
    let JsonBody(request) = body;
    let entry = entry_for(&state, &request.product_id).await?;

    session.wishlist.add(entry);
    session.save().await?;
    Ok(Json(WishlistView::from(&session.wishlist)))
}

/// Add the product if absent, remove it if present.
#[instrument(skip(state, session, body))]
pub async fn toggle(
    State(state): State<AppState>,
    mut session: SessionWishlist,
    body: JsonBody<WishlistRequest>,
) -> Result<Json<MembershipView>> {
    let JsonBody(request) = body;
    let entry = entry_for(&state, &request.product_id).await?;
    let product_id = entry.product_id;

    let contains = session.wishlist.toggle(entry);
    session.save().await?;
    tracing::info!(%product_id, contains, "Wishlist toggled");

    Ok(Json(MembershipView {
        product_id,
        contains,
        count: session.wishlist.count(),
    }))
}

/// Whether a product is on the wishlist.
#[instrument(skip(session))]
pub async fn contains(
    session: SessionWishlist,
    Path(product_id): Path<String>,
) -> Result<Json<MembershipView>> {
    let product_id = parse_product_id(&product_id)?;
    Ok(Json(MembershipView {
        product_id,
        contains: session.wishlist.contains(product_id),
        count: session.wishlist.count(),
    }))
}

/// Remove a product from the wishlist.
#[instrument(skip(session))]
pub async fn remove(
    mut session: SessionWishlist,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistView>> {
    let product_id = parse_product_id(&product_id)?;

    if session.wishlist.remove(product_id) {
        session.save().await?;
    }

    Ok(Json(WishlistView::from(&session.wishlist)))
}

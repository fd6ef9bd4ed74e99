//! Cart route handlers.
//!
//! The cart lives in the session. Every handler answers with the whole cart
//! and its checkout summary so the client never has to recompute totals.
//! The view is built before the session is saved, so a cart whose totals
//! cannot be computed is never stored.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use urban_threadz_core::catalog::Selection;
use urban_threadz_core::{Cart, CartError, CartLine, CheckoutPolicy, CheckoutSummary, Price};

use super::{JsonBody, parse_product_id};
use crate::error::{AppError, Result};
use crate::models::SessionCart;
use crate::state::AppState;

/// Cart as returned by every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub count: u32,
    pub total: Price,
    pub summary: CheckoutSummary,
}

impl CartView {
    /// Summarize `cart` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the totals overflow.
    pub fn new(cart: &Cart, policy: &CheckoutPolicy) -> std::result::Result<Self, CartError> {
        let summary = CheckoutSummary::for_cart(cart, policy)?;
        Ok(Self {
            items: cart.lines().to_vec(),
            count: cart.count(),
            total: summary.subtotal,
            summary,
        })
    }
}

const fn default_quantity() -> u32 {
    1
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Update quantity request body.
///
/// An omitted `size` or `color` matches any value, so without either every
/// line of the product is updated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Zero or negative removes.
    pub quantity: i64,
}

/// Display the session's cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: SessionCart) -> Result<Json<CartView>> {
    Ok(Json(CartView::new(&session.cart, state.checkout_policy())?))
}

/// Add a product variant to the cart.
#[instrument(skip(state, session, body))]
pub async fn add(
    State(state): State<AppState>,
    mut session: SessionCart,
    body: JsonBody<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let JsonBody(request) = body;
    let product_id = parse_product_id(&request.product_id)?;

    let product = state
        .store()
        .get(product_id)
        .await
        .map_err(AppError::store("Failed to fetch product"))?
        .ok_or_else(AppError::product_not_found)?;

    let line = CartLine::for_selection(&product, request.selection, request.quantity)?;
    tracing::info!(
        product_id = %line.product_id,
        size = ?line.size,
        color = ?line.color,
        quantity = line.quantity,
        "Adding to cart"
    );

    session.cart.add(line)?;
    let view = CartView::new(&session.cart, state.checkout_policy())?;
    session.save().await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Change a line's quantity (zero removes).
#[instrument(skip(state, session, body))]
pub async fn update(
    State(state): State<AppState>,
    mut session: SessionCart,
    body: JsonBody<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let JsonBody(request) = body;
    let product_id = parse_product_id(&request.product_id)?;
    let quantity = u32::try_from(request.quantity.max(0)).unwrap_or(u32::MAX);

    let found = session.cart.update_variant(
        product_id,
        request.size.as_deref(),
        request.color.as_deref(),
        quantity,
    )?;
    if !found {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    let view = CartView::new(&session.cart, state.checkout_policy())?;
    session.save().await?;
    Ok(Json(view))
}

/// Remove every line of a product.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    mut session: SessionCart,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>> {
    let product_id = parse_product_id(&product_id)?;

    let removed = session.cart.remove(product_id);
    let view = CartView::new(&session.cart, state.checkout_policy())?;
    if removed {
        session.save().await?;
    }

    Ok(Json(view))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    mut session: SessionCart,
) -> Result<Json<CartView>> {
    session.cart.clear();
    let view = CartView::new(&session.cart, state.checkout_policy())?;
    session.save().await?;
    Ok(Json(view))
}

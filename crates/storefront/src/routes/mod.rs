//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                              - API greeting
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (product store)
//!
//! # Products
//! GET    /api/products/all              - All products with reviews and rating
//! GET    /api/products/search           - Search by ?q= and ?category=
//! GET    /api/products/{id}             - Product with named reviewers
//! GET    /api/products/{id}/similar     - Up to 8 similar products
//! POST   /api/products/{id}/resolve     - Resolve a variation selection
//!
//! # Cart (session)
//! GET    /api/cart                      - Cart with checkout summary
//! DELETE /api/cart                      - Empty the cart
//! POST   /api/cart/items                - Add a product variant
//! POST   /api/cart/items/update         - Change a quantity (0 removes)
//! DELETE /api/cart/items/{productId}    - Remove every line of a product
//!
//! # Wishlist (session)
//! GET    /api/wishlist                  - Saved products
//! POST   /api/wishlist                  - Save a product
//! POST   /api/wishlist/toggle           - Save or unsave a product
//! GET    /api/wishlist/{productId}      - Membership check
//! DELETE /api/wishlist/{productId}      - Unsave a product
//! ```

pub mod cart;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    routing::{get, post},
};
use serde::de::DeserializeOwned;

use urban_threadz_core::ProductId;

use crate::error::AppError;
use crate::state::AppState;

/// Parse a product id from a path or body.
///
/// A malformed id names no product, so it is reported like an unknown one.
///
/// # Errors
///
/// Returns `AppError::NotFound` if `raw` is not a valid id.
pub fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw.trim()).map_err(|_| AppError::product_not_found())
}

/// JSON request body whose rejections use the API's JSON error shape.
///
/// Syntactically valid JSON of the wrong shape is a 422; anything else
/// (bad syntax, missing content type) is a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(e)) => Err(AppError::Validation(e.body_text())),
            Err(e) => Err(AppError::BadRequest(e.body_text())),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(products::index))
        .route("/search", get(products::search))
        .route("/{id}", get(products::show))
        .route("/{id}/similar", get(products::similar))
        .route("/{id}/resolve", post(products::resolve))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/update", post(cart::update))
        .route("/items/{product_id}", axum::routing::delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).post(wishlist::add))
        .route("/toggle", post(wishlist::toggle))
        .route(
            "/{product_id}",
            get(wishlist::contains).delete(wishlist::remove),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // API greeting and health checks
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        // Product routes
        .nest("/api/products", product_routes())
        // Session-scoped containers
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
}

//! Session-related types.
//!
//! Carts and wishlists live in the session. Handlers load them through the
//! extractors below, change them, and save them back before responding.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use urban_threadz_core::{Cart, Wishlist};

use crate::error::AppError;

/// Session keys for shopper data.
pub mod keys {
    /// Key for the session's cart.
    pub const CART: &str = "cart";

    /// Key for the session's wishlist.
    pub const WISHLIST: &str = "wishlist";
}

/// The session's cart, loaded at extraction.
///
/// Call [`SessionCart::save`] after changing it.
pub struct SessionCart {
    session: Session,
    pub cart: Cart,
}

impl SessionCart {
    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session.insert(keys::CART, &self.cart).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let cart = session.get::<Cart>(keys::CART).await?.unwrap_or_default();
        Ok(Self { session, cart })
    }
}

/// The session's wishlist, loaded at extraction.
///
/// Call [`SessionWishlist::save`] after changing it.
pub struct SessionWishlist {
    session: Session,
    pub wishlist: Wishlist,
}

impl SessionWishlist {
    /// Write the wishlist back to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session.insert(keys::WISHLIST, &self.wishlist).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionWishlist
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let wishlist = session
            .get::<Wishlist>(keys::WISHLIST)
            .await?
            .unwrap_or_default();
        Ok(Self { session, wishlist })
    }
}

/// Get the session from extensions (set by `SessionManagerLayer`).
fn session_from_parts(parts: &Parts) -> Result<Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))
}

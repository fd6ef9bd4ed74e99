//! Request-scoped models for storefront handlers.

pub mod session;

pub use session::{SessionCart, SessionWishlist, keys as session_keys};

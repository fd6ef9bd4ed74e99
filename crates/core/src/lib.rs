//! Urban Threadz Core - Catalog and shopping types.
//!
//! This crate provides the domain model shared by the storefront and the
//! command-line tools:
//! - `storefront` - JSON API over the product catalog
//! - `cli` - Migrations, catalog validation and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, categories and ratings
//! - [`catalog`] - Product documents, variation resolution, reviews, search
//! - [`cart`] - Cart lines and the cart container
//! - [`wishlist`] - Wishlist container
//! - [`checkout`] - Shipping and tax summary for a cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartError, CartLine, LineKey};
pub use checkout::{CheckoutPolicy, CheckoutSummary};
pub use types::*;
pub use wishlist::{Wishlist, WishlistEntry};

//! Core types for Urban Threadz.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod rating;

pub use category::{Category, CategoryError};
pub use id::*;
pub use price::{Price, PriceError};
pub use rating::{Rating, RatingError};

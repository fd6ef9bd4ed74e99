//! Order summary shown with the cart: subtotal, shipping, tax and total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartError};
use crate::types::Price;

/// Shipping and tax rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Price,
    /// Shipping charged below the threshold.
    pub flat_shipping: Price,
    /// Sales tax rate applied to the subtotal, e.g. `0.08`.
    pub tax_rate: Decimal,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_units(100),
            flat_shipping: Price::from_units(10),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// Totals for a cart under a [`CheckoutPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    /// How much more qualifies for free shipping, when shipping is charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_to_free_shipping: Option<Price>,
}

impl CheckoutSummary {
    /// Compute the summary for `cart`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if any amount overflows.
    pub fn for_cart(cart: &Cart, policy: &CheckoutPolicy) -> Result<Self, CartError> {
        let subtotal = cart.total()?;
        let free_shipping = cart.is_empty() || subtotal > policy.free_shipping_threshold;
        let shipping = if free_shipping {
            Price::ZERO
        } else {
            policy.flat_shipping
        };
        let tax = subtotal
            .checked_scaled(policy.tax_rate)
            .ok_or(CartError::TotalTooLarge)?
            .round_to_cents();
        let total =
            Price::checked_sum([subtotal, shipping, tax]).ok_or(CartError::TotalTooLarge)?;

        Ok(Self {
            subtotal,
            shipping,
            tax,
            total,
            amount_to_free_shipping: (!free_shipping)
                .then(|| policy.free_shipping_threshold.saturating_sub(subtotal)),
        })
    }
}

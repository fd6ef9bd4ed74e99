//! Shopping cart container.
//!
//! A cart is a list of lines keyed by `(product, size, color)`. Adding a line
//! that already exists sums the quantities; a quantity reaching zero removes
//! the line. A change that would make the total unrepresentable is rejected
//! and leaves the cart as it was. The cart itself does no I/O: the
//! storefront keeps one per session and saves it after each change.

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, Selection, VariationError};
use crate::types::{Price, ProductId};

/// Variation type whose value is recorded as a line's size.
pub const SIZE_OPTION: &str = "size";
/// Variation type whose value is recorded as a line's color.
pub const COLOR_OPTION: &str = "color";

/// Errors raised when building or adding cart lines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Lines must hold at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The resolved offer is not in stock.
    #[error("out of stock")]
    OutOfStock,

    /// Merging would push a line's quantity past `u32::MAX`.
    #[error("quantity is too large")]
    QuantityTooLarge,

    /// The cart total would not fit in a price.
    #[error("cart total is too large")]
    TotalTooLarge,

    /// The selection is invalid or resolves to no combination.
    #[error(transparent)]
    Variation(#[from] VariationError),
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// One product variant in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    /// Unit price at the time the line was added.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// The line's identity.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the amount overflows.
    pub fn line_total(&self) -> Result<Price, CartError> {
        self.price
            .checked_times(self.quantity)
            .ok_or(CartError::TotalTooLarge)
    }

    /// Build a line for `quantity` units of `product` with `selection`.
    ///
    /// Unchosen variation types take their first value. The line uses the
    /// resolved combination's price, never the base price when a
    /// combination is required.
    ///
    /// # Errors
    ///
    /// - `ZeroQuantity` when `quantity` is 0
    /// - `Variation` when the selection names undeclared options or values,
    ///   or when no combination is selected
    /// - `OutOfStock` when the resolved offer is out of stock
    pub fn for_selection(
        product: &Product,
        selection: Selection,
        quantity: u32,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        selection.validate(&product.variation_options)?;
        let selection = selection.with_defaults(&product.variation_options);
        let offer = product.resolve(&selection).into_offer()?;
        if !offer.in_stock {
            return Err(CartError::OutOfStock);
        }

        let image = offer
            .image
            .as_ref()
            .map(|image| image.url.clone())
            .filter(|url| !url.is_empty())
            .or_else(|| product.primary_image().map(String::from));

        Ok(Self {
            product_id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: offer.price,
            original_price: offer.original_price,
            size: selection.get(SIZE_OPTION).map(String::from),
            color: selection.get(COLOR_OPTION).map(String::from),
            image,
            sku: offer.sku,
            quantity,
        })
    }
}

/// A session's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line, merging with an existing line for the same variant.
    ///
    /// # Errors
    ///
    /// - `ZeroQuantity` if the line has no units
    /// - `QuantityTooLarge` if the merged quantity overflows
    /// - `TotalTooLarge` if the cart total would overflow
    pub fn add(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let key = line.key();
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|existing| existing.matches(&key)) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(CartError::QuantityTooLarge)?;
            }
            None => lines.push(line),
        }
        self.commit(lines)
    }

    /// Set the quantity of every line for `product_id`; zero removes them.
    ///
    /// Returns `false` if the cart has no line for the product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the cart total would overflow.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, CartError> {
        self.update_where(|line| line.product_id == product_id, quantity)
    }

    /// Set the quantity of a single variant line; zero removes it.
    ///
    /// Returns `false` if there is no such line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the cart total would overflow.
    pub fn update_line(&mut self, key: &LineKey, quantity: u32) -> Result<bool, CartError> {
        self.update_where(|line| line.matches(key), quantity)
    }

    /// Set the quantity of the product's lines with the given size and
    /// color; zero removes them. An omitted size or color matches any value.
    ///
    /// Returns `false` if no line matches.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the cart total would overflow.
    pub fn update_variant(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> Result<bool, CartError> {
        self.update_where(
            |line| {
                line.product_id == product_id
                    && size.is_none_or(|wanted| line.size.as_deref() == Some(wanted))
                    && color.is_none_or(|wanted| line.color.as_deref() == Some(wanted))
            },
            quantity,
        )
    }

    fn update_where(
        &mut self,
        predicate: impl Fn(&CartLine) -> bool,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let found = self.lines.iter().any(&predicate);
        let mut lines = self.lines.clone();
        if quantity == 0 {
            lines.retain(|line| !predicate(line));
        } else {
            for line in lines.iter_mut().filter(|line| predicate(line)) {
                line.quantity = quantity;
            }
        }
        self.commit(lines)?;
        Ok(found)
    }

    /// Replace the lines if their total is representable.
    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        total_of(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Remove every line for `product_id`.
    ///
    /// Returns `false` if nothing was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove a single variant line.
    ///
    /// Returns `false` if nothing was removed.
    pub fn remove_line(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        self.lines.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of price times quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the amount overflows.
    pub fn total(&self) -> Result<Price, CartError> {
        total_of(&self.lines)
    }
}

fn total_of(lines: &[CartLine]) -> Result<Price, CartError> {
    lines.iter().try_fold(Price::ZERO, |total, line| {
        total
            .checked_add(line.line_total()?)
            .ok_or(CartError::TotalTooLarge)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::{VariationCombination, VariationOption};

    fn line(product_id: ProductId, size: &str, color: &str, price: u32, quantity: u32) -> CartLine {
        CartLine {
            product_id,
            name: "Oversized Tee".to_string(),
            brand: "UrbanThreadz".to_string(),
            price: Price::from_units(price),
            original_price: None,
            size: Some(size.to_string()),
            color: Some(color.to_string()),
            image: None,
            sku: None,
            quantity,
        }
    }

    fn jacket() -> Product {
        let mut product = Product::new(
            ProductId::generate(),
            "Cropped Jacket",
            "UrbanThreadz",
            Price::from_units(120),
        );
        product.variation_options = vec![
            VariationOption::new("color", ["black", "white"]),
            VariationOption::new("size", ["M", "L"]),
        ];
        product.price_determined_by = vec!["color".to_string(), "size".to_string()];
        product.variation_combinations = vec![
            VariationCombination::new([("color", "black"), ("size", "M")], Price::from_units(50)),
            VariationCombination::new([("color", "white"), ("size", "L")], Price::from_units(55)),
        ];
        product
    }

    #[test]
    fn test_add_same_variant_merges_quantity() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 45, 1)).unwrap();
        cart.add(line(id, "M", "black", 45, 2)).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_different_variants_are_separate_lines() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 45, 1)).unwrap();
        cart.add(line(id, "L", "black", 45, 1)).unwrap();
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut cart = Cart::new();
        let err = cart.add(line(ProductId::generate(), "M", "black", 45, 0));
        assert_eq!(err, Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_removes_and_total_excludes() {
        let blazer = ProductId::generate();
        let tee = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(blazer, "M", "black", 189, 1)).unwrap();
        cart.add(line(tee, "L", "white", 45, 2)).unwrap();
        assert_eq!(cart.total(), Ok(Price::from_units(279)));

        assert_eq!(cart.update_quantity(blazer, 0), Ok(true));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), Ok(Price::from_units(90)));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 10, 1)).unwrap();
        assert_eq!(cart.update_quantity(id, 4), Ok(true));
        assert_eq!(cart.count(), 4);
        assert_eq!(cart.update_quantity(ProductId::generate(), 2), Ok(false));
    }

    #[test]
    fn test_line_level_edits_leave_other_variants() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 10, 1)).unwrap();
        cart.add(line(id, "L", "black", 10, 1)).unwrap();

        let key = cart.lines()[1].key();
        assert_eq!(cart.update_line(&key, 5), Ok(true));
        assert_eq!(cart.count(), 6);
        assert!(cart.remove_line(&key));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_remove_drops_all_lines_of_product() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 10, 1)).unwrap();
        cart.add(line(id, "L", "white", 10, 1)).unwrap();
        assert!(cart.remove(id));
        assert!(cart.is_empty());
        assert!(!cart.remove(id));
    }

    #[test]
    fn test_line_for_selection_uses_combination_price() {
        let product = jacket();
        let selection = Selection::new().with("color", "white").with("size", "L");
        let line = CartLine::for_selection(&product, selection, 2).unwrap();
        assert_eq!(line.price, Price::from_units(55));
        assert_eq!(line.size.as_deref(), Some("L"));
        assert_eq!(line.color.as_deref(), Some("white"));
        assert_eq!(line.line_total(), Ok(Price::from_units(110)));
    }

    #[test]
    fn test_line_for_selection_applies_defaults() {
        let product = jacket();
        let line = CartLine::for_selection(&product, Selection::new(), 1).unwrap();
        assert_eq!(line.color.as_deref(), Some("black"));
        assert_eq!(line.size.as_deref(), Some("M"));
        assert_eq!(line.price, Price::from_units(50));
    }

    #[test]
    fn test_line_for_unmatched_selection_is_rejected() {
        let product = jacket();
        let selection = Selection::new().with("color", "white").with("size", "M");
        let err = CartLine::for_selection(&product, selection, 1).unwrap_err();
        assert_eq!(err, CartError::Variation(VariationError::NoCombinationSelected));
        assert_eq!(err.to_string(), "select all required options");
    }

    #[test]
    fn test_line_for_out_of_stock_combination_is_rejected() {
        let mut product = jacket();
        product.variation_combinations[1].in_stock = false;
        let selection = Selection::new().with("color", "white").with("size", "L");
        assert_eq!(
            CartLine::for_selection(&product, selection, 1),
            Err(CartError::OutOfStock)
        );
    }

    fn pricey_line(product_id: ProductId, quantity: u32) -> CartLine {
        let mut pricey = line(product_id, "M", "black", 0, quantity);
        pricey.price = Price::new(Decimal::from_i128_with_scale(10_i128.pow(21), 0)).unwrap();
        pricey
    }

    #[test]
    fn test_add_rejects_overflowing_total_and_keeps_cart() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 45, 1)).unwrap();
        let before = cart.clone();

        let err = cart.add(pricey_line(ProductId::generate(), 4_000_000_000));
        assert_eq!(err, Err(CartError::TotalTooLarge));
        assert_eq!(cart, before);
        assert_eq!(cart.total(), Ok(Price::from_units(45)));
    }

    #[test]
    fn test_merge_rejects_quantity_overflow() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 1, u32::MAX)).unwrap();

        let err = cart.add(line(id, "M", "black", 1, 1));
        assert_eq!(err, Err(CartError::QuantityTooLarge));
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_update_rejects_overflowing_total() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(pricey_line(id, 1)).unwrap();

        assert_eq!(
            cart.update_quantity(id, 4_000_000_000),
            Err(CartError::TotalTooLarge)
        );
        assert_eq!(cart.count(), 1);
        assert!(cart.total().is_ok());
    }

    #[test]
    fn test_update_variant_treats_omitted_option_as_any() {
        let id = ProductId::generate();
        let mut cart = Cart::new();
        cart.add(line(id, "M", "black", 10, 1)).unwrap();
        cart.add(line(id, "M", "white", 10, 1)).unwrap();
        cart.add(line(id, "L", "black", 10, 1)).unwrap();

        assert_eq!(cart.update_variant(id, Some("M"), None, 3), Ok(true));
        assert_eq!(cart.count(), 7);

        assert_eq!(cart.update_variant(id, None, Some("black"), 0), Ok(true));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].color.as_deref(), Some("white"));

        assert_eq!(cart.update_variant(id, Some("XL"), None, 2), Ok(false));
    }
}

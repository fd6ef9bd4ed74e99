//! Variation selection and price resolution.
//!
//! A product declares its variation axes (`variationOptions`), the subset of
//! axes that select a distinct SKU (`priceDeterminedBy`) and the SKUs
//! themselves (`variationCombinations`). Given a shopper's selection this
//! module decides which price, original price and stock state apply.
//!
//! Resolution rules:
//!
//! - With no price-determining axes the product's own fields apply and no
//!   combination is consulted.
//! - Otherwise the first combination (in list order) whose options agree with
//!   the selection on every price-determining axis wins. Only those axes are
//!   compared, so extra keys on a combination are ignored and a missing key
//!   never matches.
//! - A selection that does not cover every price-determining axis, or that
//!   matches no combination, resolves to nothing. Callers must not fall back
//!   to the base price in that case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::product::{Image, Product, VariationCombination, VariationOption};
use crate::types::Price;

/// Errors raised while building or using a selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariationError {
    /// The product does not declare this variation type.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The value is not one of the declared values for the type.
    #[error("unknown value {value:?} for option {kind}")]
    UnknownValue {
        /// Variation type.
        kind: String,
        /// Rejected value.
        value: String,
    },

    /// No combination corresponds to the selection.
    #[error("select all required options")]
    NoCombinationSelected,
}

/// A shopper's chosen value per variation type.
///
/// Held in an ordered map so that serialization and iteration are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert without validation.
    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(kind.into(), value.into());
        self
    }

    /// The chosen value for `kind`.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0.get(kind).map(String::as_str)
    }

    /// Iterate over `(type, value)` pairs in type order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether nothing has been chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Choose `value` for `kind`, checking it against the declared options.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` if `kind` is not declared and `UnknownValue`
    /// if `value` is not one of its values.
    pub fn choose(
        &mut self,
        options: &[VariationOption],
        kind: &str,
        value: &str,
    ) -> Result<(), VariationError> {
        let option = options
            .iter()
            .find(|option| option.kind == kind)
            .ok_or_else(|| VariationError::UnknownOption(kind.to_string()))?;

        if !option.allows(value) {
            return Err(VariationError::UnknownValue {
                kind: kind.to_string(),
                value: value.to_string(),
            });
        }

        self.0.insert(kind.to_string(), value.to_string());
        Ok(())
    }

    /// Check every chosen value against the declared options.
    ///
    /// # Errors
    ///
    /// Returns the first `UnknownOption` or `UnknownValue` found.
    pub fn validate(&self, options: &[VariationOption]) -> Result<(), VariationError> {
        let mut checked = Self::new();
        for (kind, value) in self.iter() {
            checked.choose(options, kind, value)?;
        }
        Ok(())
    }

    /// Fill every unchosen variation type with its first declared value.
    ///
    /// Types with an empty values list are left unchosen.
    #[must_use]
    pub fn with_defaults(mut self, options: &[VariationOption]) -> Self {
        for option in options {
            if let Some(default) = option.default_value() {
                self.0
                    .entry(option.kind.clone())
                    .or_insert_with(|| default.to_string());
            }
        }
        self
    }

    /// Price-determining types that have no chosen value, in `keys` order.
    #[must_use]
    pub fn missing(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|key| !self.0.contains_key(key.as_str()))
            .cloned()
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Selection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Price and stock state for a resolved selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub in_stock: bool,
    /// Units on hand. Only combinations track a count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl Offer {
    /// The offer made by the product's own fields.
    #[must_use]
    pub fn base(product: &Product) -> Self {
        Self {
            price: product.price,
            original_price: product.original_price,
            in_stock: product.in_stock,
            stock_count: None,
            sku: None,
            image: None,
        }
    }

    /// The offer made by a single combination.
    #[must_use]
    pub fn from_combination(combination: &VariationCombination) -> Self {
        Self {
            price: combination.price,
            original_price: combination.original_price,
            in_stock: combination.in_stock,
            stock_count: Some(combination.stock_count),
            sku: combination.sku.clone(),
            image: combination.image.clone(),
        }
    }
}

/// Why a selection did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum Unresolved {
    /// Some price-determining types have no chosen value.
    MissingOptions { missing: Vec<String> },
    /// Every price-determining type is chosen but no combination matches.
    NoMatchingCombination,
}

/// Outcome of resolving a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No price-determining types: the product's own fields apply.
    Base(Offer),
    /// The combination at `index` matched.
    Combination { index: usize, offer: Offer },
    /// No combination selected.
    Unresolved(Unresolved),
}

impl Resolution {
    /// The resolved offer, if any.
    #[must_use]
    pub const fn offer(&self) -> Option<&Offer> {
        match self {
            Self::Base(offer) | Self::Combination { offer, .. } => Some(offer),
            Self::Unresolved(_) => None,
        }
    }

    /// Whether a cart add is allowed for this resolution.
    #[must_use]
    pub fn can_add_to_cart(&self) -> bool {
        self.offer().is_some_and(|offer| offer.in_stock)
    }

    /// Take the offer or fail with the "select all required options" error.
    ///
    /// # Errors
    ///
    /// Returns `VariationError::NoCombinationSelected` when unresolved.
    pub fn into_offer(self) -> Result<Offer, VariationError> {
        match self {
            Self::Base(offer) | Self::Combination { offer, .. } => Ok(offer),
            Self::Unresolved(_) => Err(VariationError::NoCombinationSelected),
        }
    }
}

/// How the product page lets the shopper pick quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PurchaseMode {
    /// One quantity selector and one add-to-cart action.
    SingleQuantity,
    /// Each combination is listed with its own price and quantity.
    PerCombination,
}

impl PurchaseMode {
    /// More than one combination needs a per-combination flow, since a
    /// single quantity cannot say which SKU is being bought.
    #[must_use]
    pub const fn for_combinations(combinations: &[VariationCombination]) -> Self {
        if combinations.len() > 1 {
            Self::PerCombination
        } else {
            Self::SingleQuantity
        }
    }
}

/// Find the first combination matching `selection` on every key in `keys`.
#[must_use]
pub fn find_combination<'a>(
    keys: &[String],
    combinations: &'a [VariationCombination],
    selection: &Selection,
) -> Option<(usize, &'a VariationCombination)> {
    combinations.iter().enumerate().find(|(_, combination)| {
        keys.iter().all(|key| {
            match (combination.options.get(key), selection.get(key)) {
                (Some(offered), Some(chosen)) => offered == chosen,
                _ => false,
            }
        })
    })
}

/// Resolve `selection` against a variation schema.
///
/// `base` is the offer used when `price_determined_by` is empty.
#[must_use]
pub fn resolve(
    base: Offer,
    price_determined_by: &[String],
    combinations: &[VariationCombination],
    selection: &Selection,
) -> Resolution {
    if price_determined_by.is_empty() {
        return Resolution::Base(base);
    }

    let missing = selection.missing(price_determined_by);
    if !missing.is_empty() {
        return Resolution::Unresolved(Unresolved::MissingOptions { missing });
    }

    find_combination(price_determined_by, combinations, selection).map_or(
        Resolution::Unresolved(Unresolved::NoMatchingCombination),
        |(index, combination)| Resolution::Combination {
            index,
            offer: Offer::from_combination(combination),
        },
    )
}

impl Product {
    /// The selection a shopper starts with: the first value of every type.
    #[must_use]
    pub fn default_selection(&self) -> Selection {
        Selection::new().with_defaults(&self.variation_options)
    }

    /// Resolve `selection` against this product's variation schema.
    ///
    /// The selection is used as given; apply [`Selection::with_defaults`]
    /// first to get the product page behaviour.
    #[must_use]
    pub fn resolve(&self, selection: &Selection) -> Resolution {
        resolve(
            Offer::base(self),
            &self.price_determined_by,
            &self.variation_combinations,
            selection,
        )
    }

    /// How quantities are chosen on the product page.
    #[must_use]
    pub fn purchase_mode(&self) -> PurchaseMode {
        PurchaseMode::for_combinations(&self.variation_combinations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn tee() -> Product {
        let mut product = Product::new(
            ProductId::generate(),
            "Oversized Tee",
            "UrbanThreadz",
            Price::from_units(45),
        );
        product.variation_options = vec![
            VariationOption::new("color", ["black", "white"]),
            VariationOption::new("size", ["S", "M", "L"]),
        ];
        product
    }

    fn priced_by_color_and_size() -> Product {
        let mut product = tee();
        product.price_determined_by = vec!["color".to_string(), "size".to_string()];
        product.variation_combinations = vec![
            VariationCombination::new([("color", "black"), ("size", "M")], Price::from_units(50)),
            VariationCombination::new([("color", "white"), ("size", "L")], Price::from_units(55)),
        ];
        product
    }

    #[test]
    fn test_default_selection_picks_first_values() {
        let selection = tee().default_selection();
        assert_eq!(selection.get("color"), Some("black"));
        assert_eq!(selection.get("size"), Some("S"));
    }

    #[test]
    fn test_defaults_do_not_override_choices() {
        let product = tee();
        let selection = Selection::new()
            .with("size", "L")
            .with_defaults(&product.variation_options);
        assert_eq!(selection.get("size"), Some("L"));
        assert_eq!(selection.get("color"), Some("black"));
    }

    #[test]
    fn test_no_price_keys_uses_base_fields() {
        let mut product = tee();
        product.original_price = Some(Price::from_units(60));
        product.in_stock = false;
        // Combinations are ignored when nothing determines the price.
        product.variation_combinations = vec![VariationCombination::new(
            [("color", "black")],
            Price::from_units(1),
        )];

        for selection in [
            Selection::new(),
            product.default_selection(),
            Selection::new().with("color", "white").with("size", "L"),
        ] {
            let resolution = product.resolve(&selection);
            let offer = resolution.offer().unwrap();
            assert!(matches!(resolution, Resolution::Base(_)));
            assert_eq!(offer.price, Price::from_units(45));
            assert_eq!(offer.original_price, Some(Price::from_units(60)));
            assert!(!offer.in_stock);
        }
    }

    #[test]
    fn test_matching_combination_overrides_base_price() {
        let product = priced_by_color_and_size();
        let selection = Selection::new().with("color", "black").with("size", "M");
        let resolution = product.resolve(&selection);
        assert_eq!(
            resolution,
            Resolution::Combination {
                index: 0,
                offer: Offer {
                    price: Price::from_units(50),
                    original_price: None,
                    in_stock: true,
                    stock_count: Some(0),
                    sku: None,
                    image: None,
                },
            }
        );
        assert!(resolution.can_add_to_cart());
    }

    #[test]
    fn test_unmatched_selection_is_unresolved() {
        let product = priced_by_color_and_size();
        let selection = Selection::new().with("color", "white").with("size", "M");
        let resolution = product.resolve(&selection);
        assert_eq!(
            resolution,
            Resolution::Unresolved(Unresolved::NoMatchingCombination)
        );
        assert!(!resolution.can_add_to_cart());
        assert_eq!(
            resolution.into_offer().unwrap_err().to_string(),
            "select all required options"
        );
    }

    #[test]
    fn test_partial_selection_reports_missing_keys() {
        let product = priced_by_color_and_size();
        let resolution = product.resolve(&Selection::new().with("color", "black"));
        assert_eq!(
            resolution,
            Resolution::Unresolved(Unresolved::MissingOptions {
                missing: vec!["size".to_string()],
            })
        );
    }

    #[test]
    fn test_only_price_keys_are_compared() {
        let mut product = tee();
        product.price_determined_by = vec!["color".to_string()];
        let mut combination =
            VariationCombination::new([("color", "white")], Price::from_units(48));
        combination
            .options
            .insert("legacy".to_string(), "ignored".to_string());
        product.variation_combinations = vec![combination];

        let selection = Selection::new().with("color", "white").with("size", "XL");
        let offer = product.resolve(&selection).into_offer().unwrap();
        assert_eq!(offer.price, Price::from_units(48));
    }

    #[test]
    fn test_combination_missing_a_key_never_matches() {
        let mut product = priced_by_color_and_size();
        product.variation_combinations =
            vec![VariationCombination::new([("color", "black")], Price::from_units(10))];
        let selection = Selection::new().with("color", "black").with("size", "M");
        assert!(product.resolve(&selection).offer().is_none());
    }

    #[test]
    fn test_duplicate_combinations_first_wins() {
        let mut product = priced_by_color_and_size();
        product.variation_combinations.push(VariationCombination::new(
            [("color", "black"), ("size", "M")],
            Price::from_units(99),
        ));
        let selection = Selection::new().with("color", "black").with("size", "M");
        let offer = product.resolve(&selection).into_offer().unwrap();
        assert_eq!(offer.price, Price::from_units(50));
    }

    #[test]
    fn test_out_of_stock_combination_blocks_only_itself() {
        let mut product = priced_by_color_and_size();
        product.variation_combinations[0].in_stock = false;

        let black_m = Selection::new().with("color", "black").with("size", "M");
        let white_l = Selection::new().with("color", "white").with("size", "L");
        assert!(!product.resolve(&black_m).can_add_to_cart());
        assert!(product.resolve(&white_l).can_add_to_cart());
    }

    #[test]
    fn test_purchase_mode_follows_combination_count() {
        let mut product = tee();
        assert_eq!(product.purchase_mode(), PurchaseMode::SingleQuantity);
        product.variation_combinations =
            vec![VariationCombination::new([("color", "black")], Price::from_units(1))];
        assert_eq!(product.purchase_mode(), PurchaseMode::SingleQuantity);
        assert_eq!(
            priced_by_color_and_size().purchase_mode(),
            PurchaseMode::PerCombination
        );
    }

    #[test]
    fn test_choose_rejects_undeclared_values() {
        let product = tee();
        let mut selection = Selection::new();
        assert_eq!(
            selection.choose(&product.variation_options, "material", "wool"),
            Err(VariationError::UnknownOption("material".to_string()))
        );
        assert_eq!(
            selection.choose(&product.variation_options, "size", "XXL"),
            Err(VariationError::UnknownValue {
                kind: "size".to_string(),
                value: "XXL".to_string(),
            })
        );
        selection
            .choose(&product.variation_options, "size", "M")
            .unwrap();
        assert_eq!(selection.get("size"), Some("M"));
    }

    #[test]
    fn test_validate_checks_every_entry() {
        let product = tee();
        let good = Selection::new().with("color", "white").with("size", "S");
        assert!(good.validate(&product.variation_options).is_ok());
        let bad = good.with("color", "teal");
        assert!(bad.validate(&product.variation_options).is_err());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let product = priced_by_color_and_size();
        let selection = Selection::new().with("color", "white").with("size", "L");
        assert_eq!(product.resolve(&selection), product.resolve(&selection));
    }
}

//! Consistency checks for product variation data.
//!
//! Catalog documents are not validated when they are written, so a product
//! can declare a price-determining type that no combination carries, or list
//! the same SKU twice. These checks find such problems. Resolution itself
//! stays best effort (first match wins); importers decide whether an issue
//! is fatal.

use std::collections::HashSet;

use super::product::Product;

/// A problem found in a product's variation data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    #[error("variation option {kind} has no values")]
    EmptyOptionValues { kind: String },

    #[error("variation option {kind} is declared more than once")]
    DuplicateOption { kind: String },

    #[error("priceDeterminedBy names undeclared option {kind}")]
    UndeclaredPriceKey { kind: String },

    #[error("combination {index} is missing price key {kind}")]
    MissingCombinationKey { index: usize, kind: String },

    #[error("combination {index} has key {kind} outside priceDeterminedBy")]
    UnexpectedCombinationKey { index: usize, kind: String },

    #[error("combination {index} uses undeclared value {value:?} for {kind}")]
    UndeclaredCombinationValue {
        index: usize,
        kind: String,
        value: String,
    },

    #[error("combination {index} duplicates combination {first}")]
    DuplicateCombination { index: usize, first: usize },

    #[error("product has combinations but priceDeterminedBy is empty")]
    UnusedCombinations,
}

/// Check a product's variation schema and combinations.
///
/// Returns every issue found, in document order. An empty list means the
/// product is consistent.
#[must_use]
pub fn validate_product(product: &Product) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();

    let mut seen_kinds = HashSet::new();
    for option in &product.variation_options {
        if option.values.is_empty() {
            issues.push(CatalogIssue::EmptyOptionValues {
                kind: option.kind.clone(),
            });
        }
        if !seen_kinds.insert(option.kind.as_str()) {
            issues.push(CatalogIssue::DuplicateOption {
                kind: option.kind.clone(),
            });
        }
    }

    for kind in &product.price_determined_by {
        if product.variation_option(kind).is_none() {
            issues.push(CatalogIssue::UndeclaredPriceKey { kind: kind.clone() });
        }
    }

    if product.price_determined_by.is_empty() {
        if !product.variation_combinations.is_empty() {
            issues.push(CatalogIssue::UnusedCombinations);
        }
        return issues;
    }

    let mut tuples: Vec<(Vec<Option<&str>>, usize)> = Vec::new();
    for (index, combination) in product.variation_combinations.iter().enumerate() {
        for kind in &product.price_determined_by {
            match combination.options.get(kind) {
                None => issues.push(CatalogIssue::MissingCombinationKey {
                    index,
                    kind: kind.clone(),
                }),
                Some(value) => {
                    let declared = product
                        .variation_option(kind)
                        .is_none_or(|option| option.allows(value));
                    if !declared {
                        issues.push(CatalogIssue::UndeclaredCombinationValue {
                            index,
                            kind: kind.clone(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }

        for kind in combination.options.keys() {
            if !product.price_determined_by.contains(kind) {
                issues.push(CatalogIssue::UnexpectedCombinationKey {
                    index,
                    kind: kind.clone(),
                });
            }
        }

        let tuple: Vec<Option<&str>> = product
            .price_determined_by
            .iter()
            .map(|kind| combination.options.get(kind).map(String::as_str))
            .collect();
        match tuples.iter().find(|(existing, _)| *existing == tuple) {
            Some((_, first)) => issues.push(CatalogIssue::DuplicateCombination {
                index,
                first: *first,
            }),
            None => tuples.push((tuple, index)),
        }
    }

    issues
}

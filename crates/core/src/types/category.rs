//! Storefront category enumeration.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category name is not one of the fixed set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Fixed set of catalog categories.
///
/// Serialized in lowercase, matching the category slugs stored on product
/// documents (`"newarrivals"`, not `"new_arrivals"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    #[serde(alias = "new-arrivals", alias = "new_arrivals")]
    NewArrivals,
    Collection,
    Sale,
    Featured,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 6] = [
        Self::Men,
        Self::Women,
        Self::NewArrivals,
        Self::Collection,
        Self::Sale,
        Self::Featured,
    ];

    /// The slug stored on product documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::NewArrivals => "newarrivals",
            Self::Collection => "collection",
            Self::Sale => "sale",
            Self::Featured => "featured",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Parses a slug. `new-arrivals` is accepted as used in storefront URLs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&Category::NewArrivals).unwrap();
        assert_eq!(json, "\"newarrivals\"");
        let parsed: Category = serde_json::from_str("\"sale\"").unwrap();
        assert_eq!(parsed, Category::Sale);
        let hyphenated: Category = serde_json::from_str("\"new-arrivals\"").unwrap();
        assert_eq!(hyphenated, Category::NewArrivals);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(serde_json::from_str::<Category>("\"kids\"").is_err());
        assert_eq!(
            "kids".parse::<Category>(),
            Err(CategoryError("kids".to_string()))
        );
    }

    #[test]
    fn test_from_str_accepts_url_form() {
        assert_eq!("new-arrivals".parse::<Category>(), Ok(Category::NewArrivals));
        assert_eq!("Women".parse::<Category>(), Ok(Category::Women));
    }
}

//! Product reviews and rating aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::types::{CustomerId, ProductId, Rating, ReviewId};

/// A customer, as far as the catalog needs to know one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: CustomerId,
    pub name: String,
}

/// A review as stored: references its product and customer by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    #[serde(alias = "_id")]
    pub id: ReviewId,
    pub product: ProductId,
    pub customer: CustomerId,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The reviewing customer as shown with a review.
///
/// Product detail responses include the customer's name; listings carry
/// only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCustomer {
    pub id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A review as served to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product: ProductId,
    pub customer: ReviewCustomer,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Build a served review, optionally naming the customer.
    #[must_use]
    pub fn from_record(record: ReviewRecord, customer_name: Option<String>) -> Self {
        Self {
            id: record.id,
            product: record.product,
            customer: ReviewCustomer {
                id: record.customer,
                name: customer_name,
            },
            rating: record.rating,
            title: record.title,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}

/// Average rating and review count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal place, `0` without reviews.
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    /// Summarize a set of ratings.
    #[must_use]
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_u64, 0_usize), |(sum, count), rating| {
                (sum + u64::from(rating.value()), count + 1)
            });

        if count == 0 {
            return Self::default();
        }

        #[allow(clippy::cast_precision_loss)] // review counts never approach 2^52
        let average = sum as f64 / count as f64;
        Self {
            average: (average * 10.0).round() / 10.0,
            count,
        }
    }
}

/// A product with its reviews attached, as served by the product endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<Review>,
    pub rating: RatingSummary,
}

impl ProductWithReviews {
    /// Attach reviews and compute the rating summary.
    #[must_use]
    pub fn new(product: Product, reviews: Vec<Review>) -> Self {
        let rating = RatingSummary::from_ratings(reviews.iter().map(|review| review.rating));
        Self {
            product,
            reviews,
            rating,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn record(rating: i64) -> ReviewRecord {
        ReviewRecord {
            id: ReviewId::generate(),
            product: ProductId::generate(),
            customer: CustomerId::generate(),
            rating: Rating::new(rating).unwrap(),
            title: None,
            comment: Some("Fits well".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rating_summary_rounds_to_one_decimal() {
        let summary = RatingSummary::from_ratings(
            [5, 4, 4].into_iter().map(|r| Rating::new(r).unwrap()),
        );
        assert_eq!(summary.count, 3);
        assert!((summary.average - 4.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rating_summary_empty() {
        let summary = RatingSummary::from_ratings(std::iter::empty());
        assert_eq!(summary.count, 0);
        assert!(summary.average.abs() < f64::EPSILON);
    }

    #[test]
    fn test_customer_name_only_when_known() {
        let anonymous = Review::from_record(record(3), None);
        let value = serde_json::to_value(&anonymous).unwrap();
        assert!(value["customer"].get("name").is_none());

        let named = Review::from_record(record(3), Some("Maya".to_string()));
        let value = serde_json::to_value(&named).unwrap();
        assert_eq!(value["customer"]["name"], "Maya");
    }

    #[test]
    fn test_product_with_reviews_flattens_product() {
        let product = Product::new(
            ProductId::generate(),
            "Minimalist Blazer",
            "UrbanThreadz",
            Price::from_units(189),
        );
        let reviews = vec![Review::from_record(record(5), None)];
        let served = ProductWithReviews::new(product, reviews);
        let value = serde_json::to_value(&served).unwrap();
        assert_eq!(value["name"], "Minimalist Blazer");
        assert_eq!(value["reviews"].as_array().unwrap().len(), 1);
        assert_eq!(value["rating"]["count"], 1);
    }
}

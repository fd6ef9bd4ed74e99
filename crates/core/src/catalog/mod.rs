//! Product catalog: documents, variation pricing, reviews and queries.

pub mod document;
pub mod product;
pub mod review;
pub mod search;
pub mod similar;
pub mod validation;
pub mod variation;

pub use document::{CatalogDocument, DocumentIssue};
pub use product::{
    DeliveryInfo, DetailsAndCare, Image, Product, VariationCombination, VariationOption,
};
pub use review::{
    Customer, ProductWithReviews, RatingSummary, Review, ReviewCustomer, ReviewRecord,
};
pub use search::CatalogQuery;
pub use similar::{SIMILAR_PRODUCTS_LIMIT, is_similar, similar_products};
pub use validation::{CatalogIssue, validate_product};
pub use variation::{
    Offer, PurchaseMode, Resolution, Selection, Unresolved, VariationError, find_combination,
    resolve,
};

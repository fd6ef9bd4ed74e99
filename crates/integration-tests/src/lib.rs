//! Integration tests for Urban Threadz.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p urban-threadz-integration-tests
//! ```
//!
//! Tests drive the storefront router in-process against an in-memory
//! catalog and an in-memory session store. [`TestContext`] keeps the session
//! cookie between requests, so a sequence of calls behaves like one shopper.
//!
//! # Test Categories
//!
//! - `products_api` - Catalog listing, detail, similar, search, resolve
//! - `cart_api` - Session cart
//! - `wishlist_api` - Session wishlist

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use urban_threadz_core::catalog::{
    CatalogDocument, Customer, Image, Product, ReviewRecord, VariationCombination,
    VariationOption,
};
use urban_threadz_core::{Category, CustomerId, Price, ProductId, Rating, ReviewId};
use urban_threadz_storefront::app;
use urban_threadz_storefront::config::StorefrontConfig;
use urban_threadz_storefront::middleware::create_session_layer;
use urban_threadz_storefront::state::AppState;
use urban_threadz_storefront::store::{MemoryCatalog, ProductStore};

/// Fixed ids for the fixture catalog.
pub mod ids {
    use urban_threadz_core::{CustomerId, ProductId};

    /// Tee priced per `(color, size)`: black/M = 50, white/L = 55.
    pub const TEE: ProductId = ProductId::new(fixture_uuid(1));
    /// Men's denim jeans without price-determining options.
    pub const JEANS: ProductId = ProductId::new(fixture_uuid(2));
    /// Men's jacket sharing the `denim` tag.
    pub const JACKET: ProductId = ProductId::new(fixture_uuid(3));
    /// Women's dress, unrelated to the men's items.
    pub const DRESS: ProductId = ProductId::new(fixture_uuid(4));
    /// Out-of-stock scarf.
    pub const SCARF: ProductId = ProductId::new(fixture_uuid(5));
    /// Reviewer.
    pub const MAYA: CustomerId = CustomerId::new(fixture_uuid(100));

    const fn fixture_uuid(n: u128) -> uuid::Uuid {
        uuid::Uuid::from_u128(0x5d8e_3f2a_1b4c_4a6d_9e0f_0000_0000_0000 | n)
    }
}

fn product(id: ProductId, name: &str, units: u32, category: Category, tags: &[&str]) -> Product {
    let mut product = Product::new(id, name, "UrbanThreadz", Price::from_units(units));
    product.category = vec![category];
    product.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
    product.images = vec![Image {
        url: format!("https://images.example/{id}.jpg"),
        public_id: None,
    }];
    product
}

/// The fixture catalog used by every test.
#[must_use]
pub fn fixture_catalog() -> CatalogDocument {
    let mut tee = product(ids::TEE, "Essential Tee", 40, Category::Men, &["basics"]);
    tee.variation_options = vec![
        VariationOption::new("color", ["black", "white"]),
        VariationOption::new("size", ["M", "L"]),
    ];
    tee.price_determined_by = vec!["color".to_string(), "size".to_string()];
    tee.variation_combinations = vec![
        VariationCombination::new([("color", "black"), ("size", "M")], Price::from_units(50)),
        VariationCombination::new([("color", "white"), ("size", "L")], Price::from_units(55)),
    ];

    let mut jeans = product(ids::JEANS, "Slim Jeans", 80, Category::Men, &["denim"]);
    jeans.variation_options = vec![VariationOption::new("size", ["30", "32"])];

    let jacket = product(ids::JACKET, "Denim Jacket", 120, Category::Women, &["denim"]);
    let dress = product(ids::DRESS, "Wrap Dress", 95, Category::Women, &["summer"]);

    let mut scarf = product(ids::SCARF, "Silk Scarf", 45, Category::Featured, &["accessories"]);
    scarf.in_stock = false;

    let review = |n: u128, rating: i64| ReviewRecord {
        id: ReviewId::new(uuid::Uuid::from_u128(n)),
        product: ids::JEANS,
        customer: ids::MAYA,
        rating: Rating::new(rating).unwrap(),
        title: None,
        comment: Some("Great fit".to_string()),
        created_at: chrono::DateTime::from_timestamp(1_740_000_000 + i64::try_from(n).unwrap(), 0)
            .unwrap(),
    };

    CatalogDocument {
        products: vec![tee, jeans, jacket, dress, scarf],
        customers: vec![Customer {
            id: ids::MAYA,
            name: "Maya Chen".to_string(),
        }],
        reviews: vec![review(1, 5), review(2, 4), review(3, 4)],
    }
}

/// A shopper talking to an in-process storefront.
pub struct TestContext {
    router: Router,
    cookie: Option<String>,
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestContext {
    /// Storefront over the fixture catalog with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(fixture_catalog())
    }

    /// Storefront over `document`.
    #[must_use]
    pub fn with_catalog(document: CatalogDocument) -> Self {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, ProductStore::memory(MemoryCatalog::new(document)));

        Self {
            router: app(state, session_layer),
            cookie: None,
        }
    }

    /// Send a request, keeping the session cookie.
    pub async fn request(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        TestResponse { status, body, text }
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body.
    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `DELETE path`.
    pub async fn delete(&mut self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// Drop the session cookie, becoming a new shopper.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

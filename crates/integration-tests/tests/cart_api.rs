//! Integration tests for the session cart.

use axum::http::StatusCode;
use serde_json::json;

use urban_threadz_core::Price;
use urban_threadz_integration_tests::{TestContext, fixture_catalog, ids};

#[tokio::test]
async fn test_empty_cart() {
    let mut ctx = TestContext::new();

    let response = ctx.get("/api/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["items"].as_array().unwrap().is_empty());
    assert_eq!(response.body["count"], 0);
    assert_eq!(response.body["summary"]["shipping"], 0.0);
}

#[tokio::test]
async fn test_adding_same_variant_merges_lines() {
    let mut ctx = TestContext::new();
    let selection = json!({ "color": "black", "size": "M" });

    let first = ctx
        .post(
            "/api/cart/items",
            json!({ "productId": ids::TEE.to_string(), "selection": selection.clone(), "quantity": 1 }),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = ctx
        .post(
            "/api/cart/items",
            json!({ "productId": ids::TEE.to_string(), "selection": selection, "quantity": 2 }),
        )
        .await;
    assert_eq!(second.status, StatusCode::CREATED);

    let cart = ctx.get("/api/cart").await.body;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["price"], 50.0);
    assert_eq!(items[0]["size"], "M");
    assert_eq!(items[0]["color"], "black");
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["total"], 150.0);
    // Over the threshold: free shipping, 8% tax
    assert_eq!(cart["summary"]["shipping"], 0.0);
    assert_eq!(cart["summary"]["tax"], 12.0);
    assert_eq!(cart["summary"]["total"], 162.0);
}

#[tokio::test]
async fn test_unmatched_combination_is_rejected() {
    let mut ctx = TestContext::new();

    let response = ctx
        .post(
            "/api/cart/items",
            json!({
                "productId": ids::TEE.to_string(),
                "selection": { "color": "white", "size": "M" }
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "select all required options");

    assert_eq!(ctx.get("/api/cart").await.body["count"], 0);
}

#[tokio::test]
async fn test_out_of_stock_is_rejected() {
    let mut ctx = TestContext::new();

    let response = ctx
        .post("/api/cart/items", json!({ "productId": ids::SCARF.to_string() }))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "out of stock");
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let mut ctx = TestContext::new();

    let response = ctx
        .post(
            "/api/cart/items",
            json!({ "productId": ids::JEANS.to_string(), "quantity": 0 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let mut ctx = TestContext::new();

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string(), "quantity": 2 }),
    )
    .await;
    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::TEE.to_string() }),
    )
    .await;

    let response = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::JEANS.to_string(), "quantity": 0 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["total"], 50.0);
    // Under the threshold: flat shipping
    assert_eq!(response.body["summary"]["shipping"], 10.0);
    assert_eq!(response.body["summary"]["amountToFreeShipping"], 50.0);
}

#[tokio::test]
async fn test_update_single_variant_line() {
    let mut ctx = TestContext::new();

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string(), "selection": { "size": "30" } }),
    )
    .await;
    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string(), "selection": { "size": "32" } }),
    )
    .await;

    let response = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::JEANS.to_string(), "size": "32", "quantity": 4 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 5);

    let missing = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::DRESS.to_string(), "quantity": 1 }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let mut ctx = TestContext::new();

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string() }),
    )
    .await;
    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::DRESS.to_string() }),
    )
    .await;

    let response = ctx.delete(&format!("/api/cart/items/{}", ids::JEANS)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);

    let response = ctx.delete("/api/cart").await;
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let mut ctx = TestContext::new();

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string() }),
    )
    .await;
    assert_eq!(ctx.get("/api/cart").await.body["count"], 1);

    ctx.forget_session();
    assert_eq!(ctx.get("/api/cart").await.body["count"], 0);
}

#[tokio::test]
async fn test_update_with_only_size_matches_any_color() {
    let mut ctx = TestContext::new();

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::TEE.to_string(), "selection": { "color": "black", "size": "M" } }),
    )
    .await;
    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::TEE.to_string(), "selection": { "color": "white", "size": "L" } }),
    )
    .await;

    let response = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::TEE.to_string(), "size": "M", "quantity": 3 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 4);
    assert_eq!(response.body["total"], 205.0);

    let missing = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::TEE.to_string(), "color": "navy", "quantity": 1 }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Cart item not found");
}

#[tokio::test]
async fn test_overflowing_total_is_rejected_and_cart_survives() {
    let mut catalog = fixture_catalog();
    let dress = catalog
        .products
        .iter_mut()
        .find(|product| product.id == ids::DRESS)
        .unwrap();
    dress.price = serde_json::from_value::<Price>(json!(1e21)).unwrap();
    let mut ctx = TestContext::with_catalog(catalog);

    ctx.post(
        "/api/cart/items",
        json!({ "productId": ids::JEANS.to_string() }),
    )
    .await;

    let response = ctx
        .post(
            "/api/cart/items",
            json!({ "productId": ids::DRESS.to_string(), "quantity": 4_000_000_000_u32 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "cart total is too large");

    let cart = ctx.get("/api/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["count"], 1);
    assert_eq!(cart.body["total"], 80.0);

    let response = ctx
        .post(
            "/api/cart/items/update",
            json!({ "productId": ids::JEANS.to_string(), "quantity": 1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

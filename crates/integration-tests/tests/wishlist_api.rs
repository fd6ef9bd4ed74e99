//! Integration tests for the session wishlist.

use axum::http::StatusCode;
use serde_json::json;

use urban_threadz_integration_tests::{TestContext, ids};

#[tokio::test]
async fn test_adding_twice_keeps_one_entry() {
    let mut ctx = TestContext::new();

    for _ in 0..2 {
        let response = ctx
            .post("/api/wishlist", json!({ "productId": ids::DRESS.to_string() }))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = ctx.get("/api/wishlist").await;
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["items"][0]["name"], "Wrap Dress");
    assert_eq!(response.body["items"][0]["price"], 95.0);
}

#[tokio::test]
async fn test_contains_after_add_and_remove() {
    let mut ctx = TestContext::new();
    let path = format!("/api/wishlist/{}", ids::JEANS);

    assert_eq!(ctx.get(&path).await.body["contains"], false);

    ctx.post("/api/wishlist", json!({ "productId": ids::JEANS.to_string() }))
        .await;
    assert_eq!(ctx.get(&path).await.body["contains"], true);

    let response = ctx.delete(&path).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 0);
    assert_eq!(ctx.get(&path).await.body["contains"], false);
}

#[tokio::test]
async fn test_toggle() {
    let mut ctx = TestContext::new();
    let body = json!({ "productId": ids::SCARF.to_string() });

    let response = ctx.post("/api/wishlist/toggle", body.clone()).await;
    assert_eq!(response.body["contains"], true);
    assert_eq!(response.body["count"], 1);

    let response = ctx.post("/api/wishlist/toggle", body).await;
    assert_eq!(response.body["contains"], false);
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_unknown_product_cannot_be_saved() {
    let mut ctx = TestContext::new();

    let response = ctx
        .post(
            "/api/wishlist",
            json!({ "productId": "00000000-0000-4000-8000-000000000000" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx
        .post("/api/wishlist", json!({ "productId": "nope" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.post("/api/wishlist", json!({ "id": 3 })).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

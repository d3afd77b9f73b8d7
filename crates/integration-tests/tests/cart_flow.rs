//! Cart flow through the HTTP surface.

use gamershop_integration_tests::{TestStorefront, hx_trigger, sample_games, spawn_catalog};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn api_cart(store: &TestStorefront, client: &reqwest::Client) -> Value {
    client
        .get(store.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add(
    store: &TestStorefront,
    client: &reqwest::Client,
    game_id: &str,
) -> reqwest::Response {
    client
        .post(store.url("/cart/add"))
        .form(&[("game_id", game_id), ("page", "1")])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    let cart = api_cart(&store, &client).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["count"], 0);
    assert_eq!(cart["total"], "0");

    let page = client.get(store.url("/cart")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.unwrap();
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_add_update_remove_clear() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    // First add stores the game and notifies the page
    let resp = add(&store, &client, "1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp), Some(json!({ "cartUpdated": {} })));
    assert!(resp.text().await.unwrap().contains("Already in Cart"));

    // Adding again is a no-op
    let resp = add(&store, &client, "1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp), None);
    assert!(resp.text().await.unwrap().contains("Already in Cart"));

    add(&store, &client, "2").await;

    let resp = client
        .post(store.url("/cart/update"))
        .form(&[("game_id", "1"), ("quantity", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(hx_trigger(&resp), Some(json!({ "cartUpdated": {} })));

    let cart = api_cart(&store, &client).await;
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["total"], "159.97");
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["game"]["name"], "Iron Circuit");

    let body = client
        .get(store.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Order Summary"));
    assert!(body.contains("$159.97"));
    assert!(body.contains("$12.80"));
    assert!(body.contains("$172.77"));

    // Quantity zero removes the line
    client
        .post(store.url("/cart/update"))
        .form(&[("game_id", "1"), ("quantity", "0")])
        .send()
        .await
        .unwrap();
    let cart = api_cart(&store, &client).await;
    assert_eq!(cart["count"], 1);
    assert_eq!(cart["items"][0]["game"]["id"], "2");

    let resp = client
        .post(store.url("/cart/remove"))
        .form(&[("game_id", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Your cart is empty"));

    add(&store, &client, "3").await;
    let resp = client.post(store.url("/cart/clear")).send().await.unwrap();
    assert_eq!(hx_trigger(&resp), Some(json!({ "cartUpdated": {} })));
    assert_eq!(api_cart(&store, &client).await["count"], 0);
}

#[tokio::test]
async fn test_cart_count_badge() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    let badge = client
        .get(store.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(badge.contains("hidden"));

    add(&store, &client, "4").await;
    let badge = client
        .get(store.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(badge.contains(">1</span>"));
    assert!(!badge.contains("hidden"));
}

#[tokio::test]
async fn test_visitors_are_isolated() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let alice = store.visitor();
    let bob = store.visitor();

    add(&store, &alice, "1").await;

    assert_eq!(api_cart(&store, &alice).await["count"], 1);
    assert_eq!(api_cart(&store, &bob).await["count"], 0);
}

#[tokio::test]
async fn test_add_rejects_bad_game_ids() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    let resp = add(&store, &client, "   ").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = add(&store, &client, "999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(api_cart(&store, &client).await["count"], 0);
}

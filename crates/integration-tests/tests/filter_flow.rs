//! Genre filter flow through the HTTP surface.

use gamershop_integration_tests::{TestStorefront, hx_trigger, sample_games, spawn_catalog};
use reqwest::StatusCode;
use serde_json::json;

async fn set_genre(
    store: &TestStorefront,
    client: &reqwest::Client,
    genre: &str,
) -> reqwest::Response {
    client
        .post(store.url("/filters/genre"))
        .form(&[("genre", genre)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_genre_filter_persists_and_filters_catalog() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    let filters: serde_json::Value = client
        .get(store.url("/api/filters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filters, json!({ "genre": null }));

    let resp = set_genre(&store, &client, "RPG").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        hx_trigger(&resp),
        Some(json!({ "filtersUpdated": { "genre": "RPG" } }))
    );
    let body = resp.text().await.unwrap();
    assert!(body.contains("Embers of Aldren"));
    assert!(body.contains("The Lantern Road"));
    assert!(!body.contains("Iron Circuit"));

    let filters: serde_json::Value = client
        .get(store.url("/api/filters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filters["genre"], "RPG");

    // The saved genre drives the home page
    let home = client
        .get(store.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains(r#"<option value="RPG" selected>"#));
    assert!(!home.contains("Drift King"));

    // "all" clears the genre
    let resp = set_genre(&store, &client, "all").await;
    assert_eq!(
        hx_trigger(&resp),
        Some(json!({ "filtersUpdated": { "genre": null } }))
    );
    assert!(resp.text().await.unwrap().contains("Iron Circuit"));
}

#[tokio::test]
async fn test_clear_resets_selector() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    set_genre(&store, &client, "Action").await;

    let resp = client
        .post(store.url("/filters/clear"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        hx_trigger(&resp),
        Some(json!({ "filtersUpdated": { "genre": null } }))
    );
    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"hx-swap-oob="true""#));
    assert!(body.contains(r#"<option value="all" selected>"#));
}

#[tokio::test]
async fn test_load_more_pages() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let client = store.visitor();

    let home = client
        .get(store.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains("Iron Circuit"));
    assert!(home.contains("/catalog?page=2"));
    assert!(!home.contains("Border Lords"));

    let page = client
        .get(store.url("/catalog?page=2"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Border Lords"));
    assert!(page.contains("Skyline Breach"));
    assert!(!page.contains("Load More"));
}

#[tokio::test]
async fn test_filters_are_per_visitor() {
    let catalog = spawn_catalog(sample_games()).await;
    let store = TestStorefront::spawn(&catalog).await;
    let alice = store.visitor();
    let bob = store.visitor();

    set_genre(&store, &alice, "Racing").await;

    let filters: serde_json::Value = bob
        .get(store.url("/api/filters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filters["genre"], serde_json::Value::Null);
}

//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

#![cfg(feature = "http")]

use std::sync::Arc;

use bookstore::{books, router, Bookstore, InMemoryStore, SequenceGenerator};
use serde_json::{json, Value};

fn test_service() -> Arc<bookstore::Router<Bookstore>> {
    let api = Bookstore::with_ids(
        Arc::new(InMemoryStore::named("bookstore")),
        Arc::new(SequenceGenerator::new()),
    );
    Arc::new(books::router(api))
}

/// Bind to port 0 and return the actual address.
async fn start_server(service: Arc<bookstore::Router<Bookstore>>) -> String {
    let app = router::into_service(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 5);
    assert_eq!(endpoints[0], "books.remove");
    assert_eq!(endpoints[4], "books.list");
}

#[tokio::test]
async fn create_assigns_id() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "There and Back Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": "books:000001", "title": "There and Back Again" })
    );
}

#[tokio::test]
async fn crud_round_trip() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    // Create with a client-chosen id
    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "id": "book:hobbit", "title": "There and Back Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Update
    let resp = client
        .put(format!("{base}/books/book:hobbit"))
        .json(&json!({ "title": "The Hobbit" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": "book:hobbit", "title": "The Hobbit" }));

    // Read
    let resp = client
        .get(format!("{base}/books/book:hobbit"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "The Hobbit");

    // Delete, twice
    for _ in 0..2 {
        let resp = client
            .delete(format!("{base}/books/book:hobbit"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "id": "book:hobbit" }));
    }

    // Gone
    let resp = client
        .get(format!("{base}/books/book:hobbit"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_is_sorted_by_id() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    for id in ["books:c", "books:a", "books:b"] {
        let resp = client
            .post(format!("{base}/books"))
            .json(&json!({ "id": id, "title": id }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = client.get(format!("{base}/books")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["books:a", "books:b", "books:c"]);
}

#[tokio::test]
async fn empty_list_is_empty_array() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/books")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn update_missing_returns_404() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/books/books:ghost"))
        .json(&json!({ "title": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn malformed_body_returns_400() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid input"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/authors"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no route for GET /authors" }));
}

#[tokio::test]
async fn id_needing_percent_encoding_round_trips() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/books/book:the%20hobbit");

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "id": "book:the hobbit", "title": "There and Back Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": "book:the hobbit", "title": "There and Back Again" })
    );

    let resp = client
        .put(&url)
        .json(&json!({ "title": "The Hobbit" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": "book:the hobbit", "title": "The Hobbit" }));

    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": "book:the hobbit" }));

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn undecodable_path_returns_400() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/books/%FF"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn concurrent_creates_are_all_listed() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let client = client.clone();
        let base = base.clone();
        tasks.spawn(async move {
            let resp = client
                .post(format!("{base}/books"))
                .json(&json!({ "title": format!("book {i}") }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    let resp = client.get(format!("{base}/books")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 16);

    let mut expected = ids.clone();
    expected.sort();
    expected.dedup();
    assert_eq!(ids, expected);
}

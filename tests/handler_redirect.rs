mod common;

use axum_test::TestServer;
use link_tracker::domain::entities::ClickMeta;
use serde_json::{Value, json};

#[tokio::test]
async fn test_redirect_success() {
    let (server, _state) = common::create_test_server();
    common::create_link(&server, "https://example.com/target", Some("target")).await;

    let response = server.get("/target").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (server, _state) = common::create_test_server();

    let response = server.get("/notfound").await;

    response.assert_status_not_found();
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "URL not found");
}

#[tokio::test]
async fn test_redirect_records_click_metadata() {
    let (server, _state) = common::create_test_server();
    common::create_link(&server, "https://example.com", Some("clickme")).await;

    let response = server
        .get("/clickme")
        .add_header("User-Agent", "TestBot/1.0")
        .add_header("Referer", "https://news.example.org/")
        .await;
    assert_eq!(response.status_code(), 302);

    let link = common::get_link(&server, "clickme").await;
    assert_eq!(link["clickCount"], 1);

    let click = &link["clickHistory"][0];
    assert_eq!(click["sourceIp"], "127.0.0.1");
    assert_eq!(click["userAgent"], "TestBot/1.0");
    assert_eq!(click["referer"], "https://news.example.org/");
    assert!(click["timestamp"].is_string());
}

#[tokio::test]
async fn test_redirect_without_headers_stores_nulls() {
    let (server, _state) = common::create_test_server();
    common::create_link(&server, "https://example.com", Some("bare")).await;

    server.get("/bare").await;

    let link = common::get_link(&server, "bare").await;
    let click = &link["clickHistory"][0];
    assert!(click["userAgent"].is_null());
    assert!(click["referer"].is_null());
}

#[tokio::test]
async fn test_redirect_expired_returns_gone_without_recording() {
    let (server, _state) = common::create_test_server();

    server
        .post("/api/urls/shorten")
        .json(&json!({
            "destinationUrl": "https://example.com/old",
            "alias": "old-promo",
            "expiresAt": "2000-01-01T00:00:00Z"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server.get("/old-promo").await;

    assert_eq!(response.status_code(), 410);
    assert_eq!(response.json::<Value>()["message"], "URL has expired");

    let link = common::get_link(&server, "old-promo").await;
    assert_eq!(link["clickCount"], 0);
    assert_eq!(link["clickHistory"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_destination_with_control_characters_is_rejected() {
    let (server, _state) = common::create_test_server();

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "destinationUrl": "https://example.com/a\nb", "alias": "ctl" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["success"], false);
    server.get("/ctl").await.assert_status_not_found();
    server.get("/api/urls/ctl").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_inactive_returns_not_found() {
    let (server, _state) = common::create_test_server();
    common::create_link(&server, "https://example.com", Some("paused")).await;

    server
        .patch("/api/urls/paused")
        .json(&json!({ "active": false }))
        .await
        .assert_status_ok();

    let response = server.get("/paused").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>()["message"],
        "URL not found or inactive"
    );

    let link = common::get_link(&server, "paused").await;
    assert_eq!(link["clickCount"], 0);
}

#[tokio::test]
async fn test_redirect_after_delete_returns_not_found() {
    let (server, _state) = common::create_test_server();
    common::create_link(&server, "https://example.com", Some("gone")).await;
    server.get("/gone").await;

    server.delete("/api/urls/gone").await.assert_status_ok();

    server.get("/gone").await.assert_status_not_found();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redirects_lose_no_clicks() {
    let (server, state) = common::create_test_server();
    common::create_link(&server, "https://example.com/hot", Some("hot")).await;

    const N: usize = 100;
    let handles: Vec<_> = (0..N)
        .map(|i| {
            let service = state.redirect_service.clone();
            tokio::spawn(async move {
                let meta = ClickMeta {
                    source_ip: Some(format!("10.0.0.{}", i % 255)),
                    ..Default::default()
                };
                service.resolve("hot", meta).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "https://example.com/hot");
    }

    let link = common::get_link(&server, "hot").await;
    assert_eq!(link["clickCount"], N);
    assert_eq!(link["clickHistory"].as_array().unwrap().len(), N);
}

#[tokio::test]
async fn test_redirect_uses_forwarded_ip_behind_proxy() {
    let state = link_tracker::state::AppState::new(
        std::sync::Arc::new(link_tracker::infrastructure::persistence::MemoryLinkStore::new()),
        common::BASE_URL,
        true,
    );
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    common::create_link(&server, "https://example.com", Some("proxied")).await;

    server
        .get("/proxied")
        .add_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .await;

    let link = common::get_link(&server, "proxied").await;
    assert_eq!(link["clickHistory"][0]["sourceIp"], "203.0.113.7");
}

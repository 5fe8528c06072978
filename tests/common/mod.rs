#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use link_tracker::infrastructure::persistence::MemoryLinkStore;
use link_tracker::routes::router;
use link_tracker::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";

pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_test_state() -> AppState {
    AppState::new(Arc::new(MemoryLinkStore::new()), BASE_URL, false)
}

pub fn create_test_app(state: AppState) -> Router {
    router(state).layer(MockConnectInfoLayer)
}

pub fn create_test_server() -> (TestServer, AppState) {
    let state = create_test_state();
    let server = TestServer::new(create_test_app(state.clone())).unwrap();
    (server, state)
}

/// Creates a link through the API and returns the `data` object.
pub async fn create_link(server: &TestServer, destination: &str, alias: Option<&str>) -> Value {
    let mut body = json!({ "destinationUrl": destination });
    if let Some(alias) = alias {
        body["alias"] = json!(alias);
    }

    let response = server.post("/api/urls/shorten").json(&body).await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Value>()["data"].clone()
}

/// Fetches the full record of `code` through the API.
pub async fn get_link(server: &TestServer, code: &str) -> Value {
    let response = server.get(&format!("/api/urls/{}", code)).await;
    response.assert_status_ok();
    response.json::<Value>()["data"].clone()
}

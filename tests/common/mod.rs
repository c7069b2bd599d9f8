use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

/// Local stand-in for the countries reference endpoint.
pub struct CountriesServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl CountriesServer {
    pub async fn new() -> Self {
        let app = Router::new()
            .route("/v2/all", get(|| async { Json(countries_fixture()) }))
            .route(
                "/broken",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route("/garbage", get(|| async { "not json" }));

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        CountriesServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn countries_fixture() -> Value {
    json!([
        { "name": "Afghanistan", "callingCodes": ["93"] },
        { "name": "Canada", "callingCodes": ["1"] },
        { "name": "Norway", "callingCodes": ["47"] }
    ])
}

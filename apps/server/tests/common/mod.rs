#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use coinquote_market_data::{ExternalQuote, MarketDataError, ProviderRegistry, QuoteProvider};
use coinquote_server::{api::app_router, build_state_with_providers, config::Config};
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";

/// Provider that answers every request with 64000.
pub struct StaticProvider;

#[async_trait]
impl QuoteProvider for StaticProvider {
    fn id(&self) -> &'static str {
        "static"
    }

    async fn get_external_quote(
        &self,
        _name: &str,
        _code: &str,
        fiat: &str,
    ) -> Result<ExternalQuote, MarketDataError> {
        Ok(ExternalQuote::now(dec!(64000), fiat, "static"))
    }
}

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

pub async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::from_env().unwrap();
    config.db_path = dir.path().join("test.db").to_string_lossy().to_string();
    config.api_token = TOKEN.to_string();
    config.export_wait_timeout = None;

    let provider: Arc<dyn QuoteProvider> = Arc::new(StaticProvider);
    let providers = ProviderRegistry::with_providers(vec![provider]);
    let state = build_state_with_providers(&config, providers).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// Registers a currency through the protected endpoint.
    pub async fn add_currency(&self, name: &str, code: &str) -> serde_json::Value {
        let response = self
            .send(
                Method::POST,
                "/api/v1/currencies",
                Some(serde_json::json!({ "name": name, "code": code })),
                Some(TOKEN),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }

    pub async fn add_quotation(&self, currency_id: i64, price: f64, timestamp: &str) -> i64 {
        let response = self
            .send(
                Method::POST,
                "/api/v1/quotations",
                Some(serde_json::json!({
                    "currencyId": currency_id,
                    "price": price,
                    "timestamp": timestamp,
                })),
                Some(TOKEN),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["id"].as_i64().unwrap()
    }

    pub async fn add_user(&self, code: &str, favorite_codes: &[&str]) -> i64 {
        let response = self
            .send(
                Method::POST,
                "/api/v1/users",
                Some(serde_json::json!({
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "birthDate": "1990-01-01",
                    "userCode": code,
                    "email": format!("{}@example.com", code),
                    "documentType": "DNI",
                    "favoriteCodes": favorite_codes,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_i64().unwrap()
    }
}

//! Product lookup by UPC/EAN barcode.
//!
//! The lookup is best effort: any failure leaves the form as typed and
//! produces a message for the user.

use log::{debug, info, warn};
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::commands::items::ItemDraft;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("Could not reach the product database. Check your connection.")]
    Network(String),
    #[error("No product found for barcode {0}. You can still enter details manually.")]
    NoProduct(String),
    #[error("Barcode lookup was cancelled")]
    Cancelled,
}

/// First product returned for a barcode
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    items: Vec<ProductInfo>,
}

/// HTTP client for the product database
#[derive(Clone)]
pub struct BarcodeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl BarcodeClient {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// `GET {endpoint}?upc={barcode}`; the first entry of `items` wins
    pub async fn lookup(&self, barcode: &str) -> Result<ProductInfo, LookupError> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(LookupError::NoProduct(String::new()));
        }
        info!("Looking up barcode {}", barcode);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("upc", barcode)])
            .send()
            .await
            .map_err(|e| {
                warn!("Barcode lookup request failed: {}", e);
                LookupError::Network(e.to_string())
            })?;

        let body = response.bytes().await.map_err(|e| {
            warn!("Barcode lookup response could not be read: {}", e);
            LookupError::Network(e.to_string())
        })?;

        // an unreadable body counts as "no product", like an empty result
        let parsed: Option<LookupResponse> = serde_json::from_slice(&body).ok();
        let product = parsed.and_then(|r| r.items.into_iter().next());

        match product {
            Some(product) => {
                debug!("Barcode {} matched {:?}", barcode, product.title);
                Ok(product)
            }
            None => {
                info!("No product found for barcode {}", barcode);
                Err(LookupError::NoProduct(barcode.to_string()))
            }
        }
    }
}

/// Fill empty name/make/model from `product`; the barcode always becomes the serial number
pub fn apply_product(draft: &mut ItemDraft, barcode: &str, product: &ProductInfo) {
    let fill = |field: &mut String, value: &Option<String>| {
        if field.trim().is_empty() {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                *field = value.to_string();
            }
        }
    };
    fill(&mut draft.name, &product.title);
    fill(&mut draft.make, &product.brand);
    fill(&mut draft.model, &product.model);
    draft.serial_number = barcode.trim().to_string();
}

/// Owns at most one outstanding lookup
///
/// Starting a lookup aborts the one in flight; dropping the session aborts it too.
pub struct LookupSession {
    client: BarcodeClient,
    current: Option<(String, JoinHandle<Result<ProductInfo, LookupError>>)>,
}

impl LookupSession {
    pub fn new(client: BarcodeClient) -> Self {
        Self { client, current: None }
    }

    pub fn start(&mut self, barcode: &str) {
        self.cancel();
        let client = self.client.clone();
        let code = barcode.to_string();
        let handle = tokio::spawn(async move { client.lookup(&code).await });
        self.current = Some((barcode.to_string(), handle));
    }

    pub fn cancel(&mut self) {
        if let Some((barcode, handle)) = self.current.take() {
            if !handle.is_finished() {
                debug!("Cancelling lookup for barcode {}", barcode);
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.current.as_ref().map_or(false, |(_, h)| !h.is_finished())
    }

    /// Wait for the current lookup. `Cancelled` when none is in flight.
    pub async fn wait(&mut self) -> Result<ProductInfo, LookupError> {
        let Some((_, handle)) = self.current.take() else {
            return Err(LookupError::Cancelled);
        };
        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(LookupError::Cancelled),
            Err(e) => Err(LookupError::Network(e.to_string())),
        }
    }

    /// Look up `barcode` and fill `draft` on success
    pub async fn lookup_into(&mut self, barcode: &str, draft: &mut ItemDraft) -> Result<(), LookupError> {
        self.start(barcode);
        let product = self.wait().await?;
        apply_product(draft, barcode, &product);
        Ok(())
    }
}

impl Drop for LookupSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn lookup_handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        match params.get("upc").map(String::as_str) {
            Some("012345678905") => Json(json!({
                "code": "OK",
                "items": [{ "title": "Cordless Drill", "brand": "DeWalt", "model": "DCD771" }]
            })),
            Some("slow") => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "items": [{ "title": "Too Late" }] }))
            }
            Some("garbage") => Json(json!("not an object")),
            _ => Json(json!({ "code": "OK", "items": [] })),
        }
    }

    async fn start_test_server() -> String {
        let app = Router::new().route("/lookup", get(lookup_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });
        format!("http://{}/lookup", addr)
    }

    #[tokio::test]
    async fn test_lookup_returns_first_product() {
        let client = BarcodeClient::new(start_test_server().await).unwrap();
        let product = client.lookup("012345678905").await.expect("Lookup should succeed");
        assert_eq!(product.title.as_deref(), Some("Cordless Drill"));
        assert_eq!(product.brand.as_deref(), Some("DeWalt"));
    }

    #[tokio::test]
    async fn test_empty_or_unreadable_result_is_no_product() {
        let client = BarcodeClient::new(start_test_server().await).unwrap();

        let err = client.lookup("999").await.unwrap_err();
        assert_eq!(err, LookupError::NoProduct("999".to_string()));
        assert_eq!(
            err.to_string(),
            "No product found for barcode 999. You can still enter details manually."
        );

        let err = client.lookup("garbage").await.unwrap_err();
        assert!(matches!(err, LookupError::NoProduct(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // bind then drop so the port is closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BarcodeClient::new(format!("http://{}/lookup", addr)).unwrap();
        let err = client.lookup("012345678905").await.unwrap_err();
        assert!(matches!(err, LookupError::Network(_)));
        assert_eq!(err.to_string(), "Could not reach the product database. Check your connection.");
    }

    #[test]
    fn test_apply_product_fills_only_empty_fields() {
        let mut draft = ItemDraft {
            name: "My drill".to_string(),
            ..Default::default()
        };
        let product = ProductInfo {
            title: Some("Cordless Drill".to_string()),
            brand: Some("DeWalt".to_string()),
            model: None,
        };
        apply_product(&mut draft, "012345678905", &product);

        assert_eq!(draft.name, "My drill");
        assert_eq!(draft.make, "DeWalt");
        assert_eq!(draft.model, "");
        assert_eq!(draft.serial_number, "012345678905");
    }

    #[tokio::test]
    async fn test_new_lookup_supersedes_pending_one() {
        let client = BarcodeClient::new(start_test_server().await).unwrap();
        let mut session = LookupSession::new(client);

        session.start("slow");
        assert!(session.is_pending());

        let mut draft = ItemDraft::default();
        session
            .lookup_into("012345678905", &mut draft)
            .await
            .expect("Second lookup should succeed");
        assert_eq!(draft.name, "Cordless Drill");
        assert_eq!(draft.serial_number, "012345678905");
    }

    #[tokio::test]
    async fn test_cancelled_lookup_leaves_draft_untouched() {
        let client = BarcodeClient::new(start_test_server().await).unwrap();
        let mut session = LookupSession::new(client);

        session.start("slow");
        session.cancel();
        assert!(!session.is_pending());
        assert_eq!(session.wait().await, Err(LookupError::Cancelled));
    }
}

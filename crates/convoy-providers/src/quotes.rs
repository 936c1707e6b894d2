//! Quotes capability provider.
//!
//! Calls a quotes search API:
//!
//! - `GET /api/quotes?query=<q>&limit=5`
//! - `GET /health` as the health probe
//!
//! The quote shape is kept loose (`text` or `content`, optional author
//! and source) since feeds differ; the raw quote objects travel through
//! the result payload untouched.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use convoy_core::BoxFuture;

use crate::error::ProviderError;
use crate::provider::{
    CapabilityProvider, HEALTH_CHECK_TIMEOUT, map_transport_error, validate_base_url,
};
use crate::result::ProviderResult;

const NAME: &str = "quotes";
const QUERY_ENDPOINT: &str = "/api/quotes";
const QUOTE_LIMIT: u32 = 5;

/// Provider for quotations and sayings.
pub struct QuotesProvider {
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
    enabled: bool,
}

impl QuotesProvider {
    /// Creates a new quotes provider.
    pub fn new(
        api_url: Option<&str>,
        timeout: Duration,
        enabled: bool,
    ) -> Result<Self, ProviderError> {
        let base_url = validate_base_url(NAME, api_url)?;
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::internal(format!("failed to create HTTP client: {e}"))
                .with_provider(NAME)
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            enabled,
        })
    }

    async fn query_backend(&self, base: &str, query: &str) -> ProviderResult {
        let endpoint = format!("{base}{QUERY_ENDPOINT}");
        let limit = QUOTE_LIMIT.to_string();
        debug!(endpoint = %endpoint, "calling quotes API");

        let response = match self
            .client
            .get(&endpoint)
            .query(&[("query", query), ("limit", limit.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ProviderResult::from_error(&map_transport_error(
                    NAME,
                    base,
                    self.timeout,
                    &e,
                ))
                .with_endpoint(QUERY_ENDPOINT);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let err =
                ProviderError::upstream(format!("quotes API returned error: {}", status.as_u16()))
                    .with_provider(NAME);
            return ProviderResult::from_error(&err).with_endpoint(QUERY_ENDPOINT);
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                let err = ProviderError::upstream(format!("malformed quotes response: {e}"))
                    .with_provider(NAME);
                return ProviderResult::from_error(&err).with_endpoint(QUERY_ENDPOINT);
            }
        };

        let quotes = body
            .get("quotes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if quotes.is_empty() {
            return ProviderResult::failure(NAME, "no quotes found matching the query")
                .with_endpoint(QUERY_ENDPOINT);
        }

        ProviderResult::success(
            NAME,
            json!({
                "count": quotes.len(),
                "quotes": quotes,
            }),
        )
        .with_endpoint(QUERY_ENDPOINT)
    }
}

impl CapabilityProvider for QuotesProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Quotes tool - provides quotations and sayings from syndicated feeds".to_string()
    }

    fn intent_keywords(&self) -> Vec<String> {
        [
            "quote",
            "quotes",
            "quotation",
            "saying",
            "proverb",
            "wisdom",
            "inspiration",
            "inspire",
            "motivate",
            "motivation",
            "famous saying",
            "who said",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn required_config(&self) -> Vec<&'static str> {
        vec!["api_url"]
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_available(&self) -> bool {
        self.enabled && self.base_url.is_some()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn execute(&self, query: &str) -> BoxFuture<'_, ProviderResult> {
        let query = query.to_string();
        Box::pin(async move {
            let Some(base) = self.base_url.clone().filter(|_| self.enabled) else {
                return ProviderResult::failure(
                    NAME,
                    "quotes tool is not available or not configured",
                );
            };
            self.query_backend(&base, &query).await
        })
    }

    fn health_check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let Some(base) = self.base_url.clone().filter(|_| self.enabled) else {
                return false;
            };
            let url = format!("{base}/health");
            match self
                .client
                .get(&url)
                .timeout(HEALTH_CHECK_TIMEOUT)
                .send()
                .await
            {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    warn!(error = %e, "quotes health check failed");
                    false
                }
            }
        })
    }

    fn format_for_llm(&self, result: &ProviderResult) -> String {
        if !result.success {
            return format!("\n\n[Quotes unavailable: {}]", result.error_message());
        }

        let empty = json!({});
        let data = result.data.as_ref().unwrap_or(&empty);
        let Some(quotes) = data.get("quotes").and_then(Value::as_array) else {
            return "\n\n[No quotes found]".to_string();
        };

        let mut out = String::from("\n\n---\nRELEVANT QUOTES:\n");
        for (i, quote) in quotes.iter().enumerate() {
            let text = quote
                .get("text")
                .or_else(|| quote.get("content"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let author = quote
                .get("author")
                .and_then(Value::as_str)
                .unwrap_or("Unknown");

            out.push_str(&format!("\n{}. \"{text}\"\n   - {author}", i + 1));
            if let Some(source) = quote
                .get("source")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            {
                out.push_str(&format!(" ({source})"));
            }
            out.push('\n');
        }
        out.push_str("\n---\n\nUse the quotes above to help answer the user's question.\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> QuotesProvider {
        QuotesProvider::new(Some(server.uri().as_str()), Duration::from_secs(2), true).unwrap()
    }

    #[tokio::test]
    async fn matches_quote_vocabulary() {
        let server = MockServer::start().await;
        let provider = provider(&server);
        assert!(provider.can_handle("give me an inspirational QUOTE"));
        assert!(provider.can_handle("who said that?"));
        assert!(!provider.can_handle("what's the weather"));
    }

    #[tokio::test]
    async fn successful_search_carries_the_quotes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quotes"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "quotes": [
                    {"text": "Less is more.", "author": "Mies", "source": "lectures"},
                    {"content": "Keep going.", "author": "Unknown"}
                ]
            })))
            .mount(&server)
            .await;

        let result = provider(&server).execute("quote about design").await;
        assert!(result.success);
        assert_eq!(result.data.as_ref().unwrap()["count"], 2);
    }

    #[tokio::test]
    async fn empty_result_set_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quotes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quotes": []})))
            .mount(&server)
            .await;

        let result = provider(&server).execute("quote").await;
        assert!(!result.success);
        assert_eq!(result.error_message(), "no quotes found matching the query");
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quotes"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = provider(&server).execute("quote").await;
        assert!(!result.success);
        assert_eq!(result.error_message(), "quotes API returned error: 404");
    }

    #[tokio::test]
    async fn formats_numbered_quote_list() {
        let server = MockServer::start().await;
        let provider = provider(&server);

        let result = ProviderResult::success(
            NAME,
            json!({
                "count": 2,
                "quotes": [
                    {"text": "Less is more.", "author": "Mies", "source": "lectures"},
                    {"content": "Keep going.", "author": "Unknown"}
                ]
            }),
        );
        let block = provider.format_for_llm(&result);
        assert!(block.contains("RELEVANT QUOTES:"));
        assert!(block.contains("1. \"Less is more.\"\n   - Mies (lectures)"));
        assert!(block.contains("2. \"Keep going.\"\n   - Unknown"));

        let failed = ProviderResult::failure(NAME, "no quotes found matching the query");
        assert!(
            provider
                .format_for_llm(&failed)
                .contains("[Quotes unavailable:")
        );
    }

    #[tokio::test]
    async fn health_check_probes_the_health_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(provider(&server).health_check().await);
    }
}

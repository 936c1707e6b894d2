//! Generic REST capability provider.
//!
//! The extension point for new data sources: any JSON-over-HTTP backend
//! with a query endpoint can be registered by describing it with a
//! [`RestProviderSpec`] instead of writing a new provider type. The raw
//! JSON body becomes the result payload and the default labeled block is
//! used for LLM formatting.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use convoy_core::BoxFuture;

use crate::error::ProviderError;
use crate::provider::{
    CapabilityProvider, HEALTH_CHECK_TIMEOUT, map_transport_error, validate_base_url,
};
use crate::result::ProviderResult;

/// Description of a REST backend: name, vocabulary, and paths.
#[derive(Debug, Clone)]
pub struct RestProviderSpec {
    /// Registry name of the provider.
    pub name: String,
    /// One-line summary for status surfaces.
    pub description: String,
    /// Keywords marking a query as relevant.
    pub keywords: Vec<String>,
    /// Path of the query endpoint; receives `?query=<q>`.
    pub query_path: String,
    /// Path of the health endpoint.
    pub health_path: String,
}

impl RestProviderSpec {
    /// Creates a spec with default `/api/query` and `/health` paths.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            query_path: "/api/query".to_string(),
            health_path: "/health".to_string(),
        }
    }

    /// Builder method to set the keyword vocabulary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the query path.
    pub fn with_query_path(mut self, path: impl Into<String>) -> Self {
        self.query_path = path.into();
        self
    }

    /// Builder method to set the health path.
    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }
}

/// A capability provider for an arbitrary JSON-over-HTTP backend.
pub struct RestProvider {
    spec: RestProviderSpec,
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
    enabled: bool,
}

impl RestProvider {
    /// Creates a new REST provider from its spec and configuration.
    pub fn new(
        spec: RestProviderSpec,
        api_url: Option<&str>,
        timeout: Duration,
        enabled: bool,
    ) -> Result<Self, ProviderError> {
        let base_url = validate_base_url(&spec.name, api_url)?;
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::internal(format!("failed to create HTTP client: {e}"))
                .with_provider(&spec.name)
        })?;

        Ok(Self {
            spec,
            client,
            base_url,
            timeout,
            enabled,
        })
    }

    async fn query_backend(&self, base: &str, query: &str) -> ProviderResult {
        let name = &self.spec.name;
        let endpoint = format!("{base}{}", self.spec.query_path);
        debug!(provider = %name, endpoint = %endpoint, "calling REST backend");

        let response = match self
            .client
            .get(&endpoint)
            .query(&[("query", query)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ProviderResult::from_error(&map_transport_error(
                    name,
                    base,
                    self.timeout,
                    &e,
                ))
                .with_endpoint(self.spec.query_path.clone());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let err = ProviderError::upstream(format!(
                "{name} API returned error: {}",
                status.as_u16()
            ))
            .with_provider(name);
            return ProviderResult::from_error(&err).with_endpoint(self.spec.query_path.clone());
        }

        match response.json::<Value>().await {
            Ok(body) => ProviderResult::success(name.clone(), body)
                .with_endpoint(self.spec.query_path.clone()),
            Err(e) => {
                let err = ProviderError::upstream(format!("malformed {name} response: {e}"))
                    .with_provider(name);
                ProviderResult::from_error(&err).with_endpoint(self.spec.query_path.clone())
            }
        }
    }
}

impl CapabilityProvider for RestProvider {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> String {
        self.spec.description.clone()
    }

    fn intent_keywords(&self) -> Vec<String> {
        self.spec.keywords.clone()
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
                    self.spec.name.clone(),
                    format!("{} tool is not available or not configured", self.spec.name),
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
            let url = format!("{base}{}", self.spec.health_path);
            match self
                .client
                .get(&url)
                .timeout(HEALTH_CHECK_TIMEOUT)
                .send()
                .await
            {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    warn!(provider = %self.spec.name, error = %e, "health check failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spec() -> RestProviderSpec {
        RestProviderSpec::new("news", "News tool - headlines")
            .with_keywords(["news", "headline", "headlines"])
            .with_query_path("/api/search")
            .with_health_path("/api/health")
    }

    fn provider(server: &MockServer) -> RestProvider {
        RestProvider::new(spec(), Some(server.uri().as_str()), Duration::from_secs(2), true).unwrap()
    }

    #[tokio::test]
    async fn matches_its_configured_vocabulary() {
        let server = MockServer::start().await;
        let provider = provider(&server);
        assert!(provider.can_handle("any news today?"));
        assert!(!provider.can_handle("weather please"));
        assert_eq!(provider.name(), "news");
    }

    #[tokio::test]
    async fn returns_the_raw_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("query", "headlines"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"title": "convoy ships"}]})),
            )
            .mount(&server)
            .await;

        let provider = provider(&server);
        let result = provider.execute("headlines").await;
        assert!(result.success);
        assert_eq!(
            result.data.as_ref().unwrap()["items"][0]["title"],
            "convoy ships"
        );

        // Default labeled block from the trait.
        let block = provider.format_for_llm(&result);
        assert!(block.starts_with("[news tool response:"));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_the_provider_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = provider(&server).execute("news").await;
        assert!(!result.success);
        assert_eq!(result.error_message(), "news API returned error: 502");
        assert_eq!(result.metadata.provider, "news");
    }

    #[tokio::test]
    async fn health_uses_the_configured_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(provider(&server).health_check().await);
    }
}

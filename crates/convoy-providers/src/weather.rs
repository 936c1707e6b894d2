//! Weather capability provider.
//!
//! Calls a weather query API that accepts natural-language prompts and
//! answers with pre-rendered text plus a timestamp:
//!
//! - `POST /weather/query` with `{prompt, include_current, include_forecast}`
//! - `GET /weather/status` as the health probe

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use convoy_core::BoxFuture;

use crate::error::ProviderError;
use crate::provider::{
    CapabilityProvider, HEALTH_CHECK_TIMEOUT, map_transport_error, validate_base_url,
};
use crate::result::ProviderResult;

const NAME: &str = "weather";
const QUERY_ENDPOINT: &str = "/weather/query";

/// Wire shape of the weather API response.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response_text: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    message: Option<String>,
}

/// Provider for current conditions and forecasts.
#[derive(Debug)]
pub struct WeatherProvider {
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
    enabled: bool,
}

impl WeatherProvider {
    /// Creates a new weather provider.
    ///
    /// A missing API URL produces an unavailable provider rather than an
    /// error; an invalid URL is a configuration error.
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
        let payload = json!({
            "prompt": query,
            "include_current": true,
            "include_forecast": true,
            "broadcast": false,
        });

        debug!(endpoint = %endpoint, "calling weather API");

        let response = match self.client.post(&endpoint).json(&payload).send().await {
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
                ProviderError::upstream(format!("weather API returned error: {}", status.as_u16()))
                    .with_provider(NAME);
            return ProviderResult::from_error(&err).with_endpoint(QUERY_ENDPOINT);
        }

        let body: WeatherResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                let err = ProviderError::upstream(format!("malformed weather response: {e}"))
                    .with_provider(NAME);
                return ProviderResult::from_error(&err).with_endpoint(QUERY_ENDPOINT);
            }
        };

        if body.success {
            ProviderResult::success(
                NAME,
                json!({
                    "response": body.response_text,
                    "timestamp": body.timestamp,
                }),
            )
            .with_endpoint(QUERY_ENDPOINT)
        } else {
            let message = body
                .message
                .unwrap_or_else(|| "unknown error from weather API".to_string());
            ProviderResult::failure(NAME, message).with_endpoint(QUERY_ENDPOINT)
        }
    }
}

impl CapabilityProvider for WeatherProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Weather tool - provides current conditions and forecasts from the weather service"
            .to_string()
    }

    fn intent_keywords(&self) -> Vec<String> {
        [
            // Direct weather terms
            "weather",
            "temperature",
            "temp",
            "forecast",
            "rain",
            "raining",
            "sunny",
            "cloudy",
            "snow",
            "snowing",
            "wind",
            "windy",
            "humidity",
            "humid",
            "hot",
            "cold",
            "warm",
            "cool",
            "freezing",
            // Weather metrics
            "degrees",
            "fahrenheit",
            "celsius",
            "precipitation",
            "pressure",
            "barometric",
            "uv index",
            "sunshine",
            // Weather questions
            "outside",
            "outdoors",
            "umbrella",
            "jacket",
            "coat",
            "what.*like outside",
            "how.*outside",
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
                    "weather tool is not available or not configured",
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
            let url = format!("{base}/weather/status");
            match self
                .client
                .get(&url)
                .timeout(HEALTH_CHECK_TIMEOUT)
                .send()
                .await
            {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    warn!(error = %e, "weather health check failed");
                    false
                }
            }
        })
    }

    fn format_for_llm(&self, result: &ProviderResult) -> String {
        if !result.success {
            return format!("\n\n[Weather data unavailable: {}]", result.error_message());
        }

        let empty = json!({});
        let data = result.data.as_ref().unwrap_or(&empty);
        let response = data["response"].as_str().unwrap_or_default();
        let timestamp = data["timestamp"].as_str().unwrap_or_default();

        format!(
            "\n\n---\nWEATHER INFORMATION:\n{response}\n\nTimestamp: {timestamp}\n---\n\n\
             Use the weather information above to answer the user's question about weather conditions.\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new(Some(server.uri().as_str()), Duration::from_secs(2), true).unwrap()
    }

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let err = WeatherProvider::new(Some("not a url"), Duration::from_secs(1), true)
            .unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ProviderErrorCode::Configuration
        );
    }

    #[test]
    fn availability_requires_enablement_and_url() {
        let no_url = WeatherProvider::new(None, Duration::from_secs(1), true).unwrap();
        assert!(!no_url.is_available());

        let disabled =
            WeatherProvider::new(Some("http://localhost:1"), Duration::from_secs(1), false)
                .unwrap();
        assert!(!disabled.is_available());
        assert!(!disabled.can_handle("weather"));
    }

    #[tokio::test]
    async fn matches_weather_vocabulary() {
        let server = MockServer::start().await;
        let provider = provider(&server);
        assert!(provider.can_handle("what's the WEATHER today"));
        assert!(provider.can_handle("should I bring an umbrella?"));
        assert!(provider.can_handle("what's it like outside"));
        assert!(!provider.can_handle("tell me a joke"));
    }

    #[tokio::test]
    async fn successful_query_maps_the_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather/query"))
            .and(body_partial_json(json!({"include_current": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "response_text": "Sunny, 41F, light wind.",
                "timestamp": "2025-01-20T12:00:00-07:00"
            })))
            .mount(&server)
            .await;

        let result = provider(&server).execute("weather?").await;
        assert!(result.success);
        let data = result.data.as_ref().unwrap();
        assert_eq!(data["response"], "Sunny, 41F, light wind.");
        assert_eq!(result.metadata.endpoint.as_deref(), Some("/weather/query"));
    }

    #[tokio::test]
    async fn upstream_declared_failure_uses_its_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "station offline"
            })))
            .mount(&server)
            .await;

        let result = provider(&server).execute("weather?").await;
        assert!(!result.success);
        assert_eq!(result.error_message(), "station offline");
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather/query"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = provider(&server).execute("weather?").await;
        assert!(!result.success);
        assert_eq!(result.error_message(), "weather API returned error: 503");
        assert_eq!(result.metadata.error_code, Some("upstream_error"));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
            .mount(&server)
            .await;

        let result = provider(&server).execute("weather?").await;
        assert!(!result.success);
        assert!(result.error_message().starts_with("malformed weather response"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_connection_failure() {
        let server = MockServer::start().await;
        let provider = provider(&server);
        drop(server);

        let result = provider.execute("weather?").await;
        assert!(!result.success);
        assert!(result.error_message().contains("cannot connect"));
        assert_eq!(result.metadata.error_code, Some("connection_error"));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(Some(server.uri().as_str()), Duration::from_millis(100), true).unwrap();
        let result = provider.execute("weather?").await;
        assert!(!result.success);
        assert!(result.error_message().contains("timed out"));
        assert_eq!(result.metadata.error_code, Some("timeout"));
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_without_a_request() {
        let provider = WeatherProvider::new(None, Duration::from_secs(1), true).unwrap();
        let result = provider.execute("weather?").await;
        assert!(!result.success);
        assert!(result.error_message().contains("not configured"));
    }

    #[tokio::test]
    async fn formats_weather_block_for_llm() {
        let server = MockServer::start().await;
        let provider = provider(&server);

        let ok = ProviderResult::success(
            NAME,
            json!({"response": "Cloudy.", "timestamp": "2025-01-20"}),
        );
        let block = provider.format_for_llm(&ok);
        assert!(block.contains("WEATHER INFORMATION:"));
        assert!(block.contains("Cloudy."));
        assert!(block.contains("Timestamp: 2025-01-20"));

        let failed = ProviderResult::failure(NAME, "backend down");
        assert_eq!(
            provider.format_for_llm(&failed),
            "\n\n[Weather data unavailable: backend down]"
        );
    }

    #[tokio::test]
    async fn health_check_probes_the_status_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert!(provider.health_check().await);

        drop(server);
        assert!(!provider.health_check().await);
    }
}

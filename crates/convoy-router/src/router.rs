//! The capability router.
//!
//! [`CapabilityRouter`] owns the provider registry, matches incoming
//! queries against provider vocabularies, executes every matching
//! provider concurrently with a bounded budget, and merges the results
//! into one context blob for a downstream text generator or speech
//! layer.
//!
//! The registry is built once at startup and read-only afterwards:
//! `route` takes `&self`, owns its result buffers, and is safe to call
//! from any number of concurrent requests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use convoy_providers::{
    CalendarProvider, CapabilityProvider, ProviderError, ProviderResult, QuotesProvider,
    WeatherProvider,
};

use crate::config::RouterConfig;

/// Extra time granted on top of a provider's own timeout before the
/// router abandons the call. The provider's HTTP client should fail
/// first; this ceiling only catches providers that hang some other way.
const TIMEOUT_SLACK: Duration = Duration::from_secs(2);

/// The merged outcome of routing one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteResult {
    /// Concatenated provider context blocks, in registration order.
    /// Empty when no provider matched.
    pub context: String,
    /// Every attempted provider's structured result, by provider name.
    pub raw: BTreeMap<String, ProviderResult>,
    /// Names of the providers whose execution succeeded, in
    /// registration order.
    pub used: Vec<String>,
}

impl RouteResult {
    /// True when no provider was attempted for the query.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// One provider's entry on the monitoring surface.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    /// Registry name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Whether the provider is switched on in configuration.
    pub enabled: bool,
    /// Whether it is enabled and fully configured.
    pub available: bool,
    /// Result of a reachability probe.
    pub healthy: bool,
    /// The provider's routing vocabulary.
    pub keywords: Vec<String>,
}

/// Matches queries to providers and merges their outputs.
pub struct CapabilityRouter {
    providers: Vec<Arc<dyn CapabilityProvider>>,
}

impl CapabilityRouter {
    /// Builds the router and its provider registry from configuration.
    ///
    /// Providers are registered even when disabled or unconfigured so
    /// the status surface can report them; `route` only ever invokes
    /// available ones. A provider whose configuration is invalid (bad
    /// URL) is logged and skipped. With the master switch off the
    /// registry stays empty.
    pub fn new(config: &RouterConfig) -> Self {
        if !config.enabled {
            warn!("capability routing disabled by master switch");
            return Self {
                providers: Vec::new(),
            };
        }

        let mut providers: Vec<Arc<dyn CapabilityProvider>> = Vec::new();

        match WeatherProvider::new(
            config.weather.api_url(),
            config.weather.timeout,
            config.weather.enabled,
        ) {
            Ok(provider) => providers.push(Arc::new(provider)),
            Err(e) => error!(error = %e, "failed to initialize weather provider"),
        }

        match QuotesProvider::new(
            config.quotes.api_url(),
            config.quotes.timeout,
            config.quotes.enabled,
        ) {
            Ok(provider) => providers.push(Arc::new(provider)),
            Err(e) => error!(error = %e, "failed to initialize quotes provider"),
        }

        match CalendarProvider::from_settings(
            config.calendar.api_url(),
            config.calendar.timeout,
            config.calendar.enabled,
            config.timezone,
        ) {
            Ok(provider) => providers.push(Arc::new(provider)),
            Err(e) => error!(error = %e, "failed to initialize calendar provider"),
        }

        for provider in &providers {
            if provider.is_available() {
                info!(provider = provider.name(), "provider registered");
            } else if provider.is_enabled() {
                warn!(
                    provider = provider.name(),
                    "provider enabled but not fully configured"
                );
            } else {
                debug!(provider = provider.name(), "provider disabled");
            }
        }

        let active = providers.iter().filter(|p| p.is_available()).count();
        info!(active, total = providers.len(), "capability router initialized");

        Self { providers }
    }

    /// Builds a router over an explicit provider list.
    ///
    /// This is the dependency-injection seam for embedding custom
    /// providers (e.g. [`convoy_providers::RestProvider`]) and for
    /// tests.
    pub fn with_providers(providers: Vec<Arc<dyn CapabilityProvider>>) -> Self {
        Self { providers }
    }

    /// Number of registered providers, regardless of availability.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Names of the providers that are currently available.
    pub fn active_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name())
            .collect()
    }

    /// Routes a query through every matching provider.
    ///
    /// Matching providers run concurrently; each gets its own timeout
    /// plus slack, and a provider that exceeds it contributes a timeout
    /// failure instead of blocking the batch. The merged context is
    /// assembled in registration order, so output is deterministic even
    /// though completion order is not. Zero matches yield an empty
    /// result, not an error, and this method never fails.
    pub async fn route(&self, query: &str) -> RouteResult {
        let matching: Vec<Arc<dyn CapabilityProvider>> = self
            .providers
            .iter()
            .filter(|p| p.is_available() && p.can_handle(query))
            .cloned()
            .collect();

        if matching.is_empty() {
            debug!("no providers matched query");
            return RouteResult::default();
        }

        let names: Vec<&str> = matching.iter().map(|p| p.name()).collect();
        info!(count = matching.len(), providers = ?names, "query matched providers");

        let executions = matching.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = query.to_string();
            async move {
                let started = Instant::now();
                let budget = provider.timeout() + TIMEOUT_SLACK;
                let result = match tokio::time::timeout(budget, provider.execute(&query)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            provider = provider.name(),
                            budget_secs = budget.as_secs(),
                            "provider exceeded its execution budget"
                        );
                        let err = ProviderError::timeout(format!(
                            "{} provider timed out after {} seconds",
                            provider.name(),
                            budget.as_secs()
                        ))
                        .with_provider(provider.name());
                        ProviderResult::from_error(&err)
                    }
                };
                result.with_elapsed(started.elapsed())
            }
        });

        // join_all preserves input order, which is registration order.
        let results = join_all(executions).await;

        let mut context_parts = Vec::new();
        let mut raw = BTreeMap::new();
        let mut used = Vec::new();

        for (provider, result) in matching.iter().zip(results) {
            let formatted = provider.format_for_llm(&result);
            if !formatted.is_empty() {
                context_parts.push(formatted);
            }

            if result.success {
                used.push(provider.name().to_string());
            } else {
                warn!(
                    provider = provider.name(),
                    error = result.error_message(),
                    "provider failed"
                );
            }

            raw.insert(provider.name().to_string(), result);
        }

        RouteResult {
            context: context_parts.join("\n"),
            raw,
            used,
        }
    }

    /// Probes every registered provider's backend concurrently.
    pub async fn health(&self) -> BTreeMap<String, bool> {
        let checks = self
            .providers
            .iter()
            .map(|p| async move { (p.name().to_string(), p.health_check().await) });
        join_all(checks).await.into_iter().collect()
    }

    /// Snapshot of every registered provider for a monitoring surface.
    pub async fn status(&self) -> Vec<ProviderInfo> {
        let snapshots = self.providers.iter().map(|p| async move {
            ProviderInfo {
                name: p.name().to_string(),
                description: p.description(),
                enabled: p.is_enabled(),
                available: p.is_available(),
                healthy: p.health_check().await,
                keywords: p.intent_keywords(),
            }
        });
        join_all(snapshots).await
    }
}

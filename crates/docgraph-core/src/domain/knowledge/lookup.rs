//! External entity lookup and scatter/gather enrichment
//!
//! Enrichment sends the first few extracted candidates to an entity search
//! service concurrently. Each lookup is isolated: a failure or timeout for
//! one candidate only loses that candidate's matches. The batch as a whole
//! fails only when every lookup failed.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::error::{Error, Result};

/// An entity returned by the lookup service
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntity {
    /// Service-side identifier, stable across queries
    pub id: String,
    pub name: String,
    /// Type tags, most specific first as reported by the service
    pub types: Vec<String>,
    pub description: Option<String>,
    /// Raw relevance score
    pub score: f64,
}

impl LookupEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            types: Vec::new(),
            description: None,
            score,
        }
    }

    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// First declared type tag, "Thing" when none
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or("Thing")
    }
}

/// Entity search service
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Search for up to `limit` entities matching `query`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LookupEntity>>;
}

/// Limits applied to one enrichment batch
#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub max_candidates: usize,
    pub results_per_candidate: usize,
    pub max_entities: usize,
    /// Per-lookup bound
    pub timeout: Duration,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self::from(&EnrichmentConfig::default())
    }
}

impl From<&EnrichmentConfig> for EnrichmentSettings {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            max_candidates: config.max_candidates,
            results_per_candidate: config.results_per_candidate,
            max_entities: config.max_entities,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Look up candidates concurrently and gather the matches.
///
/// Returns the flattened matches in candidate order, duplicates by id
/// removed, capped at `max_entities`. Fails with
/// [`Error::EnrichmentFailed`] only when every lookup failed.
pub async fn enrich(
    lookup: &dyn EntityLookup,
    candidates: &[String],
    settings: &EnrichmentSettings,
) -> Result<Vec<LookupEntity>> {
    let batch: Vec<&String> = candidates.iter().take(settings.max_candidates).collect();
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let lookups = batch.iter().map(|candidate| async move {
        let outcome = tokio::time::timeout(
            settings.timeout,
            lookup.search(candidate.as_str(), settings.results_per_candidate),
        )
        .await
        .unwrap_or_else(|_| Err(Error::LookupTimeout(settings.timeout.as_secs())));

        match outcome {
            Ok(mut matches) => {
                matches.truncate(settings.results_per_candidate);
                debug!(candidate = %candidate, matches = matches.len(), "Lookup completed");
                Some(matches)
            }
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "Lookup failed, skipping candidate");
                None
            }
        }
    });

    let outcomes = join_all(lookups).await;
    let failures = outcomes.iter().filter(|o| o.is_none()).count();

    if failures == batch.len() {
        return Err(Error::EnrichmentFailed(format!(
            "all {} lookups failed",
            failures
        )));
    }

    let mut seen = HashSet::new();
    let entities = outcomes
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entity| seen.insert(entity.id.clone()))
        .take(settings.max_entities)
        .collect();

    Ok(entities)
}

/// Client for the Google Knowledge Graph Search API
#[derive(Clone)]
pub struct KnowledgeGraphClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for KnowledgeGraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraphClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl KnowledgeGraphClient {
    /// Create a client for `base_url` authenticated with `api_key`
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::NetworkError)?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from configuration; `None` when enrichment is inactive
    pub fn from_config(config: &EnrichmentConfig) -> Result<Option<Self>> {
        if !config.is_active() {
            return Ok(None);
        }
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::ConfigError("API key is required".to_string()))?;

        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }
}

#[async_trait]
impl EntityLookup for KnowledgeGraphClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LookupEntity>> {
        let limit = limit.to_string();
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("query", query),
                ("key", self.api_key.as_str()),
                ("limit", limit.as_str()),
                ("indent", "false"),
            ])
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LookupFailed(format!("HTTP {} for '{}'", status, query)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::LookupFailed(format!("Failed to parse response: {}", e)))?;

        Ok(body.into_entities())
    }
}

/// Response body of the search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "itemListElement")]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    result: Option<SearchResult>,
    #[serde(default, rename = "resultScore")]
    result_score: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "@id")]
    id: Option<String>,
    name: Option<String>,
    #[serde(default, rename = "@type")]
    types: Vec<String>,
    description: Option<String>,
}

impl SearchResponse {
    /// Keep only items carrying both an id and a name
    fn into_entities(self) -> Vec<LookupEntity> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let result = item.result?;
                let id = result.id.filter(|s| !s.is_empty())?;
                let name = result.name.filter(|s| !s.trim().is_empty())?;

                let mut entity = LookupEntity::new(id, name, item.result_score).with_types(result.types);
                if let Some(description) = result.description {
                    entity = entity.with_description(description);
                }
                Some(entity)
            })
            .collect()
    }
}

//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Google Knowledge Graph Search API endpoint
pub const DEFAULT_LOOKUP_URL: &str = "https://kgsearch.googleapis.com/v1/entities:search";

/// Environment variables consulted for the lookup credential, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["DOCGRAPH_KG_API_KEY", "GOOGLE_KG_API_KEY"];

/// Docgraph configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Settings for the external entity lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Master switch; when off the engine always runs the local analysis
    pub enabled: bool,
    /// Credential for the lookup service. Never written to disk.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    /// Upper bound for a single lookup, in seconds
    pub timeout_secs: u64,
    /// How many extracted candidates are sent to the lookup service
    pub max_candidates: usize,
    /// Matches requested per candidate
    pub results_per_candidate: usize,
    /// Cap on the flattened entity list
    pub max_entities: usize,
}

/// Settings for graph synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// A same-cluster pair that never co-occurs is linked only when a uniform
    /// draw exceeds this value
    pub cluster_edge_threshold: f64,
    /// Fixed seed for the sparsification draws
    pub seed: Option<u64>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_LOOKUP_URL.to_string(),
            timeout_secs: 5,
            max_candidates: 10,
            results_per_candidate: 3,
            max_entities: 15,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cluster_edge_threshold: 0.7,
            seed: None,
        }
    }
}

impl EnrichmentConfig {
    /// Attach a credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Enrichment runs only when switched on and a non-empty key is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Resolve the credential from the process environment
    pub fn resolve_api_key() -> Option<String> {
        Self::resolve_api_key_with(|name| env::var(name).ok())
    }

    /// Resolve the credential using a custom variable source
    pub fn resolve_api_key_with<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    pub fn redacted_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let count = key.chars().count();
            if count <= 4 {
                "***".to_string()
            } else {
                let suffix: String = key.chars().skip(count - 4).collect();
                format!("***{}", suffix)
            }
        })
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DOCGRAPH_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("docgraph")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location and resolve the
    /// credential from the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.enrichment.api_key = EnrichmentConfig::resolve_api_key();
        Ok(config)
    }

    /// Load configuration from a file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            // Return default config without creating file
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.graph.cluster_edge_threshold) {
            return Err(anyhow!("Cluster edge threshold must be between 0.0 and 1.0"));
        }
        if self.enrichment.timeout_secs == 0 {
            return Err(anyhow!("Lookup timeout must be at least 1 second"));
        }
        if self.enrichment.max_candidates == 0
            || self.enrichment.results_per_candidate == 0
            || self.enrichment.max_entities == 0
        {
            return Err(anyhow!("Enrichment limits must be positive"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            // Enrichment settings
            "enrichment.enabled" => Ok(self.enrichment.enabled.to_string()),
            "enrichment.base_url" => Ok(self.enrichment.base_url.clone()),
            "enrichment.timeout_secs" => Ok(self.enrichment.timeout_secs.to_string()),
            "enrichment.max_candidates" => Ok(self.enrichment.max_candidates.to_string()),
            "enrichment.results_per_candidate" => {
                Ok(self.enrichment.results_per_candidate.to_string())
            }
            "enrichment.max_entities" => Ok(self.enrichment.max_entities.to_string()),

            // Graph settings
            "graph.cluster_edge_threshold" => Ok(self.graph.cluster_edge_threshold.to_string()),
            "graph.seed" => Ok(self
                .graph
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(random)".to_string())),

            // API key (special handling - show redacted)
            "enrichment.api_key" | "api_key" => match self.enrichment.redacted_api_key() {
                Some(redacted) => Ok(redacted),
                None => Ok(format!(
                    "(not set - use {} or {} env var)",
                    API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
                )),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `docgraph config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "enrichment.enabled" => {
                self.enrichment.enabled = value
                    .parse()
                    .with_context(|| format!("Invalid enabled value: {}", value))?;
            }
            "enrichment.base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(anyhow!("Base URL must start with http:// or https://"));
                }
                self.enrichment.base_url = value.to_string();
            }
            "enrichment.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                if secs == 0 {
                    return Err(anyhow!("Lookup timeout must be at least 1 second"));
                }
                self.enrichment.timeout_secs = secs;
            }
            "enrichment.max_candidates" => {
                self.enrichment.max_candidates = parse_positive(key, value)?;
            }
            "enrichment.results_per_candidate" => {
                self.enrichment.results_per_candidate = parse_positive(key, value)?;
            }
            "enrichment.max_entities" => {
                self.enrichment.max_entities = parse_positive(key, value)?;
            }

            "graph.cluster_edge_threshold" => {
                let threshold: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid cluster_edge_threshold value: {}", value))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(anyhow!("Cluster edge threshold must be between 0.0 and 1.0"));
                }
                self.graph.cluster_edge_threshold = threshold;
            }
            "graph.seed" => {
                self.graph.seed = match value {
                    "" | "random" | "none" => None,
                    _ => Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid seed value: {}", value))?,
                    ),
                };
            }

            // API key cannot be set via config
            "enrichment.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the {} environment variable instead.",
                    API_KEY_ENV_VARS[0]
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `docgraph config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "enrichment.enabled",
            "enrichment.api_key",
            "enrichment.base_url",
            "enrichment.timeout_secs",
            "enrichment.max_candidates",
            "enrichment.results_per_candidate",
            "enrichment.max_entities",
            "graph.cluster_edge_threshold",
            "graph.seed",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> anyhow::Result<usize> {
    let parsed: usize = value
        .parse()
        .with_context(|| format!("Invalid {} value: {}", key, value))?;
    if parsed == 0 {
        return Err(anyhow!("{} must be positive", key));
    }
    Ok(parsed)
}

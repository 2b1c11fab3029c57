//! Knowledge extraction engine
//!
//! Orchestrates one analysis call:
//!
//! 1. Extract entity candidates from the text
//! 2. Enrich them through the lookup service, when one is configured
//! 3. Synthesize a graph from the lookup entities, or locally when
//!    enrichment is off, failed, or found nothing
//! 4. Generate insights from the graph
//!
//! The engine holds only immutable configuration. Every call builds its own
//! graph and insights, so one engine can serve concurrent calls.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{Config, GraphConfig};
use crate::error::{Error, Result};

use super::extractor::{EntityExtractor, ExtractionResult};
use super::insights::{ClusterScheme, InsightGenerator};
use super::lookup::{EnrichmentSettings, EntityLookup, KnowledgeGraphClient, enrich};
use super::result::{AnalysisResult, AnalysisSource, Graph};
use super::sampler::{EdgeSampler, RandomEdgeSampler};
use super::stage::{AnalysisStage, StageTracker};
use super::synthesizer::GraphSynthesizer;

/// Analysis input as received from a caller that may omit the text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    pub text: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Decode raw input as UTF-8 text
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("text is not valid UTF-8: {}", e)))
}

/// Text-to-knowledge-graph analysis engine
pub struct KnowledgeEngine {
    extractor: EntityExtractor,
    synthesizer: GraphSynthesizer,
    insights: InsightGenerator,
    /// Lookup service; `None` means enrichment is off
    lookup: Option<Arc<dyn EntityLookup>>,
    settings: EnrichmentSettings,
    graph_config: GraphConfig,
}

impl Default for KnowledgeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KnowledgeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeEngine")
            .field("enrichment", &self.lookup.is_some())
            .field("settings", &self.settings)
            .field("graph_config", &self.graph_config)
            .finish()
    }
}

impl KnowledgeEngine {
    /// Create an engine without enrichment
    pub fn new() -> Self {
        Self {
            extractor: EntityExtractor::new(),
            synthesizer: GraphSynthesizer::new(),
            insights: InsightGenerator::new(),
            lookup: None,
            settings: EnrichmentSettings::default(),
            graph_config: GraphConfig::default(),
        }
    }

    /// Create an engine from configuration.
    ///
    /// Enrichment uses the Knowledge Graph Search API when the config has it
    /// switched on and carries a credential.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut engine = Self::new()
            .with_enrichment_settings(EnrichmentSettings::from(&config.enrichment))
            .with_graph_config(config.graph.clone());

        if let Some(client) = KnowledgeGraphClient::from_config(&config.enrichment)? {
            engine = engine.with_lookup(Arc::new(client));
        }
        Ok(engine)
    }

    /// Use a lookup service for enrichment
    pub fn with_lookup(mut self, lookup: Arc<dyn EntityLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Turn enrichment off regardless of configuration
    pub fn without_lookup(mut self) -> Self {
        self.lookup = None;
        self
    }

    pub fn with_enrichment_settings(mut self, settings: EnrichmentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_graph_config(mut self, graph_config: GraphConfig) -> Self {
        self.graph_config = graph_config;
        self
    }

    pub fn is_enrichment_enabled(&self) -> bool {
        self.lookup.is_some()
    }

    /// Extract entity candidates without building a graph
    pub fn extract_entities(&self, text: &str) -> ExtractionResult {
        self.extractor.extract(text)
    }

    /// Analyze text with the configured sparsification sampler
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let mut sampler = RandomEdgeSampler::from_options(
            self.graph_config.cluster_edge_threshold,
            self.graph_config.seed,
        );
        self.analyze_with_sampler(text, &mut sampler).await
    }

    /// Analyze text with a caller-supplied sampler.
    ///
    /// Never fails: enrichment problems degrade to the local analysis.
    pub async fn analyze_with_sampler(
        &self,
        text: &str,
        sampler: &mut dyn EdgeSampler,
    ) -> AnalysisResult {
        let mut stages = StageTracker::new();

        stages.advance(AnalysisStage::Extracting);
        let extracted = self.extractor.extract(text);

        let source = match &self.lookup {
            None => AnalysisSource::Fallback,
            Some(lookup) => {
                stages.advance(AnalysisStage::Enriching);
                match enrich(lookup.as_ref(), extracted.as_slice(), &self.settings).await {
                    Ok(entities) if !entities.is_empty() => {
                        stages.advance(AnalysisStage::Synthesizing);
                        let graph = self.synthesizer.build_graph(&entities, text, sampler);
                        return self.finish(
                            graph,
                            text,
                            ClusterScheme::Typed,
                            AnalysisSource::Enriched,
                            &mut stages,
                        );
                    }
                    Ok(_) => {
                        info!(
                            candidates = extracted.len(),
                            "Enrichment returned no entities, using local analysis"
                        );
                        AnalysisSource::DegradedFallback
                    }
                    Err(e) => {
                        warn!(error = %e, code = e.code(), "Enrichment failed, using local analysis");
                        AnalysisSource::DegradedFallback
                    }
                }
            }
        };

        stages.advance(AnalysisStage::SynthesizingFallback);
        let graph = self
            .synthesizer
            .build_fallback_graph(text, &extracted, sampler);
        self.finish(graph, text, ClusterScheme::Frequency, source, &mut stages)
    }

    /// Local analysis only, no lookup service involved
    pub fn fallback_analysis(&self, text: &str, sampler: &mut dyn EdgeSampler) -> AnalysisResult {
        let mut stages = StageTracker::new();
        stages.advance(AnalysisStage::Extracting);
        let extracted = self.extractor.extract(text);

        stages.advance(AnalysisStage::SynthesizingFallback);
        let graph = self
            .synthesizer
            .build_fallback_graph(text, &extracted, sampler);
        self.finish(
            graph,
            text,
            ClusterScheme::Frequency,
            AnalysisSource::Fallback,
            &mut stages,
        )
    }

    /// Analyze a request, rejecting one without text
    pub async fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let text = request
            .text
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("analysis request has no text".to_string()))?;
        Ok(self.analyze(text).await)
    }

    /// Analyze raw bytes, rejecting anything that is not UTF-8
    pub async fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        Ok(self.analyze(decode_text(bytes)?).await)
    }

    /// Only the follow-up questions of a full analysis
    pub async fn generate_follow_up_questions(&self, text: &str) -> Vec<String> {
        self.analyze(text).await.insights.questions
    }

    fn finish(
        &self,
        graph: Graph,
        text: &str,
        scheme: ClusterScheme,
        source: AnalysisSource,
        stages: &mut StageTracker,
    ) -> AnalysisResult {
        stages.advance(AnalysisStage::GeneratingInsights);
        let insights = self.insights.generate(&graph.nodes, text, scheme);
        stages.advance(AnalysisStage::Done);

        info!(
            source = %source,
            entity_count = graph.nodes.len(),
            edge_count = graph.edges.len(),
            "Analysis complete"
        );

        AnalysisResult::new(graph, insights, source)
    }
}

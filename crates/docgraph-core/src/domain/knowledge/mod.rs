//! Knowledge graph extraction from free text
//!
//! Turns a document into a small concept graph plus insights:
//!
//! - **Entity extraction**: capitalized words, proper-noun phrases and
//!   acronyms become entity candidates
//! - **Enrichment**: candidates are optionally resolved against an external
//!   entity search service
//! - **Graph synthesis**: typed nodes from enrichment, or a local mix of
//!   entities and frequent terms when enrichment is unavailable
//! - **Insights**: follow-up questions, exploration gaps and named clusters
//!
//! ## Pipeline
//!
//! ```text
//! text → EntityExtractor ─┬→ enrich(EntityLookup) → GraphSynthesizer::build_graph ─┐
//!                         └────────────────────→ GraphSynthesizer::build_fallback ─┴→ InsightGenerator → AnalysisResult
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docgraph_core::domain::knowledge::KnowledgeEngine;
//!
//! let engine = KnowledgeEngine::from_config(&config)?;
//! let result = engine.analyze("Marie Curie discovered radium in Paris.").await;
//! for node in &result.graph.nodes {
//!     println!("{} ({})", node.label, node.node_type);
//! }
//! ```

mod engine;
mod entity;
mod extractor;
mod frequency;
mod insights;
pub(crate) mod lookup;
mod relationship;
mod result;
mod sampler;
mod stage;
mod synthesizer;

pub use engine::{AnalysisRequest, KnowledgeEngine, decode_text};
pub use entity::{
    EntityKind, MAX_NODE_SIZE, MIN_NODE_SIZE, NEUTRAL_GRAY, Node, cluster_color, slugify,
    type_color,
};
pub use extractor::{EntityExtractor, ExtractionResult, is_stopword, split_sentences};
pub use frequency::{TermFrequency, count_occurrences, top_concepts};
pub use insights::{ClusterScheme, InsightGenerator};
pub use lookup::{EnrichmentSettings, EntityLookup, KnowledgeGraphClient, LookupEntity, enrich};
pub use relationship::{CLUSTER_WEIGHT, COOCCURRENCE_WEIGHT, Edge, RelationshipType};
pub use result::{AnalysisMetadata, AnalysisResult, AnalysisSource, Cluster, Graph, Insights};
pub use sampler::{EdgeSampler, FixedEdgeSampler, RandomEdgeSampler};
pub use stage::{AnalysisStage, StageTracker};
pub use synthesizer::{CONCEPT_TYPE, ENTITY_TYPE, GraphSynthesizer, MAX_FALLBACK_NODES, infer_edges};

//! Graph synthesis from entity candidates
//!
//! Two ways in, one edge rule:
//!
//! - [`GraphSynthesizer::build_graph`] turns lookup-service entities into
//!   typed nodes (colour and cluster from the declared type).
//! - [`GraphSynthesizer::build_fallback_graph`] mixes extracted entities with
//!   word-frequency concepts when no lookup data is available.
//!
//! Both then call [`infer_edges`]: a pair is linked when the two labels share
//! a sentence, or when they share a cluster and the sampler lets the edge
//! through.

use std::collections::HashSet;

use tracing::debug;

use super::entity::{EntityKind, Node, cluster_color, slugify, type_color};
use super::extractor::{ExtractionResult, split_sentences};
use super::frequency::{count_occurrences, top_concepts};
use super::lookup::LookupEntity;
use super::relationship::{CLUSTER_WEIGHT, COOCCURRENCE_WEIGHT, Edge, RelationshipType};
use super::result::Graph;
use super::sampler::EdgeSampler;

/// Extracted entities admitted into a fallback graph
const MAX_FALLBACK_ENTITIES: usize = 8;

/// Frequency concepts admitted into a fallback graph
const MAX_FALLBACK_CONCEPTS: usize = 7;

/// Frequency concepts ranked before selection
const FREQUENCY_POOL: usize = 10;

/// Upper bound on fallback graph nodes
pub const MAX_FALLBACK_NODES: usize = 12;

/// Cap on the score-derived part of an enriched node's size
const MAX_SCORE_SIZE: f64 = 20.0;

/// Cap on a fallback node's size
const MAX_FREQUENCY_SIZE: f64 = 20.0;

/// Base size added to every node
const BASE_SIZE: f64 = 5.0;

/// Frequency concepts are grouped into cluster bands of this width
const CONCEPT_BAND: usize = 4;

/// Node type for extractor-derived fallback nodes
pub const ENTITY_TYPE: &str = "Entity";

/// Node type for frequency-derived fallback nodes
pub const CONCEPT_TYPE: &str = "Concept";

/// Builds node/edge graphs from candidates
#[derive(Debug, Clone, Default)]
pub struct GraphSynthesizer;

impl GraphSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Build a graph from lookup-service entities
    pub fn build_graph(
        &self,
        entities: &[LookupEntity],
        text: &str,
        sampler: &mut dyn EdgeSampler,
    ) -> Graph {
        let mut seen = HashSet::new();
        let nodes: Vec<Node> = entities
            .iter()
            .filter(|entity| seen.insert(entity.id.clone()))
            .map(enriched_node)
            .collect();

        let edges = infer_edges(&nodes, text, sampler);
        debug!(nodes = nodes.len(), edges = edges.len(), "Built enriched graph");

        Graph { nodes, edges }
    }

    /// Build a graph from extracted entities and word-frequency concepts
    pub fn build_fallback_graph(
        &self,
        text: &str,
        extracted: &ExtractionResult,
        sampler: &mut dyn EdgeSampler,
    ) -> Graph {
        let mut seen = HashSet::new();
        let mut candidates: Vec<Candidate> = Vec::new();

        for label in extracted.iter().take(MAX_FALLBACK_ENTITIES) {
            let id = slugify(label);
            if seen.insert(id.clone()) {
                candidates.push(Candidate {
                    id,
                    label: label.to_string(),
                    frequency: count_occurrences(text, label).max(1),
                    cluster: 0,
                    node_type: ENTITY_TYPE,
                });
            }
        }

        let concepts = top_concepts(text, FREQUENCY_POOL);
        for (index, concept) in concepts.into_iter().take(MAX_FALLBACK_CONCEPTS).enumerate() {
            let id = slugify(&concept.term);
            if seen.insert(id.clone()) {
                candidates.push(Candidate {
                    id,
                    label: concept.term,
                    frequency: concept.count,
                    cluster: (index / CONCEPT_BAND) as u32 + 1,
                    node_type: CONCEPT_TYPE,
                });
            }
        }

        candidates.truncate(MAX_FALLBACK_NODES);

        let max_frequency = candidates.iter().map(|c| c.frequency).max().unwrap_or(1).max(1);
        let nodes: Vec<Node> = candidates
            .into_iter()
            .map(|c| {
                let size = (c.frequency as f64 * 3.0 + BASE_SIZE).min(MAX_FREQUENCY_SIZE);
                Node::new(c.id, c.label)
                    .with_size(size)
                    .with_color(cluster_color(c.cluster))
                    .with_cluster(c.cluster)
                    .with_type(c.node_type)
                    .with_score(c.frequency as f64 / max_frequency as f64)
            })
            .collect();

        let edges = infer_edges(&nodes, text, sampler);
        debug!(nodes = nodes.len(), edges = edges.len(), "Built fallback graph");

        Graph { nodes, edges }
    }
}

/// A fallback node before sizing
struct Candidate {
    id: String,
    label: String,
    frequency: usize,
    cluster: u32,
    node_type: &'static str,
}

fn enriched_node(entity: &LookupEntity) -> Node {
    let primary_type = entity.primary_type();
    let kind = EntityKind::classify(primary_type);
    let size = (entity.score.max(0.0) * 2.0).min(MAX_SCORE_SIZE) + BASE_SIZE;

    let mut node = Node::new(entity.id.clone(), entity.name.clone())
        .with_size(size)
        .with_color(type_color(primary_type))
        .with_cluster(kind.cluster())
        .with_type(primary_type)
        .with_score(entity.score);

    if let Some(description) = &entity.description {
        node = node.with_description(description.clone());
    }
    node
}

/// Infer edges between every unordered pair of nodes.
///
/// Sentence co-occurrence always yields an edge (weight 0.8). A shared
/// cluster alone yields an edge (weight 0.4) only when the sampler agrees.
/// The label is "related" whenever the clusters match, "co-occurs" otherwise.
pub fn infer_edges(nodes: &[Node], text: &str, sampler: &mut dyn EdgeSampler) -> Vec<Edge> {
    let sentences: Vec<String> = split_sentences(text).map(str::to_lowercase).collect();
    let labels: Vec<String> = nodes.iter().map(|n| n.label.to_lowercase()).collect();

    let mut edges = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (a, b) = (&nodes[i], &nodes[j]);
            if a.id == b.id {
                continue;
            }

            let co_occurs = sentences
                .iter()
                .any(|s| s.contains(&labels[i]) && s.contains(&labels[j]));
            let same_cluster = a.cluster == b.cluster;

            if !(co_occurs || (same_cluster && sampler.keep_cluster_edge())) {
                continue;
            }

            let weight = if co_occurs {
                COOCCURRENCE_WEIGHT
            } else {
                CLUSTER_WEIGHT
            };
            let relationship = if same_cluster {
                RelationshipType::Related
            } else {
                RelationshipType::CoOccurs
            };

            edges.push(Edge::new(a.id.clone(), b.id.clone(), relationship).with_weight(weight));
        }
    }
    edges
}

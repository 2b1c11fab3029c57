//! Output types of one analysis call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Node;
use super::relationship::Edge;

/// Nodes and edges of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find the edge joining two nodes, in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }

    /// Number of distinct cluster ids in use
    pub fn cluster_count(&self) -> usize {
        let mut clusters: Vec<u32> = self.nodes.iter().map(|n| n.cluster).collect();
        clusters.sort_unstable();
        clusters.dedup();
        clusters.len()
    }
}

/// A named bucket of node labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u32,
    pub label: String,
    pub concepts: Vec<String>,
}

/// Human-readable findings derived from the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub gaps: Vec<String>,
    pub questions: Vec<String>,
    pub clusters: Vec<Cluster>,
}

/// Where the graph came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisSource {
    /// Built from lookup-service entities
    Enriched,
    /// Built locally because enrichment is not configured
    Fallback,
    /// Built locally because enrichment failed or found nothing
    DegradedFallback,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enriched => "enriched",
            Self::Fallback => "fallback",
            Self::DegradedFallback => "degraded-fallback",
        }
    }

    /// True for both local paths
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Enriched)
    }
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// Always equal to the number of graph nodes
    pub entity_count: usize,
    pub timestamp: DateTime<Utc>,
    pub source: AnalysisSource,
}

/// Complete result of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub graph: Graph,
    pub insights: Insights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Assemble a result, deriving the metadata from the graph
    pub fn new(graph: Graph, insights: Insights, source: AnalysisSource) -> Self {
        let summary = Some(summarize(&graph));
        Self {
            metadata: AnalysisMetadata {
                entity_count: graph.nodes.len(),
                timestamp: Utc::now(),
                source,
            },
            graph,
            insights,
            summary,
        }
    }

    pub fn source(&self) -> AnalysisSource {
        self.metadata.source
    }
}

fn summarize(graph: &Graph) -> String {
    if graph.is_empty() {
        return "No concepts were identified in the text.".to_string();
    }
    format!(
        "Identified {} concepts connected by {} relationships across {} clusters.",
        graph.nodes.len(),
        graph.edges.len(),
        graph.cluster_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::relationship::RelationshipType;

    fn sample_graph() -> Graph {
        Graph {
            nodes: vec![
                Node::new("a", "A").with_cluster(0),
                Node::new("b", "B").with_cluster(0),
                Node::new("c", "C").with_cluster(2),
            ],
            edges: vec![Edge::new("a", "b", RelationshipType::Related)],
        }
    }

    #[test]
    fn test_metadata_tracks_node_count() {
        let result = AnalysisResult::new(sample_graph(), Insights::default(), AnalysisSource::Fallback);
        assert_eq!(result.metadata.entity_count, 3);
        assert_eq!(result.source(), AnalysisSource::Fallback);
        assert_eq!(
            result.summary.as_deref(),
            Some("Identified 3 concepts connected by 1 relationships across 2 clusters.")
        );
    }

    #[test]
    fn test_empty_graph_summary() {
        let result = AnalysisResult::new(Graph::default(), Insights::default(), AnalysisSource::Fallback);
        assert_eq!(result.metadata.entity_count, 0);
        assert!(result.summary.unwrap().contains("No concepts"));
    }

    #[test]
    fn test_graph_lookups() {
        let graph = sample_graph();
        assert_eq!(graph.node("c").map(|n| n.label.as_str()), Some("C"));
        assert!(graph.node("z").is_none());
        assert!(graph.edge_between("b", "a").is_some());
        assert!(graph.edge_between("a", "c").is_none());
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_value(AnalysisSource::DegradedFallback).unwrap();
        assert_eq!(json, "degraded-fallback");
        assert!(AnalysisSource::DegradedFallback.is_fallback());
        assert!(!AnalysisSource::Enriched.is_fallback());
    }

    #[test]
    fn test_metadata_uses_camel_case() {
        let result = AnalysisResult::new(sample_graph(), Insights::default(), AnalysisSource::Enriched);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["entityCount"], 3);
        assert_eq!(json["metadata"]["source"], "enriched");
        assert!(json["graph"]["nodes"].is_array());
    }
}

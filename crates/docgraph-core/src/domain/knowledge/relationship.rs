//! Graph edges for the knowledge extraction engine
//!
//! Edges reference nodes by id. They are undirected in meaning even though
//! they are stored as an ordered (source, target) pair.

use serde::{Deserialize, Serialize};

/// Weight of an edge backed by sentence co-occurrence
pub const COOCCURRENCE_WEIGHT: f64 = 0.8;

/// Weight of an edge backed only by a shared cluster
pub const CLUSTER_WEIGHT: f64 = 0.4;

/// An inferred relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Id of the source node
    pub source: String,
    /// Id of the target node
    pub target: String,
    /// Strength of the relationship (0.0 to 1.0)
    pub weight: f64,
    /// Kind of relationship
    pub relationship: RelationshipType,
}

impl Edge {
    /// Create a new edge between two nodes
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: RelationshipType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: CLUSTER_WEIGHT,
            relationship,
        }
    }

    /// Set the weight (clamped to 0.0-1.0)
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Check whether the edge joins `a` and `b` in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Types of relationships between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Both nodes share a cluster
    #[serde(rename = "related")]
    Related,
    /// Both nodes appear in the same sentence
    #[serde(rename = "co-occurs")]
    CoOccurs,
}

impl RelationshipType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::CoOccurs => "co-occurs",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

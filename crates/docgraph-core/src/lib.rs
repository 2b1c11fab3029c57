//! Docgraph Core Library
//!
//! This crate turns free text into a knowledge graph, including:
//! - Entity candidate extraction (capitalized words, phrases, acronyms)
//! - Optional enrichment through the Knowledge Graph Search API
//! - Graph synthesis with co-occurrence and cluster edges
//! - Local fallback analysis from word frequencies
//! - Insight generation (follow-up questions, gaps, clusters)
//! - Layered TOML configuration

pub mod config;
pub mod domain;
pub mod error;

pub use domain::knowledge::{AnalysisRequest, AnalysisResult, AnalysisSource, KnowledgeEngine};
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::knowledge::{
        AnalysisResult, AnalysisSource, Edge, EntityLookup, Graph, Insights, KnowledgeEngine,
        LookupEntity, Node,
    };
    pub use crate::error::{Error, Result};
}

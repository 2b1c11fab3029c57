//! Per-call analysis stages
//!
//! ```text
//! Idle → Extracting ─┬→ Enriching ─┬→ Synthesizing ──────────┬→ GeneratingInsights → Done
//!                    │             └→ SynthesizingFallback ──┤
//!                    └───────────────→ SynthesizingFallback ─┘
//! ```
//!
//! A failure while enriching moves to the fallback branch, never to an
//! error state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Stage of one analysis call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Idle,
    Extracting,
    Enriching,
    Synthesizing,
    SynthesizingFallback,
    GeneratingInsights,
    Done,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Enriching => "enriching",
            Self::Synthesizing => "synthesizing",
            Self::SynthesizingFallback => "synthesizing_fallback",
            Self::GeneratingInsights => "generating_insights",
            Self::Done => "done",
        }
    }

    /// Check whether `next` may follow this stage
    pub fn can_transition_to(&self, next: AnalysisStage) -> bool {
        use AnalysisStage::*;
        matches!(
            (self, next),
            (Idle, Extracting)
                | (Extracting, Enriching)
                | (Extracting, SynthesizingFallback)
                | (Enriching, Synthesizing)
                | (Enriching, SynthesizingFallback)
                | (Synthesizing, GeneratingInsights)
                | (SynthesizingFallback, GeneratingInsights)
                | (GeneratingInsights, Done)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Records the stages one call passes through
#[derive(Debug, Clone)]
pub struct StageTracker {
    history: Vec<AnalysisStage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            history: vec![AnalysisStage::Idle],
        }
    }

    pub fn current(&self) -> AnalysisStage {
        self.history.last().copied().unwrap_or(AnalysisStage::Idle)
    }

    /// Move to `next`. Returns false (and logs) on an illegal transition.
    pub fn advance(&mut self, next: AnalysisStage) -> bool {
        let current = self.current();
        if !current.can_transition_to(next) {
            warn!(from = %current, to = %next, "Illegal analysis stage transition");
            return false;
        }
        debug!(from = %current, to = %next, "Analysis stage transition");
        self.history.push(next);
        true
    }

    pub fn history(&self) -> &[AnalysisStage] {
        &self.history
    }

    /// True when the call went through the fallback branch
    pub fn used_fallback(&self) -> bool {
        self.history.contains(&AnalysisStage::SynthesizingFallback)
    }
}

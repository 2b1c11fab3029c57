//! Random decisions for edge sparsification
//!
//! Pairs of nodes that share a cluster but never co-occur are linked only
//! some of the time, so a large cluster does not collapse into a complete
//! graph. The decision is made through [`EdgeSampler`] so callers can seed it
//! or replace it with a fixed answer.

use rand::prelude::*;

/// Decides whether a cluster-only edge is kept
pub trait EdgeSampler: Send {
    /// Return true to keep the candidate edge
    fn keep_cluster_edge(&mut self) -> bool;
}

/// Keeps an edge when a uniform draw in [0, 1) exceeds the threshold
#[derive(Debug)]
pub struct RandomEdgeSampler {
    threshold: f64,
    rng: StdRng,
}

impl RandomEdgeSampler {
    /// Create a sampler seeded from the OS
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a sampler with a fixed seed (for reproducible graphs)
    pub fn with_seed(threshold: f64, seed: u64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise
    pub fn from_options(threshold: f64, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(threshold, seed),
            None => Self::new(threshold),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl EdgeSampler for RandomEdgeSampler {
    fn keep_cluster_edge(&mut self) -> bool {
        self.rng.gen_range(0.0..1.0) > self.threshold
    }
}

/// Always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedEdgeSampler(pub bool);

impl FixedEdgeSampler {
    /// Keep every cluster-only edge
    pub fn always() -> Self {
        Self(true)
    }

    /// Drop every cluster-only edge
    pub fn never() -> Self {
        Self(false)
    }
}

impl EdgeSampler for FixedEdgeSampler {
    fn keep_cluster_edge(&mut self) -> bool {
        self.0
    }
}

//! Solver configuration.
//!
//! The user-adjustable knobs of the grooming pipeline. Convergence
//! threshold and iteration cap are fixed engine constants and live in
//! `strand_types::constants`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strand_types::constants::DEFAULT_ROOT_OFFSET;
use strand_types::{StrandError, StrandResult};

/// Configuration for collision classification and the parallel solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads for the per-guide parallel solve.
    pub thread_count: usize,

    /// Distance the root is nudged along its normal before the first
    /// collision segment is cast.
    pub root_offset: f64,

    /// Whether brush steps run the collision pass and the
    /// interpenetration constraints.
    pub detect_collisions: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            thread_count: default_thread_count(),
            root_offset: DEFAULT_ROOT_OFFSET,
            detect_collisions: true,
        }
    }
}

impl SolverConfig {
    /// Solves every guide on the calling thread.
    pub fn single_threaded() -> Self {
        Self {
            thread_count: 1,
            ..Default::default()
        }
    }

    /// Length constraints only; no collision pass.
    pub fn without_collisions() -> Self {
        Self {
            detect_collisions: false,
            ..Default::default()
        }
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> StrandResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| StrandError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> StrandResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Rejects zero threads and negative or non-finite root offsets.
    pub fn validate(&self) -> StrandResult<()> {
        if self.thread_count == 0 {
            return Err(StrandError::InvalidConfig(
                "thread_count must be at least 1".into(),
            ));
        }
        if !self.root_offset.is_finite() || self.root_offset < 0.0 {
            return Err(StrandError::InvalidConfig(format!(
                "root_offset must be finite and non-negative (got {})",
                self.root_offset
            )));
        }
        Ok(())
    }
}

/// Available parallelism minus one (leaving a core for the interactive
/// session), at least one.
pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

//! Validation of simulation inputs
//!
//! Sizes are unsigned, so negative values and non-integers are rejected
//! while decoding. This module enforces what decoding cannot: entry-count
//! limits and totals that stay representable.

use crate::core::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Upper bounds on a single workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_blocks: usize,
    pub max_processes: usize,
}

impl Limits {
    pub const DEFAULT_MAX_ENTRIES: usize = 1024;

    /// No practical limit on entry counts
    pub fn unbounded() -> Self {
        Limits {
            max_blocks: usize::MAX,
            max_processes: usize::MAX,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_blocks: Self::DEFAULT_MAX_ENTRIES,
            max_processes: Self::DEFAULT_MAX_ENTRIES,
        }
    }
}

/// A validated set of blocks and processes
///
/// Once constructed, summing either list cannot overflow, so every
/// statistic derived from it is well defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    blocks: Vec<u64>,
    processes: Vec<u64>,
    total_memory: u64,
}

impl Workload {
    /// Validate and wrap a workload
    ///
    /// # Errors
    ///
    /// - `TooManyEntries` if either list exceeds `limits`
    /// - `SizeOverflow` if either list's total does not fit in a `u64`
    pub fn new(blocks: Vec<u64>, processes: Vec<u64>, limits: &Limits) -> Result<Self> {
        check_count("blocks", blocks.len(), limits.max_blocks)?;
        check_count("processes", processes.len(), limits.max_processes)?;

        let total_memory = checked_total("block", &blocks)?;
        checked_total("process", &processes)?;

        Ok(Workload {
            blocks,
            processes,
            total_memory,
        })
    }

    /// Original block sizes
    pub fn blocks(&self) -> &[u64] {
        &self.blocks
    }

    pub fn processes(&self) -> &[u64] {
        &self.processes
    }

    /// Sum of the original block sizes
    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }
}

fn check_count(what: &'static str, count: usize, max: usize) -> Result<()> {
    if count > max {
        return Err(SimError::TooManyEntries { what, count, max });
    }
    Ok(())
}

fn checked_total(what: &'static str, sizes: &[u64]) -> Result<u64> {
    sizes
        .iter()
        .try_fold(0u64, |acc, &size| acc.checked_add(size))
        .ok_or(SimError::SizeOverflow { what })
}

/// Parse a comma-separated size list such as `"100, 500,200"`
///
/// Entries are trimmed; blank input yields an empty list.
///
/// # Errors
///
/// Returns `InvalidSize` naming the first entry (1-based) that is not a
/// non-negative integer.
pub fn parse_size_list(input: &str) -> Result<Vec<u64>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .enumerate()
        .map(|(i, raw)| {
            let entry = raw.trim();
            entry.parse::<u64>().map_err(|_| SimError::InvalidSize {
                position: i + 1,
                value: entry.to_string(),
            })
        })
        .collect()
}

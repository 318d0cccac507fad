//! Human-readable views of an allocation
//!
//! - Per-process assignment lines (the API's `allocation` field)
//! - Internal fragmentation of the blocks that were used
//! - A per-block memory map
//! - [`StrategyReport`], the console rendering of all of the above

use crate::core::allocator::{Allocation, Strategy};
use crate::core::error::{Result, SimError};
use serde::Serialize;
use std::fmt;

/// Format one line per process, in process order
///
/// Process and block numbers are 1-based:
/// `Process 1 (212 KB) -> Block 2` or `Process 4 (426 KB) -> Not Allocated`.
///
/// # Errors
///
/// Returns `MismatchedAllocation` if the allocation was computed for a
/// different number of processes.
pub fn format_allocation(processes: &[u64], allocation: &Allocation) -> Result<Vec<String>> {
    if allocation.assignments.len() != processes.len() {
        return Err(SimError::MismatchedAllocation {
            expected: processes.len(),
            got: allocation.assignments.len(),
        });
    }

    Ok(processes
        .iter()
        .zip(&allocation.assignments)
        .enumerate()
        .map(|(i, (size, slot))| match slot {
            Some(block) => format!("Process {} ({} KB) -> Block {}", i + 1, size, block + 1),
            None => format!("Process {} ({} KB) -> Not Allocated", i + 1, size),
        })
        .collect())
}

/// Free space left inside blocks that received at least one process
///
/// Blocks that were never touched are not counted.
pub fn internal_fragmentation(original: &[u64], remaining: &[u64]) -> u64 {
    original
        .iter()
        .zip(remaining)
        .filter(|(orig, rem)| orig != rem)
        .map(|(_, &rem)| rem)
        .sum()
}

/// Usage of a single block after allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockUsage {
    /// 1-based block number
    pub block: usize,
    pub original: u64,
    pub remaining: u64,
}

impl BlockUsage {
    pub fn used(&self) -> u64 {
        self.original.saturating_sub(self.remaining)
    }

    pub fn is_touched(&self) -> bool {
        self.remaining < self.original
    }
}

impl fmt::Display for BlockUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_touched() {
            write!(
                f,
                "| Block {} | Used: {} KB | Free: {} KB |",
                self.block,
                self.used(),
                self.remaining
            )
        } else {
            write!(f, "| Block {} | Free: {} KB |", self.block, self.original)
        }
    }
}

/// Build the per-block memory map
pub fn memory_map(original: &[u64], remaining: &[u64]) -> Vec<BlockUsage> {
    original
        .iter()
        .zip(remaining)
        .enumerate()
        .map(|(i, (&original, &remaining))| BlockUsage {
            block: i + 1,
            original,
            remaining,
        })
        .collect()
}

const MAP_HEADER: &str = "---------------- MEMORY MAP (ASCII) ----------------";
const MAP_FOOTER: &str = "----------------------------------------------------";

/// Console report for a single strategy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub lines: Vec<String>,
    pub internal_fragmentation: u64,
    pub memory_map: Vec<BlockUsage>,
}

impl StrategyReport {
    /// Build the report from the original blocks and a finished allocation
    pub fn new(
        strategy: Strategy,
        original: &[u64],
        processes: &[u64],
        allocation: &Allocation,
    ) -> Result<Self> {
        Ok(StrategyReport {
            strategy,
            lines: format_allocation(processes, allocation)?,
            internal_fragmentation: internal_fragmentation(original, &allocation.remaining),
            memory_map: memory_map(original, &allocation.remaining),
        })
    }
}

impl fmt::Display for StrategyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.strategy.name().to_uppercase();

        writeln!(f, ">>> {} <<<", title)?;
        writeln!(f)?;
        writeln!(f, "PROCESS ALLOCATION ({})", title)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "Internal Fragmentation = {} KB", self.internal_fragmentation)?;
        writeln!(f)?;
        writeln!(f, "{}", MAP_HEADER)?;
        for usage in &self.memory_map {
            writeln!(f, "{}", usage)?;
        }
        write!(f, "{}", MAP_FOOTER)
    }
}

//! Contiguous partition placement strategies
//!
//! Every strategy walks the processes once, in order, and places each one
//! into a single block chosen by its [`PlacementPolicy`]:
//! - First fit: the lowest-indexed block that is large enough
//! - Best fit: the smallest block that is large enough
//! - Worst fit: the largest block that is large enough
//!
//! Ties between equally sized blocks always go to the lowest index.

pub mod best_fit;
pub mod first_fit;
pub mod worst_fit;

use crate::core::error::SimError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub use best_fit::BestFit;
pub use first_fit::FirstFit;
pub use worst_fit::WorstFit;

/// Block selection policy
///
/// Given the current remaining block sizes and a request, pick the index of
/// the block that should receive it. Implementations must only return
/// indices whose block can hold the request.
pub trait PlacementPolicy {
    /// Select a block for `request`, or `None` if nothing fits
    fn select(&self, blocks: &[u64], request: u64) -> Option<usize>;
}

/// Outcome of running a strategy over one workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Block index assigned to each process (`None` = not allocated)
    pub assignments: Vec<Option<usize>>,

    /// Block sizes left after every placement
    pub remaining: Vec<u64>,
}

impl Allocation {
    /// Number of processes that received a block
    pub fn allocated_count(&self) -> usize {
        self.assignments.iter().filter(|slot| slot.is_some()).count()
    }

    /// Total size of the processes that received a block
    ///
    /// Saturates at `u64::MAX`; a validated [`Workload`](crate::Workload)
    /// never gets there.
    pub fn allocated_memory(&self, processes: &[u64]) -> u64 {
        self.assignments
            .iter()
            .zip(processes)
            .filter(|(slot, _)| slot.is_some())
            .fold(0u64, |total, (_, &size)| total.saturating_add(size))
    }

    /// Free memory still left across all blocks, saturating at `u64::MAX`
    pub fn wasted_memory(&self) -> u64 {
        self.remaining
            .iter()
            .fold(0u64, |total, &size| total.saturating_add(size))
    }
}

/// Place every process using `policy`
///
/// Takes ownership of `blocks`: the caller hands over its own copy, and the
/// mutated sizes come back as [`Allocation::remaining`].
pub fn allocate<P: PlacementPolicy + ?Sized>(
    policy: &P,
    mut blocks: Vec<u64>,
    processes: &[u64],
) -> Allocation {
    let mut assignments = Vec::with_capacity(processes.len());

    for &request in processes {
        let slot = policy.select(&blocks, request);
        if let Some(idx) = slot {
            debug_assert!(blocks[idx] >= request);
            blocks[idx] -= request;
        }
        assignments.push(slot);
    }

    Allocation {
        assignments,
        remaining: blocks,
    }
}

/// The three classic placement strategies
///
/// Serializes as its display name (`"First Fit"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl Strategy {
    /// Evaluation order used by comparisons (earlier wins ties)
    pub const ALL: [Strategy; 3] = [Strategy::FirstFit, Strategy::BestFit, Strategy::WorstFit];

    /// Display name, as used in API responses
    pub fn name(self) -> &'static str {
        match self {
            Strategy::FirstFit => "First Fit",
            Strategy::BestFit => "Best Fit",
            Strategy::WorstFit => "Worst Fit",
        }
    }

    /// HTTP route serving this strategy
    pub fn route(self) -> &'static str {
        match self {
            Strategy::FirstFit => "/firstfit",
            Strategy::BestFit => "/bestfit",
            Strategy::WorstFit => "/worstfit",
        }
    }

    /// Look up the strategy served at `path`
    pub fn from_route(path: &str) -> Option<Strategy> {
        Strategy::ALL.into_iter().find(|s| s.route() == path)
    }

    fn policy(self) -> &'static dyn PlacementPolicy {
        match self {
            Strategy::FirstFit => &FirstFit,
            Strategy::BestFit => &BestFit,
            Strategy::WorstFit => &WorstFit,
        }
    }

    /// Run this strategy on an owned copy of the blocks
    pub fn run(self, blocks: Vec<u64>, processes: &[u64]) -> Allocation {
        let block_count = blocks.len();
        let allocation = allocate(self.policy(), blocks, processes);

        debug!(
            strategy = self.name(),
            blocks = block_count,
            processes = processes.len(),
            allocated = allocation.allocated_count(),
            "allocation finished"
        );

        allocation
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "first" | "firstfit" => Ok(Strategy::FirstFit),
            "best" | "bestfit" => Ok(Strategy::BestFit),
            "worst" | "worstfit" => Ok(Strategy::WorstFit),
            _ => Err(SimError::UnknownStrategy(s.to_string())),
        }
    }
}

//! Side-by-side comparison of the placement strategies
//!
//! Each strategy runs against its own copy of the original blocks. The
//! winner is the strategy with the highest memory utilization; ties go to
//! the earliest strategy in [`Strategy::ALL`].

use crate::core::allocator::{Allocation, Strategy};
use crate::core::validation::Workload;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::info;

/// Label reported with every comparison
pub const COMPARISON_TYPE: &str = "Memory Utilization Based";

/// Per-strategy allocation statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyStats {
    pub allocated_processes: usize,
    pub allocated_memory: u64,
    pub wasted_memory: u64,
    pub utilization_percent: f64,
}

impl StrategyStats {
    /// Derive stats for one allocation
    ///
    /// `total_memory` is the sum of the original block sizes.
    pub fn compute(total_memory: u64, processes: &[u64], allocation: &Allocation) -> Self {
        let allocated_memory = allocation.allocated_memory(processes);

        StrategyStats {
            allocated_processes: allocation.allocated_count(),
            allocated_memory,
            wasted_memory: allocation.wasted_memory(),
            utilization_percent: utilization_percent(allocated_memory, total_memory),
        }
    }
}

/// Allocated share of total memory, as a percentage rounded to 2 decimals
///
/// Halves round to even (`3.125` becomes `3.12`). Zero total memory yields 0.
pub fn utilization_percent(allocated: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = allocated as f64 / total as f64 * 100.0;
    round_hundredths(percent)
}

/// Round to 2 decimals, half to even, judged on the exact value of `value`
fn round_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = if scaled - scaled.floor() == 0.5 {
        // Only a true half if the scaling was exact
        match value.mul_add(100.0, -scaled).partial_cmp(&0.0) {
            Some(Ordering::Greater) => scaled.ceil(),
            Some(Ordering::Less) => scaled.floor(),
            _ => scaled.round_ties_even(),
        }
    } else {
        scaled.round()
    };
    rounded / 100.0
}

/// First strategy with the strictly greatest utilization
pub fn select_best<I>(candidates: I) -> Option<Strategy>
where
    I: IntoIterator<Item = (Strategy, f64)>,
{
    let mut best: Option<(Strategy, f64)> = None;
    for (strategy, utilization) in candidates {
        match best {
            Some((_, current)) if utilization <= current => {}
            _ => best = Some((strategy, utilization)),
        }
    }
    best.map(|(strategy, _)| strategy)
}

/// Result of running every strategy on one workload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub comparison_type: &'static str,
    pub total_memory: u64,
    #[serde(rename = "First Fit")]
    pub first_fit: StrategyStats,
    #[serde(rename = "Best Fit")]
    pub best_fit: StrategyStats,
    #[serde(rename = "Worst Fit")]
    pub worst_fit: StrategyStats,
    pub best_algorithm: Strategy,
}

impl Comparison {
    /// Stats recorded for `strategy`
    pub fn stats(&self, strategy: Strategy) -> &StrategyStats {
        match strategy {
            Strategy::FirstFit => &self.first_fit,
            Strategy::BestFit => &self.best_fit,
            Strategy::WorstFit => &self.worst_fit,
        }
    }

    /// Stats of the winning strategy
    pub fn best(&self) -> &StrategyStats {
        self.stats(self.best_algorithm)
    }
}

/// Run all strategies and report each alongside the comparison
///
/// The allocations are returned in [`Strategy::ALL`] order so callers can
/// render them without re-running anything.
pub fn compare_with_allocations(
    workload: &Workload,
) -> (Comparison, Vec<(Strategy, Allocation)>) {
    let total_memory = workload.total_memory();
    let processes = workload.processes();

    let runs: [(Strategy, Allocation); 3] = Strategy::ALL
        .map(|strategy| (strategy, strategy.run(workload.blocks().to_vec(), processes)));

    let stats_of = |idx: usize| StrategyStats::compute(total_memory, processes, &runs[idx].1);
    let first_fit = stats_of(0);
    let best_fit = stats_of(1);
    let worst_fit = stats_of(2);

    let best_algorithm = select_best([
        (Strategy::FirstFit, first_fit.utilization_percent),
        (Strategy::BestFit, best_fit.utilization_percent),
        (Strategy::WorstFit, worst_fit.utilization_percent),
    ])
    .unwrap_or(Strategy::FirstFit);

    info!(total_memory, best = best_algorithm.name(), "comparison finished");

    let comparison = Comparison {
        comparison_type: COMPARISON_TYPE,
        total_memory,
        first_fit,
        best_fit,
        worst_fit,
        best_algorithm,
    };

    (comparison, Vec::from(runs))
}

/// Run all strategies and compare their utilization
pub fn compare(workload: &Workload) -> Comparison {
    compare_with_allocations(workload).0
}

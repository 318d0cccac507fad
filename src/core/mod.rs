//! Allocation simulation core
//!
//! Pure, request-scoped computation: nothing here performs I/O or keeps
//! state between calls.

pub mod allocator;
pub mod compare;
pub mod error;
pub mod report;
pub mod validation;

pub use allocator::{allocate, Allocation, PlacementPolicy, Strategy};
pub use compare::{compare, compare_with_allocations, Comparison, StrategyStats};
pub use error::{Result, SimError};
pub use report::{
    format_allocation, internal_fragmentation, memory_map, BlockUsage, StrategyReport,
};
pub use validation::{parse_size_list, Limits, Workload};

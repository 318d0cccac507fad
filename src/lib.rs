//! # memfit - Contiguous Memory Allocation Simulator
//!
//! `memfit` simulates the classic partition placement strategies from
//! operating-systems coursework and exposes them over a small JSON API:
//!
//! - **First fit**: first block large enough
//! - **Best fit**: smallest block large enough
//! - **Worst fit**: largest block large enough
//! - **Comparison**: all three side by side, ranked by memory utilization
//!
//! ## Quick Start
//!
//! ```rust
//! use memfit::{compare, Limits, Strategy, Workload};
//!
//! # fn main() -> memfit::Result<()> {
//! let workload = Workload::new(
//!     vec![100, 500, 200, 300, 600],
//!     vec![212, 417, 112, 426],
//!     &Limits::default(),
//! )?;
//!
//! // Strategies consume their own copy of the blocks
//! let allocation = Strategy::BestFit.run(workload.blocks().to_vec(), workload.processes());
//! assert_eq!(allocation.remaining, vec![100, 83, 88, 88, 174]);
//!
//! let comparison = compare(&workload);
//! assert_eq!(comparison.best_algorithm, Strategy::BestFit);
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving the API
//!
//! ```rust,no_run
//! use memfit::api::{serve, AppState};
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:10000").await?;
//! serve(listener, Arc::new(AppState::default()), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await
//! # }
//! ```

pub mod api;
pub mod config;
pub mod core;

pub use crate::config::AppConfig;
pub use crate::core::{
    allocator::{allocate, Allocation, PlacementPolicy, Strategy},
    compare::{compare, compare_with_allocations, Comparison, StrategyStats},
    error::{Result, SimError},
    report::{format_allocation, BlockUsage, StrategyReport},
    validation::{parse_size_list, Limits, Workload},
};

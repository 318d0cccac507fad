//! Request decoding and response documents for the simulation endpoints

use crate::api::error::ApiResult;
use crate::core::allocator::Strategy;
use crate::core::compare::{compare, Comparison};
use crate::core::report::format_allocation;
use crate::core::validation::{Limits, Workload};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body accepted by every simulation endpoint
///
/// Unknown fields are ignored. Sizes must be non-negative integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub blocks: Vec<u64>,
    pub processes: Vec<u64>,
}

/// Response of `/firstfit`, `/bestfit` and `/worstfit`
#[derive(Debug, Clone, Serialize)]
pub struct AllocationResponse {
    pub algorithm: Strategy,
    pub allocation: Vec<String>,
    pub remaining_blocks: Vec<u64>,
}

/// Liveness document served at `/health`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        StatusResponse {
            status: "ok",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Decode and validate a request body
pub fn parse_workload(body: &[u8], limits: &Limits) -> ApiResult<Workload> {
    let request: AllocationRequest = serde_json::from_slice(body)?;
    debug!(
        blocks = request.blocks.len(),
        processes = request.processes.len(),
        "decoded allocation request"
    );
    Ok(Workload::new(request.blocks, request.processes, limits)?)
}

/// Run one strategy and format its outcome
pub fn run_strategy(strategy: Strategy, workload: &Workload) -> ApiResult<AllocationResponse> {
    let allocation = strategy.run(workload.blocks().to_vec(), workload.processes());
    let lines = format_allocation(workload.processes(), &allocation)?;

    Ok(AllocationResponse {
        algorithm: strategy,
        allocation: lines,
        remaining_blocks: allocation.remaining,
    })
}

/// Body-level entry point used by the router
pub fn simulate(
    strategy: Strategy,
    body: &[u8],
    limits: &Limits,
) -> ApiResult<AllocationResponse> {
    let workload = parse_workload(body, limits)?;
    run_strategy(strategy, &workload)
}

/// Body-level entry point for `/compare`
pub fn compare_body(body: &[u8], limits: &Limits) -> ApiResult<Comparison> {
    let workload = parse_workload(body, limits)?;
    Ok(compare(&workload))
}

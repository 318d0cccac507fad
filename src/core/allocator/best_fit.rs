//! Best-fit placement
//!
//! Examines every block and keeps the smallest one that still fits, which
//! leaves the least free space behind in the chosen block.

use super::PlacementPolicy;

/// Picks the smallest block that can hold the request
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementPolicy for BestFit {
    fn select(&self, blocks: &[u64], request: u64) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (idx, &size) in blocks.iter().enumerate() {
            if size < request {
                continue;
            }
            // Strict comparison: equal sizes keep the earlier block
            match best {
                Some(current) if size >= blocks[current] => {}
                _ => best = Some(idx),
            }
        }

        best
    }
}

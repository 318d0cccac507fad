//! Worst-fit placement
//!
//! Examines every block and keeps the largest one that fits, leaving the
//! biggest possible hole for later requests.

use super::PlacementPolicy;

/// Picks the largest block that can hold the request
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementPolicy for WorstFit {
    fn select(&self, blocks: &[u64], request: u64) -> Option<usize> {
        let mut worst: Option<usize> = None;

        for (idx, &size) in blocks.iter().enumerate() {
            if size < request {
                continue;
            }
            match worst {
                Some(current) if size <= blocks[current] => {}
                _ => worst = Some(idx),
            }
        }

        worst
    }
}

//! First-fit placement
//!
//! Scans blocks in index order and stops at the first one large enough.
//! Earlier placements are never revisited.

use super::PlacementPolicy;

/// Picks the lowest-indexed block that can hold the request
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn select(&self, blocks: &[u64], request: u64) -> Option<usize> {
        blocks.iter().position(|&size| size >= request)
    }
}

//! # Chain Validation
//!
//! Pure checks over a sequence of blocks. No I/O.
//!
//! ## Chain Invariants
//!
//! | Position | Rule |
//! |----------|------|
//! | `0` | equals `LedgerBlock::genesis()` byte for byte |
//! | `i > 0` | `previous_hash == chain[i-1].hash` and `index == i` |
//! | every `i` | stored hash recomputes from the block's fields |

use shared_types::LedgerBlock;

use super::errors::ChainStoreError;

/// Index of the first block that breaks a chain invariant, if any.
///
/// An empty chain has no violation; see [`verify_chain`] for the
/// stricter whole-chain predicate.
pub fn find_violation(chain: &[LedgerBlock]) -> Option<usize> {
    chain.iter().enumerate().position(|(i, block)| {
        if !block.is_valid() {
            return true;
        }
        if i == 0 {
            return !block.is_genesis();
        }
        let prev = &chain[i - 1];
        block.previous_hash != prev.hash || block.index != prev.index + 1
    })
}

/// `true` iff the chain is non-empty, starts at the fixed genesis, and
/// every block links to and verifies against its predecessor.
pub fn verify_chain(chain: &[LedgerBlock]) -> bool {
    !chain.is_empty() && find_violation(chain).is_none()
}

/// Check that `block` may be appended after `tip`.
///
/// With no tip, only an index-0 block is accepted.
pub fn check_append(tip: Option<&LedgerBlock>, block: &LedgerBlock) -> Result<(), ChainStoreError> {
    if !block.is_valid() {
        return Err(ChainStoreError::integrity(format!(
            "block {} hash does not match its fields",
            block.index
        )));
    }

    match tip {
        None if block.index == 0 => Ok(()),
        None => Err(ChainStoreError::integrity(format!(
            "empty ledger accepts only index 0, got {}",
            block.index
        ))),
        Some(tip) if block.previous_hash != tip.hash => Err(ChainStoreError::integrity(format!(
            "previous_hash {} does not match tip {} at index {}",
            block.previous_hash, tip.hash, tip.index
        ))),
        Some(tip) if block.index != tip.index + 1 => Err(ChainStoreError::integrity(format!(
            "index {} does not follow tip index {}",
            block.index, tip.index
        ))),
        Some(_) => Ok(()),
    }
}

//! Errors at the serialization edge of the bag.
//!
//! The bag's own operations never fail: unknown recordings and class
//! functions yield `None`, writes to unknown keys are ignored.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BagError {
    #[error("failed to encode attributes: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode attributes: {0}")]
    Decode(#[source] serde_json::Error),
}

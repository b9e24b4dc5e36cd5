//! Error types for the dataset-store crate.
//!
//! Every query operation either fully succeeds or returns one of
//! these typed errors without touching any state. Errors carry enough
//! context (the offending id, the valid range, the genre name) for a
//! caller to report them without re-querying the store.

use crate::types::Gender;
use thiserror::Error;

/// Errors surfaced by store construction and query operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// An id argument (user, item, or genre) falls outside its dense
    /// valid range. Never silently clamped.
    #[error("{entity} id {id} out of range (valid range: 0..{len})")]
    InvalidId {
        entity: &'static str,
        id: usize,
        len: usize,
    },

    /// A supplied genre name is absent from the mapping. Raised at
    /// resolution time, before any matrix access.
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    /// A gender-balanced sample of size k was requested but one
    /// gender subset has fewer than k eligible members. Raised before
    /// any sampling is performed.
    #[error("Not enough {gender:?} users: requested {requested}, eligible {eligible}")]
    InsufficientPopulation {
        gender: Gender,
        requested: usize,
        eligible: usize,
    },

    /// The same genre name appeared twice while building the mapping
    #[error("Duplicate genre name in mapping: {0}")]
    DuplicateGenre(String),

    /// The mapping's genre ids do not cover the dense range [0, g)
    #[error("Genre ids do not form the dense range 0..{expected}")]
    NonDenseGenreIds { expected: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;

//! # Dataset Store Crate
//!
//! In-memory query layer over a user/item/interaction dataset: users
//! with a gender attribute, items with multi-label genre tags, and a
//! binary user-item interaction matrix.
//!
//! ## Main Components
//!
//! - **types**: Value types (id aliases, Gender, GenreSet, BoolMatrix,
//!   GenreMapping, GenreSubset)
//! - **store**: The DatasetStore and its query operations
//! - **error**: Typed errors for construction and queries
//!
//! ## Example Usage
//!
//! ```
//! use dataset_store::{DatasetStore, Gender, GenreMapping};
//!
//! let mapping = GenreMapping::from_pairs([
//!     ("Action".to_string(), 0),
//!     ("Comedy".to_string(), 1),
//! ])?;
//!
//! let store = DatasetStore::new(
//!     vec![Gender::Male, Gender::Female],
//!     mapping,
//!     vec![vec![0], vec![0, 1]],
//!     &[(0, 0), (1, 1)],
//! )?;
//!
//! let subset = store.filter_by_genre(&["Action"], false)?;
//! assert_eq!(subset.item_ids, vec![0, 1]);
//! # Ok::<(), dataset_store::StoreError>(())
//! ```
//!
//! All matrices are immutable after construction; every query is a
//! pure synchronous read, so a store shared behind an `Arc` is safe
//! to query from multiple threads without locking.

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use store::DatasetStore;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    GenreId,
    // Core types
    BoolMatrix,
    GenreMapping,
    GenreSet,
    GenreSubset,
    // Enums
    Gender,
};

//! # Data Loader Crate
//!
//! Parses a MovieLens-100k style dataset directory and constructs a
//! [`dataset_store::DatasetStore`] from it. The store itself never
//! touches disk; this crate is the boundary that turns the five data
//! files into the three in-memory matrices and the genre mapping.
//!
//! ## Main Components
//!
//! - **parser**: Line and file parsers for u.info, u.user, u.genre,
//!   u.item, and u.data
//! - **loader**: `load_dataset`, the one-call entry point
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_dataset;
//! use std::path::Path;
//!
//! let store = load_dataset(Path::new("data/ml-100k"))?;
//! let (users, items, genres) = store.counts();
//! println!("{} users, {} items, {} genres", users, items, genres);
//! ```

pub mod error;
pub mod loader;
pub mod parser;

// Re-export commonly used items for convenience
pub use error::{DataLoadError, Result};
pub use loader::load_dataset;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let result = load_dataset(Path::new("no/such/directory"));
        assert!(matches!(result, Err(DataLoadError::IoError(_))));
    }

    #[test]
    fn test_load_dataset() {
        // This test requires the actual dataset files
        // Place ml-100k data in ../../data/ml-100k/
        let data_dir = Path::new("../../data/ml-100k");

        if data_dir.exists() {
            let store = load_dataset(data_dir).unwrap();
            let (users, items, genres) = store.counts();

            // MovieLens 100k expected counts
            assert_eq!(users, 943);
            assert_eq!(items, 1682);
            assert_eq!(genres, 19);
        }
    }
}

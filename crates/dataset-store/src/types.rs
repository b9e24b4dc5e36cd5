//! Core domain types for the user/item/interaction dataset.
//!
//! This module defines the value types the store is built from:
//! dense id aliases, the per-user `Gender`, the per-item `GenreSet`
//! bit-set, the dense `BoolMatrix` used for interactions, and the
//! immutable `GenreMapping` between genre names and ids.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// Dense, zero-based ids assigned at load time. Usable directly as
// matrix indices, which is why these are usize rather than u32.

/// Unique identifier for a user, in [0, n)
pub type UserId = usize;

/// Unique identifier for an item, in [0, m)
pub type ItemId = usize;

/// Unique identifier for a genre, in [0, g)
pub type GenreId = usize;

// =============================================================================
// Gender
// =============================================================================

/// Gender attribute of a user. Every user has exactly one; there is
/// no missing/unknown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn is_male(self) -> bool {
        self == Gender::Male
    }
}

// =============================================================================
// GenreSet
// =============================================================================

/// Fixed-width bit-set over all known genres, one bit per genre id.
///
/// Bit j set means the item carries genre j. The width is fixed at
/// construction to the number of genres known to the store; an item
/// may carry zero, one, or multiple genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSet {
    blocks: Vec<u64>,
    width: usize,
}

impl GenreSet {
    /// Create an empty set over `width` genres
    pub fn new(width: usize) -> Self {
        Self {
            blocks: vec![0; width.div_ceil(64)],
            width,
        }
    }

    /// Number of genres this set ranges over
    pub fn width(&self) -> usize {
        self.width
    }

    /// Set the bit for `id`.
    ///
    /// Callers must have validated `id` against the width; the store
    /// does this at construction time.
    pub fn set(&mut self, id: GenreId) {
        assert!(id < self.width, "genre id {} out of width {}", id, self.width);
        self.blocks[id / 64] |= 1 << (id % 64);
    }

    /// Whether the bit for `id` is set. Out-of-width ids are never set.
    pub fn contains(&self, id: GenreId) -> bool {
        id < self.width && self.blocks[id / 64] & (1 << (id % 64)) != 0
    }

    /// How many of the given ids are set in this set.
    ///
    /// This is the count exclusive matching is decided on: it is
    /// scoped to the queried ids, not the full bit-set.
    pub fn count_within(&self, ids: &[GenreId]) -> usize {
        ids.iter().filter(|&&id| self.contains(id)).count()
    }

    /// Whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&b| b == 0)
    }

    /// Iterate the set genre ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = GenreId> + '_ {
        (0..self.width).filter(|&id| self.contains(id))
    }
}

// =============================================================================
// BoolMatrix
// =============================================================================

/// Dense row-major boolean matrix.
///
/// Used for the n×m interaction matrix (rows are users, columns are
/// items) and for the submatrices returned by genre filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl BoolMatrix {
    /// Create an all-false matrix of the given shape
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Read the cell at (row, col).
    ///
    /// Indices must be in shape; the store validates ids before any
    /// matrix access.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.cols, "index ({}, {}) out of shape ({}, {})", row, col, self.rows, self.cols);
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(row < self.rows && col < self.cols, "index ({}, {}) out of shape ({}, {})", row, col, self.rows, self.cols);
        self.cells[row * self.cols + col] = value;
    }
}

// =============================================================================
// GenreMapping
// =============================================================================

/// Immutable mapping between genre names and dense genre ids.
///
/// Built once at construction; resolution failures are typed errors,
/// never silent defaults. Names are unique keys and ids are exactly
/// the dense range [0, g), so the reverse lookup is a plain vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreMapping {
    by_name: HashMap<String, GenreId>,
    names: Vec<String>,
}

impl GenreMapping {
    /// Build the mapping from (name, id) pairs.
    ///
    /// Fails with `DuplicateGenre` if a name appears twice, and with
    /// `NonDenseGenreIds` if the ids are not exactly [0, g) for g
    /// pairs (an out-of-range id, or two names sharing an id).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, GenreId)>) -> Result<Self> {
        let pairs: Vec<(String, GenreId)> = pairs.into_iter().collect();
        let g = pairs.len();

        let mut by_name = HashMap::with_capacity(g);
        let mut names = vec![String::new(); g];
        let mut seen = vec![false; g];

        for (name, id) in pairs {
            if id >= g || seen[id] {
                return Err(StoreError::NonDenseGenreIds { expected: g });
            }
            seen[id] = true;
            names[id] = name.clone();
            if by_name.insert(name.clone(), id).is_some() {
                return Err(StoreError::DuplicateGenre(name));
            }
        }

        Ok(Self { by_name, names })
    }

    /// Translate a genre name into its dense id
    pub fn resolve(&self, name: &str) -> Result<GenreId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownGenre(name.to_string()))
    }

    /// Reverse lookup, for display purposes
    pub fn name_of(&self, id: GenreId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of genres in the mapping
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// GenreSubset
// =============================================================================

/// Result of a genre filter: the restriction of the interaction
/// relation to matching items and to the users who interacted with at
/// least one of them.
///
/// `interactions` has shape |user_ids| × |item_ids|, and
/// `interactions[a][b]` equals the original interaction value at
/// (user_ids[a], item_ids[b]). Both id lists are in ascending
/// original-id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreSubset {
    pub user_ids: Vec<UserId>,
    pub item_ids: Vec<ItemId>,
    pub interactions: BoolMatrix,
}

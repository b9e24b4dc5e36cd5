//! Dataset loading: parse a data directory and build the store.

use crate::error::Result;
use crate::parser;
use dataset_store::{DatasetStore, GenreMapping};
use std::path::Path;
use tracing::info;

/// Load a MovieLens-100k style dataset directory into a DatasetStore.
///
/// Steps:
/// 1. Read the user/item counts from u.info
/// 2. Parse u.user, u.genre, and u.data in parallel
/// 3. Parse u.item (needs the genre count from u.genre)
/// 4. Build the store, which validates all ids against their ranges
pub fn load_dataset(data_dir: &Path) -> Result<DatasetStore> {
    let info_path = data_dir.join(parser::INFO_FILE);
    let users_path = data_dir.join(parser::USERS_FILE);
    let genres_path = data_dir.join(parser::GENRES_FILE);
    let items_path = data_dir.join(parser::ITEMS_FILE);
    let ratings_path = data_dir.join(parser::RATINGS_FILE);

    let (n_users, n_items) = parser::parse_info(&info_path)?;
    info!(n_users, n_items, "Read dataset counts from {:?}", info_path);

    // Three independent parses; nested join gives three-way
    // parallelism. u.item waits for the genre count.
    let ((genders, genre_pairs), interactions) = rayon::join(
        || {
            rayon::join(
                || parser::parse_users(&users_path, n_users),
                || parser::parse_genres(&genres_path),
            )
        },
        || parser::parse_ratings(&ratings_path),
    );

    let genders = genders?;
    let genre_pairs = genre_pairs?;
    let interactions = interactions?;

    let n_genres = genre_pairs.len();
    let item_genres = parser::parse_items(&items_path, n_items, n_genres)?;

    info!(
        n_users,
        n_items,
        n_genres,
        n_interactions = interactions.len(),
        "Parsed dataset files"
    );

    let mapping = GenreMapping::from_pairs(genre_pairs)?;
    let store = DatasetStore::new(genders, mapping, item_genres, &interactions)?;

    info!("Dataset store built");
    Ok(store)
}

//! The DatasetStore and its query operations.
//!
//! The store owns three immutable matrices populated once at
//! construction: per-user genders (n), per-item genre bit-sets (m),
//! and the n×m boolean interaction matrix, plus the genre name→id
//! mapping. Queries never mutate the store, so sharing it across
//! threads behind an `Arc` needs no locking.

use crate::error::{Result, StoreError};
use crate::types::{BoolMatrix, Gender, GenreId, GenreMapping, GenreSet, GenreSubset, ItemId, UserId};
use rand::seq::IndexedRandom;
use rand::Rng;

/// In-memory store over a loaded user/item/interaction dataset.
///
/// Construction is the only write; every operation afterwards is a
/// pure read returning owned results, never handles into the live
/// matrices.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    /// Gender per user, indexed by UserId
    genders: Vec<Gender>,
    /// Genre bit-set per item, indexed by ItemId, all of width g
    item_genres: Vec<GenreSet>,
    /// n×m interaction matrix; true means the user rated the item
    interactions: BoolMatrix,
    /// Genre name→id mapping of size g
    genres: GenreMapping,
}

impl DatasetStore {
    /// Build a store from loader output.
    ///
    /// `item_genre_ids` holds, per item, the list of genre ids the
    /// item carries; `interaction_pairs` holds the (user, item) pairs
    /// recorded as rated. The only validation here is what safe
    /// indexing needs: every id must be inside its dense range,
    /// otherwise construction fails with `InvalidId`.
    pub fn new(
        genders: Vec<Gender>,
        genres: GenreMapping,
        item_genre_ids: Vec<Vec<GenreId>>,
        interaction_pairs: &[(UserId, ItemId)],
    ) -> Result<Self> {
        let n = genders.len();
        let m = item_genre_ids.len();
        let g = genres.len();

        // Pack per-item genre id lists into fixed-width bit-sets
        let mut item_genres = Vec::with_capacity(m);
        for ids in &item_genre_ids {
            let mut set = GenreSet::new(g);
            for &id in ids {
                if id >= g {
                    return Err(StoreError::InvalidId {
                        entity: "genre",
                        id,
                        len: g,
                    });
                }
                set.set(id);
            }
            item_genres.push(set);
        }

        // Materialize the dense interaction matrix. A pair recorded
        // twice is idempotent.
        let mut interactions = BoolMatrix::new(n, m);
        for &(user_id, item_id) in interaction_pairs {
            if user_id >= n {
                return Err(StoreError::InvalidId {
                    entity: "user",
                    id: user_id,
                    len: n,
                });
            }
            if item_id >= m {
                return Err(StoreError::InvalidId {
                    entity: "item",
                    id: item_id,
                    len: m,
                });
            }
            interactions.set(user_id, item_id, true);
        }

        Ok(Self {
            genders,
            item_genres,
            interactions,
            genres,
        })
    }

    // Introspection

    /// Number of users (n)
    pub fn n_users(&self) -> usize {
        self.genders.len()
    }

    /// Number of items (m)
    pub fn n_items(&self) -> usize {
        self.item_genres.len()
    }

    /// Number of known genres (g)
    pub fn n_genres(&self) -> usize {
        self.genres.len()
    }

    /// (users, items, genres) counts, for logging and summaries
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.n_users(), self.n_items(), self.n_genres())
    }

    /// The genre name→id mapping (for display-side reverse lookups)
    pub fn genre_mapping(&self) -> &GenreMapping {
        &self.genres
    }

    // Query operations

    /// Restrict the interaction relation to items matching a genre
    /// query and to the users who interacted with at least one of
    /// them.
    ///
    /// ## Algorithm
    /// 1. Resolve every name in `genre_names` (fails with
    ///    `UnknownGenre` before any matrix access)
    /// 2. Keep items with at least one resolved genre bit set; in
    ///    exclusive mode, keep only items with exactly one set
    /// 3. Keep users with at least one interaction with a kept item
    /// 4. Select the corresponding rows and columns into a dense
    ///    submatrix, preserving ascending id order
    ///
    /// Exclusivity is scoped to the queried genre ids, not the item's
    /// full genre list: an item carrying one queried genre plus any
    /// number of unqueried ones is still an exclusive match. With a
    /// single queried genre, exclusive mode therefore filters nothing.
    ///
    /// An empty `genre_names` yields empty id lists and a 0×0
    /// submatrix.
    pub fn filter_by_genre(&self, genre_names: &[&str], exclusive: bool) -> Result<GenreSubset> {
        let mut genre_ids = genre_names
            .iter()
            .map(|name| self.genres.resolve(name))
            .collect::<Result<Vec<GenreId>>>()?;

        // The query is a set of genres; a name supplied twice must
        // not double-count towards exclusivity
        genre_ids.sort_unstable();
        genre_ids.dedup();

        // Single pass over items: set-membership predicate instead of
        // collect-then-remove, so ascending order falls out for free
        let item_ids: Vec<ItemId> = (0..self.n_items())
            .filter(|&item_id| {
                let matched = self.item_genres[item_id].count_within(&genre_ids);
                matched >= 1 && (!exclusive || matched == 1)
            })
            .collect();

        let user_ids: Vec<UserId> = (0..self.n_users())
            .filter(|&user_id| {
                item_ids
                    .iter()
                    .any(|&item_id| self.interactions.get(user_id, item_id))
            })
            .collect();

        let mut submatrix = BoolMatrix::new(user_ids.len(), item_ids.len());
        for (row, &user_id) in user_ids.iter().enumerate() {
            for (col, &item_id) in item_ids.iter().enumerate() {
                if self.interactions.get(user_id, item_id) {
                    submatrix.set(row, col, true);
                }
            }
        }

        Ok(GenreSubset {
            user_ids,
            item_ids,
            interactions: submatrix,
        })
    }

    /// The stored genre bit-set of an item
    pub fn genres_of(&self, item_id: ItemId) -> Result<&GenreSet> {
        self.check_item(item_id)?;
        Ok(&self.item_genres[item_id])
    }

    /// Ascending item ids the user has interacted with
    pub fn seen_items_of(&self, user_id: UserId) -> Result<Vec<ItemId>> {
        self.check_user(user_id)?;
        Ok((0..self.n_items())
            .filter(|&item_id| self.interactions.get(user_id, item_id))
            .collect())
    }

    /// Whether an item carries the named genre.
    ///
    /// The name is resolved first, so an unknown name fails with
    /// `UnknownGenre` even when the item id is also out of range.
    pub fn has_genre(&self, item_id: ItemId, genre_name: &str) -> Result<bool> {
        let genre_id = self.genres.resolve(genre_name)?;
        self.check_item(item_id)?;
        Ok(self.item_genres[item_id].contains(genre_id))
    }

    /// The stored gender of a user
    pub fn gender_of(&self, user_id: UserId) -> Result<Gender> {
        self.check_user(user_id)?;
        Ok(self.genders[user_id])
    }

    /// Draw k male and k female user ids from the given candidates.
    ///
    /// The candidates are partitioned by stored gender, then k
    /// distinct ids are drawn uniformly without replacement from each
    /// subset independently. Fails with `InsufficientPopulation`
    /// before any draw if either subset is smaller than k. The rng is
    /// injected so callers needing reproducibility can seed it; no
    /// ordering is guaranteed on the returned samples.
    pub fn sample_balanced_by_gender<R: Rng + ?Sized>(
        &self,
        user_ids: &[UserId],
        k: usize,
        rng: &mut R,
    ) -> Result<(Vec<UserId>, Vec<UserId>)> {
        let mut male_ids = Vec::new();
        let mut female_ids = Vec::new();

        for &user_id in user_ids {
            match self.gender_of(user_id)? {
                Gender::Male => male_ids.push(user_id),
                Gender::Female => female_ids.push(user_id),
            }
        }

        if male_ids.len() < k {
            return Err(StoreError::InsufficientPopulation {
                gender: Gender::Male,
                requested: k,
                eligible: male_ids.len(),
            });
        }
        if female_ids.len() < k {
            return Err(StoreError::InsufficientPopulation {
                gender: Gender::Female,
                requested: k,
                eligible: female_ids.len(),
            });
        }

        let male_sample = male_ids.choose_multiple(rng, k).copied().collect();
        let female_sample = female_ids.choose_multiple(rng, k).copied().collect();

        Ok((male_sample, female_sample))
    }

    fn check_user(&self, user_id: UserId) -> Result<()> {
        if user_id >= self.n_users() {
            return Err(StoreError::InvalidId {
                entity: "user",
                id: user_id,
                len: self.n_users(),
            });
        }
        Ok(())
    }

    fn check_item(&self, item_id: ItemId) -> Result<()> {
        if item_id >= self.n_items() {
            return Err(StoreError::InvalidId {
                entity: "item",
                id: item_id,
                len: self.n_items(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn action_comedy_mapping() -> GenreMapping {
        GenreMapping::from_pairs([("Action".to_string(), 0), ("Comedy".to_string(), 1)]).unwrap()
    }

    /// 3 users (M, F, M), 2 items: item 0 = {Action}, item 1 =
    /// {Action, Comedy}. Interactions: u0–i0, u1–i1, u2–i0, u2–i1.
    fn create_test_store() -> DatasetStore {
        DatasetStore::new(
            vec![Gender::Male, Gender::Female, Gender::Male],
            action_comedy_mapping(),
            vec![vec![0], vec![0, 1]],
            &[(0, 0), (1, 1), (2, 0), (2, 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_construction_rejects_out_of_range_interaction() {
        let result = DatasetStore::new(
            vec![Gender::Male],
            action_comedy_mapping(),
            vec![vec![0]],
            &[(0, 5)],
        );
        assert!(matches!(
            result,
            Err(StoreError::InvalidId {
                entity: "item",
                id: 5,
                len: 1
            })
        ));

        let result = DatasetStore::new(
            vec![Gender::Male],
            action_comedy_mapping(),
            vec![vec![0]],
            &[(3, 0)],
        );
        assert!(matches!(result, Err(StoreError::InvalidId { entity: "user", .. })));
    }

    #[test]
    fn test_construction_rejects_out_of_range_genre() {
        let result = DatasetStore::new(
            vec![Gender::Male],
            action_comedy_mapping(),
            vec![vec![0, 2]],
            &[],
        );
        assert!(matches!(
            result,
            Err(StoreError::InvalidId { entity: "genre", id: 2, len: 2 })
        ));
    }

    #[test]
    fn test_filter_inclusive() {
        let store = create_test_store();
        let subset = store.filter_by_genre(&["Action"], false).unwrap();

        // Both items carry Action; every user interacted with one
        assert_eq!(subset.item_ids, vec![0, 1]);
        assert_eq!(subset.user_ids, vec![0, 1, 2]);

        assert!(subset.interactions.get(0, 0));
        assert!(!subset.interactions.get(0, 1));
        assert!(!subset.interactions.get(1, 0));
        assert!(subset.interactions.get(1, 1));
        assert!(subset.interactions.get(2, 0));
        assert!(subset.interactions.get(2, 1));
    }

    #[test]
    fn test_filter_exclusive_single_genre_is_noop() {
        let store = create_test_store();

        // Exclusivity counts bits among the queried genres only, so a
        // single-genre query can never exclude anything: item 1
        // carries two genres but only one of them is queried
        let subset = store.filter_by_genre(&["Action"], true).unwrap();
        assert_eq!(subset.item_ids, vec![0, 1]);
        assert_eq!(subset.user_ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_exclusive_drops_multi_match() {
        let store = create_test_store();

        // Item 1 has both queried bits set and is dropped; user 1
        // only interacted with item 1 and drops with it
        let subset = store.filter_by_genre(&["Action", "Comedy"], true).unwrap();
        assert_eq!(subset.item_ids, vec![0]);
        assert_eq!(subset.user_ids, vec![0, 2]);
        assert!(subset.interactions.get(0, 0));
        assert!(subset.interactions.get(1, 0));
    }

    #[test]
    fn test_filter_duplicate_name_does_not_break_exclusivity() {
        let store = create_test_store();

        // "Action" twice is still a one-genre query
        let subset = store.filter_by_genre(&["Action", "Action"], true).unwrap();
        assert_eq!(subset.item_ids, vec![0, 1]);
    }

    #[test]
    fn test_filter_empty_query() {
        let store = create_test_store();

        for exclusive in [false, true] {
            let subset = store.filter_by_genre(&[], exclusive).unwrap();
            assert!(subset.user_ids.is_empty());
            assert!(subset.item_ids.is_empty());
            assert_eq!(subset.interactions.rows(), 0);
            assert_eq!(subset.interactions.cols(), 0);
        }
    }

    #[test]
    fn test_filter_unknown_genre() {
        let store = create_test_store();
        let result = store.filter_by_genre(&["Action", "Western"], false);
        assert!(matches!(result, Err(StoreError::UnknownGenre(name)) if name == "Western"));
    }

    #[test]
    fn test_genres_of() {
        let store = create_test_store();

        let genres = store.genres_of(1).unwrap();
        assert_eq!(genres.ids().collect::<Vec<_>>(), vec![0, 1]);

        assert!(matches!(
            store.genres_of(2),
            Err(StoreError::InvalidId { entity: "item", .. })
        ));
    }

    #[test]
    fn test_seen_items_of() {
        let store = create_test_store();

        assert_eq!(store.seen_items_of(0).unwrap(), vec![0]);
        assert_eq!(store.seen_items_of(1).unwrap(), vec![1]);
        assert_eq!(store.seen_items_of(2).unwrap(), vec![0, 1]);
        assert!(store.seen_items_of(3).is_err());
    }

    #[test]
    fn test_has_genre_agrees_with_genres_of() {
        let store = create_test_store();

        for item_id in 0..store.n_items() {
            for name in ["Action", "Comedy"] {
                let genre_id = store.genre_mapping().resolve(name).unwrap();
                assert_eq!(
                    store.has_genre(item_id, name).unwrap(),
                    store.genres_of(item_id).unwrap().contains(genre_id)
                );
            }
        }
    }

    #[test]
    fn test_has_genre_resolves_name_first() {
        let store = create_test_store();

        // Unknown name wins over the out-of-range item id
        assert!(matches!(
            store.has_genre(99, "Western"),
            Err(StoreError::UnknownGenre(_))
        ));
        assert!(matches!(
            store.has_genre(99, "Action"),
            Err(StoreError::InvalidId { entity: "item", .. })
        ));
    }

    #[test]
    fn test_gender_of() {
        let store = create_test_store();

        assert_eq!(store.gender_of(0).unwrap(), Gender::Male);
        assert_eq!(store.gender_of(1).unwrap(), Gender::Female);
        assert!(store.gender_of(3).is_err());
    }

    #[test]
    fn test_sample_balanced_by_gender() {
        let store = create_test_store();
        let mut rng = StdRng::seed_from_u64(42);

        let (males, females) = store
            .sample_balanced_by_gender(&[0, 1, 2], 1, &mut rng)
            .unwrap();

        assert_eq!(males.len(), 1);
        assert_eq!(females.len(), 1);
        assert!(males[0] == 0 || males[0] == 2);
        assert_eq!(females[0], 1);
    }

    #[test]
    fn test_sample_insufficient_population() {
        let store = create_test_store();
        let mut rng = StdRng::seed_from_u64(42);

        // Only one female among the candidates
        let result = store.sample_balanced_by_gender(&[0, 1, 2], 2, &mut rng);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientPopulation {
                gender: Gender::Female,
                requested: 2,
                eligible: 1
            })
        ));
    }

    #[test]
    fn test_sample_validates_candidate_ids() {
        let store = create_test_store();
        let mut rng = StdRng::seed_from_u64(42);

        let result = store.sample_balanced_by_gender(&[0, 7], 1, &mut rng);
        assert!(matches!(
            result,
            Err(StoreError::InvalidId { entity: "user", .. })
        ));
    }

    #[test]
    fn test_sample_seeded_is_deterministic() {
        let store = DatasetStore::new(
            vec![
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female,
            ],
            action_comedy_mapping(),
            vec![vec![0]],
            &[],
        )
        .unwrap();
        let candidates: Vec<UserId> = (0..6).collect();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let sample_a = store
            .sample_balanced_by_gender(&candidates, 2, &mut rng_a)
            .unwrap();
        let sample_b = store
            .sample_balanced_by_gender(&candidates, 2, &mut rng_b)
            .unwrap();

        assert_eq!(sample_a, sample_b);
    }
}

//! Parsers for the MovieLens-100k style data files.
//!
//! Five files make up a dataset directory:
//! - `u.info`: user and item counts, one per line ("943 users")
//! - `u.user`: `id|age|gender|occupation|zip`, gender M or F
//! - `u.genre`: `name|id`, ids already dense and 0-based
//! - `u.item`: `id|title|...|f0|f1|...` with g trailing 0/1 genre flags
//! - `u.data`: whitespace-separated `user item rating timestamp`
//!
//! User, item, and rating files carry 1-based ids; everything leaves
//! this module 0-based and dense, ready for the store. Only presence
//! is kept from `u.data` — rating strength is not modeled.
//!
//! All line-level parsing is pure so tests can feed strings directly;
//! the public `parse_*` functions add the file I/O on top.

use crate::error::{DataLoadError, Result};
use dataset_store::{Gender, GenreId, ItemId, UserId};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const INFO_FILE: &str = "u.info";
pub const USERS_FILE: &str = "u.user";
pub const GENRES_FILE: &str = "u.genre";
pub const ITEMS_FILE: &str = "u.item";
pub const RATINGS_FILE: &str = "u.data";

/// Read a file with ISO-8859-1 encoding (Latin-1).
///
/// MovieLens files are not UTF-8; Latin-1 bytes map directly to
/// Unicode code points, so the conversion is a plain byte-to-char map.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

/// Parse a 1-based file id into a dense 0-based id
fn parse_one_based_id(raw: &str, file: &str, line_no: usize, what: &str) -> Result<usize> {
    let id: usize = raw
        .parse()
        .map_err(|e| parse_error(file, line_no, format!("Invalid {}: {}", what, e)))?;
    id.checked_sub(1)
        .ok_or_else(|| parse_error(file, line_no, format!("{} must be 1-based, got 0", what)))
}

// =============================================================================
// u.info
// =============================================================================

fn parse_count_line(line: Option<&String>, line_no: usize, what: &str) -> Result<usize> {
    let line = line.ok_or_else(|| parse_error(INFO_FILE, line_no, format!("Missing {} count", what)))?;
    let token = line
        .split_whitespace()
        .next()
        .ok_or_else(|| parse_error(INFO_FILE, line_no, format!("Missing {} count", what)))?;
    token
        .parse()
        .map_err(|e| parse_error(INFO_FILE, line_no, format!("Invalid {} count: {}", what, e)))
}

fn parse_info_lines(lines: &[String]) -> Result<(usize, usize)> {
    let n_users = parse_count_line(lines.first(), 1, "user")?;
    let n_items = parse_count_line(lines.get(1), 2, "item")?;
    Ok((n_users, n_items))
}

/// Parse `u.info`: (user count, item count) from the first two lines
pub fn parse_info(path: &Path) -> Result<(usize, usize)> {
    parse_info_lines(&read_lines_latin1(path)?)
}

// =============================================================================
// u.user
// =============================================================================

fn parse_gender(s: &str) -> Result<Gender> {
    match s {
        "M" => Ok(Gender::Male),
        "F" => Ok(Gender::Female),
        _ => Err(DataLoadError::InvalidValue {
            field: "gender".to_string(),
            value: s.to_string(),
        }),
    }
}

fn parse_user_line(line: &str, line_no: usize) -> Result<(UserId, Gender)> {
    let mut parts = line.split('|');

    let user_id = parts
        .next()
        .ok_or_else(|| parse_error(USERS_FILE, line_no, "Missing user id"))?;
    let _age = parts
        .next()
        .ok_or_else(|| parse_error(USERS_FILE, line_no, "Missing age"))?;
    let gender = parts
        .next()
        .ok_or_else(|| parse_error(USERS_FILE, line_no, "Missing gender"))?;

    let user_id = parse_one_based_id(user_id, USERS_FILE, line_no, "user id")?;
    Ok((user_id, parse_gender(gender)?))
}

fn parse_users_lines(lines: &[String], n_users: usize) -> Result<Vec<Gender>> {
    let mut genders: Vec<Option<Gender>> = vec![None; n_users];

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (user_id, gender) = parse_user_line(line, line_no)?;
        if user_id >= n_users {
            return Err(DataLoadError::InvalidValue {
                field: "user id".to_string(),
                value: (user_id + 1).to_string(),
            });
        }
        genders[user_id] = Some(gender);
    }

    // Every user announced by u.info must have a gender; the store
    // has no missing/unknown state to fall back on
    genders
        .into_iter()
        .enumerate()
        .map(|(id, gender)| gender.ok_or(DataLoadError::MissingRecord { entity: "user", id }))
        .collect()
}

/// Parse `u.user` into a gender per dense user id
pub fn parse_users(path: &Path, n_users: usize) -> Result<Vec<Gender>> {
    parse_users_lines(&read_lines_latin1(path)?, n_users)
}

// =============================================================================
// u.genre
// =============================================================================

fn parse_genre_line(line: &str, line_no: usize) -> Result<(String, GenreId)> {
    let mut parts = line.split('|');

    let name = parts
        .next()
        .ok_or_else(|| parse_error(GENRES_FILE, line_no, "Missing genre name"))?;
    let id = parts
        .next()
        .ok_or_else(|| parse_error(GENRES_FILE, line_no, "Missing genre id"))?;

    let id: GenreId = id
        .trim()
        .parse()
        .map_err(|e| parse_error(GENRES_FILE, line_no, format!("Invalid genre id: {}", e)))?;

    Ok((name.to_string(), id))
}

fn parse_genres_lines(lines: &[String]) -> Result<Vec<(String, GenreId)>> {
    let mut pairs = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue; // the stock u.genre file ends with blank lines
        }
        pairs.push(parse_genre_line(line, line_no)?);
    }

    Ok(pairs)
}

/// Parse `u.genre` into (name, id) pairs; density and uniqueness are
/// validated by `GenreMapping::from_pairs`
pub fn parse_genres(path: &Path) -> Result<Vec<(String, GenreId)>> {
    parse_genres_lines(&read_lines_latin1(path)?)
}

// =============================================================================
// u.item
// =============================================================================

fn parse_item_line(line: &str, line_no: usize, n_genres: usize) -> Result<(ItemId, Vec<GenreId>)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < n_genres + 1 {
        return Err(parse_error(
            ITEMS_FILE,
            line_no,
            format!("Expected at least {} fields, found {}", n_genres + 1, parts.len()),
        ));
    }

    let item_id = parse_one_based_id(parts[0], ITEMS_FILE, line_no, "item id")?;

    // Title, dates, and URL sit between the id and the genre flags;
    // the store's data model keeps none of them
    let flags = &parts[parts.len() - n_genres..];
    let mut genre_ids = Vec::new();
    for (genre_id, flag) in flags.iter().enumerate() {
        match flag.trim() {
            "1" => genre_ids.push(genre_id),
            "0" => {}
            other => {
                return Err(parse_error(
                    ITEMS_FILE,
                    line_no,
                    format!("Invalid genre flag: {:?}", other),
                ));
            }
        }
    }

    Ok((item_id, genre_ids))
}

fn parse_items_lines(lines: &[String], n_items: usize, n_genres: usize) -> Result<Vec<Vec<GenreId>>> {
    // An item with no record simply carries no genres, matching the
    // all-zeros rows the original files produce
    let mut item_genres: Vec<Vec<GenreId>> = vec![Vec::new(); n_items];

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (item_id, genre_ids) = parse_item_line(line, line_no, n_genres)?;
        if item_id >= n_items {
            return Err(DataLoadError::InvalidValue {
                field: "item id".to_string(),
                value: (item_id + 1).to_string(),
            });
        }
        item_genres[item_id] = genre_ids;
    }

    Ok(item_genres)
}

/// Parse `u.item` into a genre id list per dense item id
pub fn parse_items(path: &Path, n_items: usize, n_genres: usize) -> Result<Vec<Vec<GenreId>>> {
    parse_items_lines(&read_lines_latin1(path)?, n_items, n_genres)
}

// =============================================================================
// u.data
// =============================================================================

fn parse_rating_line(line: &str, line_no: usize) -> Result<(UserId, ItemId)> {
    let mut parts = line.split_whitespace();

    let user_id = parts
        .next()
        .ok_or_else(|| parse_error(RATINGS_FILE, line_no, "Missing user id"))?;
    let item_id = parts
        .next()
        .ok_or_else(|| parse_error(RATINGS_FILE, line_no, "Missing item id"))?;

    let user_id = parse_one_based_id(user_id, RATINGS_FILE, line_no, "user id")?;
    let item_id = parse_one_based_id(item_id, RATINGS_FILE, line_no, "item id")?;
    Ok((user_id, item_id))
}

fn parse_ratings_lines(lines: &[String]) -> Result<Vec<(UserId, ItemId)>> {
    let mut pairs = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        pairs.push(parse_rating_line(line, line_no)?);
    }

    Ok(pairs)
}

/// Parse `u.data` into interaction presence pairs. Range validation
/// against the announced counts happens at store construction.
pub fn parse_ratings(path: &Path) -> Result<Vec<(UserId, ItemId)>> {
    parse_ratings_lines(&read_lines_latin1(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &str) -> Vec<String> {
        raw.lines().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_info() {
        let parsed = parse_info_lines(&lines("943 users\n1682 items\n100000 ratings\n")).unwrap();
        assert_eq!(parsed, (943, 1682));
    }

    #[test]
    fn test_parse_info_rejects_garbage() {
        assert!(parse_info_lines(&lines("many users\n1682 items")).is_err());
        assert!(parse_info_lines(&lines("943 users")).is_err());
    }

    #[test]
    fn test_parse_user_line() {
        let (id, gender) = parse_user_line("1|24|M|technician|85711", 1).unwrap();
        assert_eq!(id, 0);
        assert_eq!(gender, Gender::Male);

        let (id, gender) = parse_user_line("5|33|F|other|15213", 5).unwrap();
        assert_eq!(id, 4);
        assert_eq!(gender, Gender::Female);
    }

    #[test]
    fn test_parse_user_line_rejects_bad_gender() {
        let result = parse_user_line("1|24|X|technician|85711", 1);
        assert!(matches!(result, Err(DataLoadError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_user_line_rejects_short_line() {
        assert!(parse_user_line("1|24", 1).is_err());
    }

    #[test]
    fn test_parse_users_requires_every_user() {
        let result = parse_users_lines(&lines("1|24|M|technician|85711"), 2);
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRecord { entity: "user", id: 1 })
        ));
    }

    #[test]
    fn test_parse_users_out_of_order() {
        let parsed =
            parse_users_lines(&lines("2|30|F|writer|55105\n1|24|M|technician|85711"), 2).unwrap();
        assert_eq!(parsed, vec![Gender::Male, Gender::Female]);
    }

    #[test]
    fn test_parse_genres() {
        let parsed = parse_genres_lines(&lines("unknown|0\nAction|1\nAdventure|2\n\n")).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("unknown".to_string(), 0),
                ("Action".to_string(), 1),
                ("Adventure".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_parse_item_line_takes_trailing_flags() {
        // Two middle fields are empty, like the real file's missing
        // video release date and URL
        let (id, genre_ids) =
            parse_item_line("3|Four Rooms (1995)|01-Jan-1995|||0|1|0|1", 3, 4).unwrap();
        assert_eq!(id, 2);
        assert_eq!(genre_ids, vec![1, 3]);
    }

    #[test]
    fn test_parse_item_line_rejects_bad_flag() {
        let result = parse_item_line("1|Title|date||url|0|2|0", 1, 3);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_items_missing_record_has_no_genres() {
        let parsed = parse_items_lines(&lines("2|Title|d||u|1|0"), 2, 2).unwrap();
        assert_eq!(parsed, vec![vec![], vec![0]]);
    }

    #[test]
    fn test_parse_rating_line() {
        let (user_id, item_id) = parse_rating_line("196\t242\t3\t881250949", 1).unwrap();
        assert_eq!(user_id, 195);
        assert_eq!(item_id, 241);
    }

    #[test]
    fn test_parse_rating_line_rejects_zero_id() {
        assert!(parse_rating_line("0\t242\t3\t881250949", 1).is_err());
    }
}

//! Household quick search for the header search bar.

use crate::model::household::Household;
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Case-insensitive substring search over house number, address, head of
/// household and polling booth. Blank terms match nothing.
pub fn search_households<'a>(
    households: &'a [Household],
    term: &str,
    limit: usize,
) -> Vec<&'a Household> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return Vec::new();
    }

    households
        .iter()
        .filter(|household| {
            [
                household.house_number.as_str(),
                household.address.as_str(),
                household.head_of_household.as_str(),
                household.polling_booth.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}

fn normalize_term(term: &str) -> String {
    WHITESPACE_RE
        .replace_all(term.trim(), " ")
        .to_lowercase()
}

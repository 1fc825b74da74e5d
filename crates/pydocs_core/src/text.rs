use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("valid version regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStatus {
    pub version: String,
    pub status: String,
}

/// Split a sidebar link text like `Python 3.12 (stable)` into version and status.
///
/// Text that does not match is kept whole as the version with an empty status.
pub fn parse_version_status(text: &str) -> VersionStatus {
    match VERSION_STATUS.captures(text) {
        Some(caps) => VersionStatus {
            version: caps["version"].to_string(),
            status: caps["status"].to_string(),
        },
        None => VersionStatus {
            version: text.to_string(),
            status: String::new(),
        },
    }
}

/// Drop repeated items, keeping the first occurrence of each in place.
pub fn dedupe_preserving_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn collapse_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

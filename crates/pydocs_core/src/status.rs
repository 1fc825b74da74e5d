use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status names a PEP card may carry for each single-letter index code.
///
/// The empty code stands for index rows without a status letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedStatusTable {
    by_code: BTreeMap<String, Vec<String>>,
}

impl ExpectedStatusTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        let by_code = pairs
            .into_iter()
            .map(|(code, names)| {
                (
                    code.to_string(),
                    names.iter().map(|name| name.to_string()).collect(),
                )
            })
            .collect();
        Self { by_code }
    }

    pub fn expected(&self, code: &str) -> &[String] {
        self.by_code.get(code).map_or(&[], Vec::as_slice)
    }

    pub fn is_expected(&self, code: &str, status: &str) -> bool {
        self.expected(code).iter().any(|name| name == status)
    }
}

impl Default for ExpectedStatusTable {
    fn default() -> Self {
        Self::from_pairs([
            ("A", &["Active", "Accepted"][..]),
            ("D", &["Deferred"][..]),
            ("F", &["Final"][..]),
            ("P", &["Provisional"][..]),
            ("R", &["Rejected"][..]),
            ("S", &["Superseded"][..]),
            ("W", &["Withdrawn"][..]),
            ("", &["Draft", "Active"][..]),
        ])
    }
}

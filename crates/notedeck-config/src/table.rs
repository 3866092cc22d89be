use std::env;

use serde::{Deserialize, Serialize};

/// Which closed tag set rows cycle through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkSet {
    /// marked, learned, reviewing, mastered, difficult, favorite
    #[default]
    Study,
    /// meaning, spelling, both
    Vocab,
}

impl MarkSet {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "study" => Some(MarkSet::Study),
            "vocab" => Some(MarkSet::Vocab),
            _ => None,
        }
    }
}

fn default_items_per_page() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub mark_set: MarkSet,
    /// Initial rows per page; only 10, 25, 50 and 100 are honored
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            mark_set: MarkSet::default(),
            items_per_page: default_items_per_page(),
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        let mark_set = env::var("NOTEDECK_MARK_SET")
            .ok()
            .and_then(|v| MarkSet::from_name(&v))
            .unwrap_or_default();

        let items_per_page = env::var("NOTEDECK_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| matches!(n, 10 | 25 | 50 | 100))
            .unwrap_or_else(default_items_per_page);

        Self {
            mark_set,
            items_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_set_from_name() {
        assert_eq!(MarkSet::from_name("Study"), Some(MarkSet::Study));
        assert_eq!(MarkSet::from_name(" vocab "), Some(MarkSet::Vocab));
        assert_eq!(MarkSet::from_name("other"), None);
    }
}

use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const UNMARKED_LABEL: &str = "No mark";
pub const UNMARKED_CLASS: &str = "hover:bg-muted/50";

/// Closed, ordered set of tags a row can carry.
///
/// The order of [`MarkingTag::ALL`] is the click cycle; "unmarked" sits
/// before the first tag and after the last.
pub trait MarkingTag:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const ALL: &'static [Self];

    /// Wire name, as sent to and received from the API
    fn key(&self) -> &'static str;

    /// Human readable label
    fn label(&self) -> &'static str;

    /// Presentation class for a row carrying this tag
    fn class(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.iter().copied().find(|tag| tag.key() == key)
    }
}

/// Next state in the cycle `unmarked -> ALL[0] -> ... -> ALL[n-1] -> unmarked`
pub fn next<M: MarkingTag>(current: Option<M>) -> Option<M> {
    match current {
        None => M::ALL.first().copied(),
        Some(tag) => M::ALL
            .iter()
            .position(|t| *t == tag)
            .and_then(|i| M::ALL.get(i + 1))
            .copied(),
    }
}

/// Number of clicks that bring a row back to where it started
pub fn cycle_len<M: MarkingTag>() -> usize {
    M::ALL.len() + 1
}

pub fn label<M: MarkingTag>(marking: Option<M>) -> &'static str {
    marking.map_or(UNMARKED_LABEL, |m| m.label())
}

pub fn class<M: MarkingTag>(marking: Option<M>) -> &'static str {
    marking.map_or(UNMARKED_CLASS, |m| m.class())
}

/// Tooltip shown on a row: what a click would turn it into
pub fn click_hint<M: MarkingTag>(marking: Option<M>) -> String {
    format!("Click to mark as {}", label(next(marking)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMark {
    Marked,
    Learned,
    Reviewing,
    Mastered,
    Difficult,
    Favorite,
}

impl MarkingTag for StudyMark {
    const ALL: &'static [Self] = &[
        StudyMark::Marked,
        StudyMark::Learned,
        StudyMark::Reviewing,
        StudyMark::Mastered,
        StudyMark::Difficult,
        StudyMark::Favorite,
    ];

    fn key(&self) -> &'static str {
        match self {
            StudyMark::Marked => "marked",
            StudyMark::Learned => "learned",
            StudyMark::Reviewing => "reviewing",
            StudyMark::Mastered => "mastered",
            StudyMark::Difficult => "difficult",
            StudyMark::Favorite => "favorite",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StudyMark::Marked => "• Marked",
            StudyMark::Learned => "✓ Learned",
            StudyMark::Reviewing => "↻ Reviewing",
            StudyMark::Mastered => "★ Mastered",
            StudyMark::Difficult => "! Difficult",
            StudyMark::Favorite => "♥ Favorite",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            StudyMark::Marked => {
                "bg-gray-100 hover:bg-gray-200 dark:bg-gray-500/20 dark:hover:bg-gray-500/30"
            }
            StudyMark::Learned => {
                "bg-green-100 hover:bg-green-200 dark:bg-green-500/20 dark:hover:bg-green-500/30"
            }
            StudyMark::Reviewing => {
                "bg-yellow-100 hover:bg-yellow-200 dark:bg-yellow-500/20 dark:hover:bg-yellow-500/30"
            }
            StudyMark::Mastered => {
                "bg-blue-100 hover:bg-blue-200 dark:bg-blue-500/20 dark:hover:bg-blue-500/30"
            }
            StudyMark::Difficult => {
                "bg-red-100 hover:bg-red-200 dark:bg-red-500/20 dark:hover:bg-red-500/30"
            }
            StudyMark::Favorite => {
                "bg-purple-100 hover:bg-purple-200 dark:bg-purple-500/20 dark:hover:bg-purple-500/30"
            }
        }
    }
}

/// Smaller vocabulary drill set: which side of a card the row is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabMark {
    Meaning,
    Spelling,
    Both,
}

impl MarkingTag for VocabMark {
    const ALL: &'static [Self] = &[VocabMark::Meaning, VocabMark::Spelling, VocabMark::Both];

    fn key(&self) -> &'static str {
        match self {
            VocabMark::Meaning => "meaning",
            VocabMark::Spelling => "spelling",
            VocabMark::Both => "both",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            VocabMark::Meaning => "Meaning",
            VocabMark::Spelling => "Spelling",
            VocabMark::Both => "Both",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            VocabMark::Meaning => {
                "bg-blue-100 hover:bg-blue-200 dark:bg-blue-500/20 dark:hover:bg-blue-500/30"
            }
            VocabMark::Spelling => {
                "bg-yellow-100 hover:bg-yellow-200 dark:bg-yellow-500/20 dark:hover:bg-yellow-500/30"
            }
            VocabMark::Both => {
                "bg-green-100 hover:bg-green-200 dark:bg-green-500/20 dark:hover:bg-green-500/30"
            }
        }
    }
}

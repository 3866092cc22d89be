use std::sync::LazyLock;

use notedeck_types::{FolderItem, Group, GroupStructure};
use regex::Regex;

static CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("category pattern is valid"));

/// Bracketed category in a group name: `"Kanji [N5]"` -> `"N5"`
pub fn category(name: &str) -> Option<&str> {
    CATEGORY
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Group name without its category
pub fn display_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name).trim()
}

fn count_folder_files(folder: &FolderItem) -> usize {
    folder.files.len() + folder.folders.iter().map(count_folder_files).sum::<usize>()
}

/// Number of files in the whole tree
pub fn count_files(structure: &GroupStructure) -> usize {
    structure.files.len()
        + structure
            .folders
            .iter()
            .map(count_folder_files)
            .sum::<usize>()
}

pub fn find_by_slug<'a>(groups: &'a [Group], slug: &str) -> Option<&'a Group> {
    groups.iter().find(|g| g.slug == slug)
}

/// Groups whose name contains `query`, ignoring case
pub fn search_groups<'a>(groups: &'a [Group], query: &str) -> Vec<&'a Group> {
    let query = query.to_lowercase();
    groups
        .iter()
        .filter(|g| g.name.to_lowercase().contains(&query))
        .collect()
}

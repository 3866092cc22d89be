use notedeck_core::groups;
use notedeck_core::{MarkingTag, PageItem, TableView};
use notedeck_types::{FolderItem, GroupStructure};

use crate::browse::GroupSummary;

const MAX_CELL_WIDTH: usize = 40;

fn truncate(cell: &str) -> String {
    let flat = cell.replace(['\r', '\n'], " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut out: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

pub fn render_page_items(items: &[PageItem], current: usize) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(page) if *page == current => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text table for one page: row number, marking, then the cells
pub fn render_table<M: MarkingTag>(view: &TableView<'_, M>, search_query: &str) -> String {
    let columns = view
        .rows
        .iter()
        .map(|r| r.cells.len())
        .chain([view.headers.len()])
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Vec<String>> = Vec::with_capacity(view.rows.len() + 1);

    let mut header = vec!["#".to_string(), "Mark".to_string()];
    header.extend((0..columns).map(|i| view.headers.get(i).map(|h| truncate(h)).unwrap_or_default()));
    lines.push(header);

    for row in &view.rows {
        let mut line = vec![
            (row.index + 1).to_string(),
            row.marking.map(|m| m.label().to_string()).unwrap_or_default(),
        ];
        line.extend((0..columns).map(|i| row.cells.get(i).map(|c| truncate(c)).unwrap_or_default()));
        lines.push(line);
    }

    let widths: Vec<usize> = (0..columns + 2)
        .map(|col| {
            lines
                .iter()
                .map(|l| l[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let text = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push(text.trim_end().to_string());
        if i == 0 {
            out.push(
                widths
                    .iter()
                    .map(|w| "-".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("-+-"),
            );
        }
    }

    if view.no_results {
        out.push(format!("No results found for \"{search_query}\""));
    }

    if view.filtered_count > 0 {
        let range = view.page.slice_range(view.filtered_count);
        let mut summary = format!(
            "Rows {}-{} of {}",
            range.start + 1,
            range.end,
            view.filtered_count
        );
        if view.filter_active {
            summary.push_str(&format!(" (filtered from {})", view.total_count));
        }
        out.push(summary);
        out.push(format!(
            "{}  {}  {}",
            if view.has_previous { "< prev" } else { "      " },
            render_page_items(&view.page_items, view.current_page),
            if view.has_next { "next >" } else { "" }
        ));
    }

    out.join("\n")
}

pub fn render_groups(summaries: &[GroupSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            let name = groups::display_name(&s.group.name);
            match groups::category(&s.group.name) {
                Some(category) => format!(
                    "{}  {} [{}]  {} files",
                    s.group.slug, name, category, s.file_count
                ),
                None => format!("{}  {}  {} files", s.group.slug, name, s.file_count),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_folder(folder: &FolderItem, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    out.push(format!("{indent}{}/", folder.name));
    for file in &folder.files {
        out.push(format!("{indent}  {}  ({})", file.name, file.path));
    }
    for sub in &folder.folders {
        render_folder(sub, depth + 1, out);
    }
}

pub fn render_tree(structure: &GroupStructure) -> String {
    let mut out = vec![format!(
        "{} ({} files)",
        structure.group,
        groups::count_files(structure)
    )];

    if structure.files.is_empty() && structure.folders.is_empty() {
        out.push("No files found in this group".to_string());
        return out.join("\n");
    }

    for file in &structure.files {
        out.push(format!("  {}  ({})", file.name, file.path));
    }
    for folder in &structure.folders {
        render_folder(folder, 1, &mut out);
    }
    out.join("\n")
}

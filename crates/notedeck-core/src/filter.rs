use std::collections::HashMap;

use crate::marking::MarkingTag;
use crate::table::Row;

/// Marking filter of the table view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<M> {
    All,
    Only(M),
}

impl<M> Default for Filter<M> {
    fn default() -> Self {
        Filter::All
    }
}

impl<M: MarkingTag> Filter<M> {
    /// Parse `"all"` or a tag's wire name
    pub fn parse(value: &str) -> Result<Self, ParseFilterError> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }

        M::from_key(value)
            .map(Filter::Only)
            .ok_or_else(|| ParseFilterError(value.to_string()))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    fn accepts(&self, marking: Option<&M>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(tag) => marking == Some(tag),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown marking filter: {0}")]
pub struct ParseFilterError(pub String);

fn matches_query(row: &Row, query: &str) -> bool {
    row.iter().any(|cell| cell.to_lowercase().contains(query))
}

/// Original indices of the rows that pass both the search and the marking filter.
///
/// `markings` is keyed by index into the full `rows` slice; that frame is used
/// for every row regardless of what the search kept. Order is preserved.
pub fn filter_indices<M: MarkingTag>(
    rows: &[Row],
    query: &str,
    filter: Filter<M>,
    markings: &HashMap<usize, M>,
) -> Vec<usize> {
    // Emptiness is judged on the trimmed query, matching on the query as typed
    let query = (!query.trim().is_empty()).then(|| query.to_lowercase());

    rows.iter()
        .enumerate()
        .filter(|(_, row)| query.as_deref().is_none_or(|q| matches_query(row, q)))
        .filter(|(index, _)| filter.accepts(markings.get(index)))
        .map(|(index, _)| index)
        .collect()
}

/// Like [`filter_indices`] but returns the rows themselves
pub fn filter_rows<'a, M: MarkingTag>(
    rows: &'a [Row],
    query: &str,
    filter: Filter<M>,
    markings: &HashMap<usize, M>,
) -> Vec<&'a Row> {
    filter_indices(rows, query, filter, markings)
        .into_iter()
        .map(|index| &rows[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marking::StudyMark;

    fn rows(cells: &[&[&str]]) -> Vec<Row> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn no_marks() -> HashMap<usize, StudyMark> {
        HashMap::new()
    }

    #[test]
    fn test_search_substring() {
        let data = rows(&[&["fox"], &["dog"]]);
        let result = filter_rows(&data, "fo", Filter::All, &no_marks());
        assert_eq!(result, vec![&data[0]]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_any_cell() {
        let data = rows(&[&["Neko", "Cat"], &["inu", "dog"], &["tori", "BIRD"]]);
        assert_eq!(filter_indices(&data, "cAT", Filter::All, &no_marks()), vec![0]);
        assert_eq!(filter_indices(&data, "bird", Filter::All, &no_marks()), vec![2]);
    }

    #[test]
    fn test_empty_or_blank_query_keeps_everything() {
        let data = rows(&[&["a"], &["b"], &["c"]]);
        assert_eq!(filter_indices(&data, "", Filter::All, &no_marks()), vec![0, 1, 2]);
        assert_eq!(filter_indices(&data, "   ", Filter::All, &no_marks()), vec![0, 1, 2]);
    }

    #[test]
    fn test_marking_filter_uses_unfiltered_index() {
        let data: Vec<Row> = (0..10).map(|i| vec![format!("row {i}")]).collect();
        let markings = HashMap::from([(2, StudyMark::Learned), (5, StudyMark::Mastered)]);
        let result = filter_indices(&data, "", Filter::Only(StudyMark::Learned), &markings);
        assert_eq!(result, vec![2]);
    }

    #[test]
    fn test_search_and_marking_filter_share_index_frame() {
        let data = rows(&[&["apple"], &["banana"], &["avocado"], &["cherry"]]);
        // Row 2 is the second search hit but is marked under its unfiltered index
        let markings = HashMap::from([(1, StudyMark::Learned), (2, StudyMark::Learned)]);
        let result = filter_indices(&data, "a", Filter::Only(StudyMark::Learned), &markings);
        assert_eq!(result, vec![1, 2]);

        let result = filter_indices(&data, "av", Filter::Only(StudyMark::Learned), &markings);
        assert_eq!(result, vec![2]);
    }

    #[test]
    fn test_unmarked_rows_dropped_under_specific_filter() {
        let data = rows(&[&["a"], &["b"]]);
        let result = filter_indices(&data, "", Filter::Only(StudyMark::Marked), &no_marks());
        assert!(result.is_empty());
    }

    #[test]
    fn test_ragged_rows_are_searchable() {
        let data = rows(&[&[], &["x", "y", "needle"]]);
        assert_eq!(filter_indices(&data, "needle", Filter::All, &no_marks()), vec![1]);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(Filter::<StudyMark>::parse("all").unwrap(), Filter::All);
        assert_eq!(
            Filter::<StudyMark>::parse("mastered").unwrap(),
            Filter::Only(StudyMark::Mastered)
        );
        assert!(Filter::<StudyMark>::parse("spelling").is_err());
    }
}

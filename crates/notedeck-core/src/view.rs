use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notedeck_types::{MarkingKey, NewMarking};

use crate::filter::{self, Filter};
use crate::marking::{self, MarkingTag};
use crate::paginate::{self, PageInfo, PageItem, PageSize};
use crate::store::{MarkingStore, StoreError};
use crate::table::Table;

/// Ephemeral {query, filter, page, page size} driving which rows are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<M> {
    pub search_query: String,
    pub filter: Filter<M>,
    pub current_page: usize,
    pub items_per_page: PageSize,
}

impl<M> Default for ViewState<M> {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filter: Filter::All,
            current_page: 1,
            items_per_page: PageSize::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Local marking cache of one file plus the path that mutates it remotely.
///
/// Clicks on the same row are serialized: the row's lock is held from reading
/// the current tag until the cache reflects the acknowledged remote write, so
/// the last click wins both locally and remotely.
pub struct RowMarker<M, S> {
    store: Arc<S>,
    group: String,
    file_path: String,
    markings: Mutex<HashMap<usize, M>>,
    row_locks: Mutex<HashMap<usize, Arc<tokio::sync::Mutex<()>>>>,
}

impl<M: MarkingTag, S: MarkingStore<M>> RowMarker<M, S> {
    pub fn new(store: Arc<S>, group: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            store,
            group: group.into(),
            file_path: file_path.into(),
            markings: Mutex::new(HashMap::new()),
            row_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<usize, M>> {
        self.markings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn marking(&self, row: usize) -> Option<M> {
        self.cache().get(&row).copied()
    }

    pub fn snapshot(&self) -> HashMap<usize, M> {
        self.cache().clone()
    }

    /// Replace the cache with the store's markings for this file
    pub async fn load(&self) -> Result<usize, StoreError> {
        let records = self.store.fetch(&self.group, &self.file_path).await?;
        let markings: HashMap<usize, M> = records
            .into_iter()
            .map(|record| (record.row_number, record.marking_type))
            .collect();

        let count = markings.len();
        *self.cache() = markings;
        Ok(count)
    }

    fn row_lock(&self, row: usize) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.row_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(row).or_default().clone()
    }

    /// Move `row` one step along the marking cycle.
    ///
    /// The cache is only written after the store acknowledged; on error it is
    /// left as it was.
    pub async fn advance(&self, row: usize) -> Result<Option<M>, StoreError> {
        let lock = self.row_lock(row);
        let _guard = lock.lock().await;

        let current = self.marking(row);
        let next = marking::next(current);

        match next {
            Some(tag) => {
                self.store
                    .save(NewMarking {
                        group_name: self.group.clone(),
                        file_path: self.file_path.clone(),
                        row_number: row,
                        marking_type: tag,
                        notes: None,
                    })
                    .await?;
                self.cache().insert(row, tag);
            }
            None => {
                self.store
                    .delete(MarkingKey {
                        group_name: self.group.clone(),
                        file_path: self.file_path.clone(),
                        row_number: row,
                    })
                    .await?;
                self.cache().remove(&row);
            }
        }

        tracing::debug!(
            "Row {} of {}/{}: {:?} -> {:?}",
            row,
            self.group,
            self.file_path,
            current,
            next
        );

        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow<'a, M> {
    /// Index into the unfiltered rows; the key used for markings
    pub index: usize,
    pub cells: &'a [String],
    pub marking: Option<M>,
    pub class: &'static str,
    pub hint: String,
}

/// Everything needed to draw the current page of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView<'a, M> {
    pub headers: &'a [String],
    pub rows: Vec<ViewRow<'a, M>>,
    pub page: PageInfo,
    pub current_page: usize,
    pub page_items: Vec<PageItem>,
    pub has_previous: bool,
    pub has_next: bool,
    pub filtered_count: usize,
    pub total_count: usize,
    /// A search or marking filter narrows the rows
    pub filter_active: bool,
    /// A search is active and nothing matched
    pub no_results: bool,
}

/// Table of one CSV file with its view state and marking cache
pub struct TableViewController<M, S> {
    table: Table,
    state: ViewState<M>,
    marker: Arc<RowMarker<M, S>>,
    loading_markings: bool,
}

impl<M: MarkingTag, S: MarkingStore<M>> TableViewController<M, S> {
    pub fn new(
        table: Table,
        group: impl Into<String>,
        file_path: impl Into<String>,
        store: Arc<S>,
    ) -> Self {
        Self {
            table,
            state: ViewState::default(),
            marker: Arc::new(RowMarker::new(store, group, file_path)),
            loading_markings: true,
        }
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.state.items_per_page = size;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> &ViewState<M> {
        &self.state
    }

    pub fn marker(&self) -> Arc<RowMarker<M, S>> {
        Arc::clone(&self.marker)
    }

    pub fn is_loading_markings(&self) -> bool {
        self.loading_markings
    }

    /// Fetch markings for the file. A failed load leaves rows unmarked.
    pub async fn load_markings(&mut self) -> usize {
        let count = match self.marker.load().await {
            Ok(count) => {
                tracing::info!(
                    "Loaded {} markings for {}/{}",
                    count,
                    self.marker.group(),
                    self.marker.file_path()
                );
                count
            }
            Err(e) => {
                tracing::warn!("Failed to load markings: {}", e);
                0
            }
        };

        self.loading_markings = false;
        self.clamp_page();
        count
    }

    pub fn on_search_change(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.state.current_page = 1;
    }

    pub fn on_filter_change(&mut self, filter: Filter<M>) {
        self.state.filter = filter;
        self.state.current_page = 1;
    }

    pub fn on_items_per_page_change(&mut self, size: PageSize) {
        self.state.items_per_page = size;
        self.state.current_page = 1;
    }

    /// Jump to `page`. Callers pass pages taken from [`TableView::page_items`].
    pub fn on_page_change(&mut self, page: usize) {
        self.state.current_page = page.max(1);
    }

    /// Advance the marking of the row at `row_index` (unfiltered index)
    pub async fn on_row_click(&mut self, row_index: usize) -> Result<Option<M>, ViewError> {
        if row_index >= self.table.rows.len() {
            return Err(ViewError::RowOutOfRange(row_index));
        }

        match self.marker.advance(row_index).await {
            Ok(next) => {
                self.clamp_page();
                Ok(next)
            }
            Err(e) => {
                tracing::error!("Failed to update marking of row {}: {}", row_index, e);
                Err(e.into())
            }
        }
    }

    pub fn filtered_indices(&self) -> Vec<usize> {
        filter::filter_indices(
            &self.table.rows,
            &self.state.search_query,
            self.state.filter,
            &self.marker.snapshot(),
        )
    }

    pub fn total_pages(&self) -> usize {
        paginate::paginate(
            self.filtered_indices().len(),
            1,
            self.state.items_per_page.get(),
        )
        .total_pages
    }

    /// Keep the current page within the pages the filtered rows fill
    fn clamp_page(&mut self) {
        let last = paginate::last_valid_page(self.total_pages());
        if self.state.current_page > last {
            self.state.current_page = last;
        }
    }

    pub fn view(&self) -> TableView<'_, M> {
        let markings = self.marker.snapshot();
        let filtered = filter::filter_indices(
            &self.table.rows,
            &self.state.search_query,
            self.state.filter,
            &markings,
        );

        let current_page = self.state.current_page;
        let page = paginate::paginate(
            filtered.len(),
            current_page,
            self.state.items_per_page.get(),
        );

        let rows = filtered[page.slice_range(filtered.len())]
            .iter()
            .map(|&index| {
                let tag = markings.get(&index).copied();
                ViewRow {
                    index,
                    cells: &self.table.rows[index],
                    marking: tag,
                    class: marking::class(tag),
                    hint: marking::click_hint(tag),
                }
            })
            .collect();

        TableView {
            headers: &self.table.header,
            rows,
            page,
            current_page,
            page_items: paginate::page_items(current_page, page.total_pages),
            has_previous: paginate::has_previous(current_page),
            has_next: paginate::has_next(current_page, page.total_pages),
            filtered_count: filtered.len(),
            total_count: self.table.rows.len(),
            filter_active: !self.state.search_query.is_empty() || !self.state.filter.is_all(),
            no_results: filtered.is_empty() && !self.state.search_query.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use notedeck_types::MarkingRecord;

    use super::*;
    use crate::marking::StudyMark;
    use crate::table;

    #[derive(Default)]
    struct FakeStore {
        remote: Mutex<HashMap<usize, StudyMark>>,
        fail_writes: AtomicBool,
        fail_fetch: bool,
        delay: Option<Duration>,
        saves: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl FakeStore {
        fn with_remote(markings: &[(usize, StudyMark)]) -> Self {
            Self {
                remote: Mutex::new(markings.iter().copied().collect()),
                ..Self::default()
            }
        }

        fn remote(&self, row: usize) -> Option<StudyMark> {
            self.remote.lock().unwrap().get(&row).copied()
        }
    }

    #[async_trait::async_trait]
    impl MarkingStore<StudyMark> for FakeStore {
        async fn fetch(
            &self,
            group: &str,
            file_path: &str,
        ) -> Result<Vec<MarkingRecord<StudyMark>>, StoreError> {
            if self.fail_fetch {
                return Err(StoreError::Network("connection refused".to_string()));
            }
            let remote = self.remote.lock().unwrap();
            Ok(remote
                .iter()
                .map(|(&row, &tag)| MarkingRecord {
                    id: None,
                    group_name: group.to_string(),
                    file_path: file_path.to_string(),
                    row_number: row,
                    marking_type: tag,
                    notes: None,
                    created_at: None,
                    updated_at: None,
                })
                .collect())
        }

        async fn save(&self, marking: NewMarking<StudyMark>) -> Result<(), StoreError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Status {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.remote
                .lock()
                .unwrap()
                .insert(marking.row_number, marking.marking_type);
            Ok(())
        }

        async fn delete(&self, key: MarkingKey) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unauthorized);
            }
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.remote.lock().unwrap().remove(&key.row_number);
            Ok(())
        }
    }

    fn numbered_table(n: usize) -> Table {
        let mut text = String::from("word,meaning\n");
        for i in 0..n {
            text.push_str(&format!("w{i},m{i}\n"));
        }
        table::parse(&text)
    }

    fn controller(
        n: usize,
        store: FakeStore,
    ) -> (TableViewController<StudyMark, FakeStore>, Arc<FakeStore>) {
        let store = Arc::new(store);
        let ctrl = TableViewController::new(numbered_table(n), "Kanji [JP]", "words.csv", store.clone());
        (ctrl, store)
    }

    #[tokio::test]
    async fn test_seven_clicks_return_to_unmarked() {
        let (mut ctrl, store) = controller(10, FakeStore::default());
        ctrl.load_markings().await;

        assert_eq!(ctrl.on_row_click(4).await.unwrap(), Some(StudyMark::Marked));
        assert_eq!(store.remote(4), Some(StudyMark::Marked));
        assert_eq!(ctrl.on_row_click(4).await.unwrap(), Some(StudyMark::Learned));

        for _ in 0..4 {
            assert!(ctrl.on_row_click(4).await.unwrap().is_some());
        }
        assert_eq!(ctrl.marker().marking(4), Some(StudyMark::Favorite));

        assert_eq!(ctrl.on_row_click(4).await.unwrap(), None);
        assert_eq!(ctrl.marker().marking(4), None);
        assert_eq!(store.remote(4), None);
        assert_eq!(store.saves.load(Ordering::SeqCst), 6);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_filter_by_loaded_marking() {
        let store = FakeStore::with_remote(&[(2, StudyMark::Learned), (5, StudyMark::Mastered)]);
        let (mut ctrl, _) = controller(10, store);
        assert!(ctrl.is_loading_markings());
        assert_eq!(ctrl.load_markings().await, 2);
        assert!(!ctrl.is_loading_markings());

        ctrl.on_filter_change(Filter::Only(StudyMark::Learned));
        let view = ctrl.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].index, 2);
        assert_eq!(view.rows[0].cells, ["w2", "m2"]);
        assert_eq!(view.rows[0].marking, Some(StudyMark::Learned));
        assert!(view.filter_active);
        assert_eq!(view.total_count, 10);
    }

    #[tokio::test]
    async fn test_failed_load_renders_unmarked() {
        let store = FakeStore {
            fail_fetch: true,
            ..FakeStore::default()
        };
        let (mut ctrl, _) = controller(3, store);
        assert_eq!(ctrl.load_markings().await, 0);

        let view = ctrl.view();
        assert_eq!(view.rows.len(), 3);
        assert!(view.rows.iter().all(|r| r.marking.is_none()));
        assert_eq!(view.rows[0].hint, "Click to mark as • Marked");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_cache_unchanged() {
        let store = FakeStore::with_remote(&[(1, StudyMark::Reviewing)]);
        let (mut ctrl, store) = controller(3, store);
        ctrl.load_markings().await;
        store.fail_writes.store(true, Ordering::SeqCst);

        let result = ctrl.on_row_click(1).await;
        assert!(matches!(result, Err(ViewError::Store(StoreError::Status { status: 500, .. }))));
        assert_eq!(ctrl.marker().marking(1), Some(StudyMark::Reviewing));

        let result = ctrl.on_row_click(0).await;
        assert!(result.is_err());
        assert_eq!(ctrl.marker().marking(0), None);
    }

    #[tokio::test]
    async fn test_click_out_of_range() {
        let (mut ctrl, store) = controller(2, FakeStore::default());
        assert!(matches!(ctrl.on_row_click(2).await, Err(ViewError::RowOutOfRange(2))));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_same_row_clicks_are_serialized() {
        let store = Arc::new(FakeStore {
            delay: Some(Duration::from_millis(20)),
            ..FakeStore::default()
        });
        let marker = Arc::new(RowMarker::new(store.clone(), "g", "f.csv"));

        let (first, second) = tokio::join!(marker.advance(4), marker.advance(4));
        assert_eq!(first.unwrap(), Some(StudyMark::Marked));
        assert_eq!(second.unwrap(), Some(StudyMark::Learned));
        assert_eq!(marker.marking(4), Some(StudyMark::Learned));
        assert_eq!(store.remote(4), Some(StudyMark::Learned));
    }

    #[tokio::test]
    async fn test_different_rows_advance_independently() {
        let store = Arc::new(FakeStore {
            delay: Some(Duration::from_millis(10)),
            ..FakeStore::default()
        });
        let marker = Arc::new(RowMarker::new(store.clone(), "g", "f.csv"));

        let (a, b) = tokio::join!(marker.advance(0), marker.advance(1));
        assert_eq!(a.unwrap(), Some(StudyMark::Marked));
        assert_eq!(b.unwrap(), Some(StudyMark::Marked));
    }

    #[test]
    fn test_state_changes_reset_page() {
        let (mut ctrl, _) = controller(100, FakeStore::default());

        ctrl.on_page_change(4);
        ctrl.on_search_change("w1");
        assert_eq!(ctrl.state().current_page, 1);

        ctrl.on_page_change(2);
        ctrl.on_filter_change(Filter::Only(StudyMark::Difficult));
        assert_eq!(ctrl.state().current_page, 1);

        ctrl.on_page_change(3);
        ctrl.on_items_per_page_change(PageSize::try_from(25).unwrap());
        assert_eq!(ctrl.state().current_page, 1);
        assert_eq!(ctrl.state().items_per_page.get(), 25);
    }

    #[test]
    fn test_pagination_of_view() {
        let (mut ctrl, _) = controller(25, FakeStore::default());
        ctrl.on_page_change(3);

        let view = ctrl.view();
        assert_eq!(view.page.start_index, 20);
        assert_eq!(view.page.end_index, 30);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows[0].index, 20);
        assert!(view.has_previous);
        assert!(!view.has_next);
        assert!(!view.filter_active);
    }

    #[test]
    fn test_page_past_end_is_empty_not_error() {
        let (mut ctrl, _) = controller(5, FakeStore::default());
        ctrl.on_page_change(9);
        let view = ctrl.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.filtered_count, 5);
    }

    #[test]
    fn test_huge_page_renders_empty() {
        let (mut ctrl, _) = controller(5, FakeStore::default());
        ctrl.on_page_change(usize::MAX / 2);
        let view = ctrl.view();
        assert!(view.rows.is_empty());
        assert!(!view.has_next);
        assert_eq!(view.page_items.first(), Some(&PageItem::Page(1)));
    }

    #[test]
    fn test_search_keeps_unfiltered_indices() {
        let (mut ctrl, _) = controller(30, FakeStore::default());
        ctrl.on_search_change("w2");
        let view = ctrl.view();
        let indices: Vec<usize> = view.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 20, 21, 22, 23, 24, 25, 26, 27, 28]);
        assert_eq!(view.filtered_count, 11);
    }

    #[test]
    fn test_no_results_flag() {
        let (mut ctrl, _) = controller(3, FakeStore::default());
        ctrl.on_search_change("zzz");
        let view = ctrl.view();
        assert!(view.no_results);
        assert_eq!(view.page.total_pages, 0);
        assert!(view.page_items.is_empty());
    }

    #[tokio::test]
    async fn test_unmarking_under_filter_clamps_page() {
        let marks: Vec<(usize, StudyMark)> = (0..11).map(|i| (i, StudyMark::Favorite)).collect();
        let (mut ctrl, _) = controller(11, FakeStore::with_remote(&marks));
        ctrl.load_markings().await;
        ctrl.on_filter_change(Filter::Only(StudyMark::Favorite));
        ctrl.on_page_change(2);
        assert_eq!(ctrl.view().rows.len(), 1);

        // Favorite wraps to unmarked, dropping the row out of the filter
        assert_eq!(ctrl.on_row_click(10).await.unwrap(), None);
        assert_eq!(ctrl.state().current_page, 1);
        assert_eq!(ctrl.view().rows.len(), 10);
    }
}

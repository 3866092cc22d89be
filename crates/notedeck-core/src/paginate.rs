use std::ops::Range;

/// Slice boundaries for one page.
///
/// `end_index` is not clamped to the item count; use [`PageInfo::slice_range`]
/// to get the range that is actually rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageInfo {
    pub fn slice_range(&self, total_items: usize) -> Range<usize> {
        let end = self.end_index.min(total_items);
        self.start_index.min(end)..end
    }
}

/// Page math without clamping `current_page`; a page past the end yields an
/// empty slice.
pub fn paginate(total_items: usize, current_page: usize, items_per_page: usize) -> PageInfo {
    let per_page = items_per_page.max(1);
    let start_index = current_page.saturating_sub(1).saturating_mul(per_page);

    PageInfo {
        total_pages: total_items.div_ceil(per_page),
        start_index,
        end_index: start_index.saturating_add(per_page),
    }
}

/// Highest page the view may sit on
pub fn last_valid_page(total_pages: usize) -> usize {
    total_pages.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page buttons: first, last, and current +/- 1, with one ellipsis per gap
pub fn page_items(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    let mut items = Vec::new();

    for page in 1..=total_pages {
        let near_current =
            page.saturating_add(1) >= current_page && page <= current_page.saturating_add(1);
        if page == 1 || page == total_pages || near_current {
            items.push(PageItem::Page(page));
        } else if page.saturating_add(2) == current_page
            || page == current_page.saturating_add(2)
        {
            items.push(PageItem::Ellipsis);
        }
    }

    items
}

pub fn has_previous(current_page: usize) -> bool {
    current_page > 1
}

pub fn has_next(current_page: usize, total_pages: usize) -> bool {
    current_page < total_pages
}

/// Rows per page; one of [`PageSize::OPTIONS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageSize(usize);

impl PageSize {
    pub const OPTIONS: [usize; 4] = [10, 25, 50, 100];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported page size {0}, expected one of 10, 25, 50, 100")]
pub struct PageSizeError(pub usize);

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if Self::OPTIONS.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(PageSizeError(value))
        }
    }
}

pub mod filter;
pub mod groups;
pub mod markdown;
pub mod marking;
pub mod paginate;
pub mod store;
pub mod table;
pub mod view;

pub use filter::Filter;
pub use marking::{MarkingTag, StudyMark, VocabMark};
pub use paginate::{PageInfo, PageItem, PageSize};
pub use store::{MarkingStore, StoreError};
pub use table::{Row, Table};
pub use view::{RowMarker, TableView, TableViewController, ViewError, ViewRow, ViewState};

use notedeck_types::{MarkingKey, MarkingRecord, NewMarking};

use crate::marking::MarkingTag;

/// Remote owner of per-row markings, keyed by (group, file, row)
#[async_trait::async_trait]
pub trait MarkingStore<M: MarkingTag>: Send + Sync {
    /// All markings of one file. Records with an unknown tag are dropped by the
    /// implementation rather than failing the whole call.
    async fn fetch(&self, group: &str, file_path: &str)
    -> Result<Vec<MarkingRecord<M>>, StoreError>;

    /// Idempotent upsert
    async fn save(&self, marking: NewMarking<M>) -> Result<(), StoreError>;

    async fn delete(&self, key: MarkingKey) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

mod client;
mod credentials;
mod error;
mod markings;

pub use client::ApiClient;
pub use credentials::{CredentialProvider, StaticToken, TokenFile};
pub use error::ApiError;
pub use markings::{HttpMarkingStore, decode_markings};

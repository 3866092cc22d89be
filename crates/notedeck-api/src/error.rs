use notedeck_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Token rejected by server")]
    Unauthorized,

    #[error("Login failed")]
    LoginFailed,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Token storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated | ApiError::Unauthorized | ApiError::LoginFailed => {
                StoreError::Unauthorized
            }
            ApiError::Status { status, message } => StoreError::Status { status, message },
            ApiError::Decode(message) => StoreError::Decode(message),
            ApiError::Network(e) => StoreError::Network(e.to_string()),
            ApiError::Io(e) => StoreError::Network(e.to_string()),
        }
    }
}

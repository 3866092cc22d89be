use std::env;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::table::TableConfig;

pub mod api;
pub mod table;

pub use table::MarkSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub table: TableConfig,

    /// Log filter used when `RUST_LOG` is unset, from `NOTEDECK_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Command output goes to stdout, so routine progress stays below this level
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            table: TableConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Build config from the process environment, reading `.env` first if present
    pub fn new() -> Self {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let log_filter = env::var("NOTEDECK_LOG").unwrap_or_else(|_| default_log_filter());

        Config {
            api: ApiConfig::new(),
            table: TableConfig::new(),
            log_filter,
        }
    }
}

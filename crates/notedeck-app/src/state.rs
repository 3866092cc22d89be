use std::sync::Arc;

use notedeck_api::{ApiClient, TokenFile};
use notedeck_config::Config;

pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let credentials = Arc::new(TokenFile::new(config.api.token_file.clone()));
        let client = ApiClient::from_config(&config.api, credentials)?;

        Ok(Self { config, client })
    }
}

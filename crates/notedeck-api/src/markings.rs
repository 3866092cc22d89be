use std::marker::PhantomData;

use notedeck_core::{MarkingStore, MarkingTag, StoreError};
use notedeck_types::{MarkingKey, MarkingRecord, NewMarking};
use reqwest::Method;
use serde::Deserialize;

use crate::ApiClient;

#[derive(Deserialize)]
struct MarkingsResponse {
    #[serde(default)]
    markings: Vec<serde_json::Value>,
}

/// Decode marking records one by one, dropping those that do not fit `M`
pub fn decode_markings<M: MarkingTag>(values: Vec<serde_json::Value>) -> Vec<MarkingRecord<M>> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<MarkingRecord<M>>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping invalid marking record: {}", e);
                None
            }
        })
        .collect()
}

/// [`MarkingStore`] backed by `/api/markings`
pub struct HttpMarkingStore<M> {
    client: ApiClient,
    _tag: PhantomData<fn() -> M>,
}

impl<M> HttpMarkingStore<M> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _tag: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<M: MarkingTag> MarkingStore<M> for HttpMarkingStore<M> {
    async fn fetch(
        &self,
        group: &str,
        file_path: &str,
    ) -> Result<Vec<MarkingRecord<M>>, StoreError> {
        let path = format!(
            "/api/markings/{}/{}",
            urlencoding::encode(group),
            urlencoding::encode(file_path)
        );
        let response: MarkingsResponse = self.client.get_json(&path).await?;
        Ok(decode_markings(response.markings))
    }

    async fn save(&self, marking: NewMarking<M>) -> Result<(), StoreError> {
        self.client
            .send_json(Method::POST, "/api/markings", &marking)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: MarkingKey) -> Result<(), StoreError> {
        self.client
            .send_json(Method::DELETE, "/api/markings", &key)
            .await?;
        Ok(())
    }
}

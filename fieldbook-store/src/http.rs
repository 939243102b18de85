//! HTTP transport for the hosted record store.

use crate::chat::FunctionInvoker;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::protocol::{
    DeletePayload, FetchParams, FetchResponse, FunctionResponse, GetResponse, ProjectionParams,
    RecordsPayload, WriteResponse,
};
use crate::transport::RecordTransport;
use async_trait::async_trait;
use fieldbook_model::RecordId;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const PROJECT_HEADER: &str = "X-Project-Id";

/// [`RecordTransport`] over the store's REST surface.
///
/// Every call is a single JSON request. Non-2xx replies become
/// [`StoreError::BackendRejected`] carrying the response body.
pub struct HttpTransport {
    config: StoreConfig,
    client: Client,
}

impl HttpTransport {
    /// Builds a transport from validated settings.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/tables/{table}/records", self.config.api_root())
    }

    async fn send<B, R>(&self, method: Method, url: String, body: &B) -> StoreResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!(%method, %url, "store request");

        let response = self
            .client
            .request(method, &url)
            .header(PROJECT_HEADER, &self.config.project_id)
            .bearer_auth(&self.config.public_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%url, %status, "store rejected request");
            let message = if body.trim().is_empty() {
                format!("store returned {status}")
            } else {
                body
            };
            return Err(StoreError::BackendRejected { message });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_records(&self, table: &str, params: &FetchParams) -> StoreResult<FetchResponse> {
        let url = format!("{}/query", self.records_url(table));
        self.send(Method::POST, url, params).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &ProjectionParams,
    ) -> StoreResult<GetResponse> {
        let url = format!("{}/{id}/get", self.records_url(table));
        self.send(Method::POST, url, params).await
    }

    async fn create_records(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> StoreResult<WriteResponse> {
        self.send(Method::POST, self.records_url(table), payload).await
    }

    async fn update_records(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> StoreResult<WriteResponse> {
        self.send(Method::PUT, self.records_url(table), payload).await
    }

    async fn delete_records(
        &self,
        table: &str,
        payload: &DeletePayload,
    ) -> StoreResult<WriteResponse> {
        self.send(Method::DELETE, self.records_url(table), payload).await
    }
}

#[async_trait]
impl FunctionInvoker for HttpTransport {
    async fn invoke(&self, function: &str, body: &Value) -> StoreResult<FunctionResponse> {
        let url = format!("{}/functions/{function}/invoke", self.config.api_root());
        self.send(Method::POST, url, body).await
    }
}

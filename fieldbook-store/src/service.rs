//! Generic record service.
//!
//! One [`RecordService`] per entity kind composes the entity's
//! [`RecordMapping`] with the shared transport and the batch aggregator.
//!
//! # Failure behaviour
//!
//! | operation          | transport error | backend rejection        | empty result           |
//! |--------------------|-----------------|--------------------------|------------------------|
//! | `get_all`          | logged, `[]`    | logged, `[]`             | `[]`                   |
//! | `try_get_all`/`find` | propagated    | `BackendRejected`        | `[]`                   |
//! | `get_by_id`        | propagated      | `RecordNotFound`         | `RecordNotFound`       |
//! | `create`/`update`  | propagated      | `BackendRejected`        | `WriteFailed`          |
//! | `delete`           | propagated      | `BackendRejected`        | `false`                |
//!
//! Concurrent writes to the same row are not coordinated; whichever lands
//! last wins.

use crate::batch::BatchSummary;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::protocol::{
    DeletePayload, FetchParams, ProjectionParams, RecordsPayload, WhereClause, WriteResponse,
};
use crate::provider::TransportProvider;
use crate::transport::RecordTransport;
use fieldbook_model::{RawRecord, RecordId, RecordMapping};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Data access for one entity kind.
pub struct RecordService<E> {
    provider: Arc<TransportProvider>,
    page_limit: Option<u32>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RecordService<E> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            page_limit: self.page_limit,
            _entity: PhantomData,
        }
    }
}

enum WriteKind {
    Create,
    Update,
}

impl<E: RecordMapping> RecordService<E> {
    /// A service sharing `provider` with other services.
    pub fn new(provider: Arc<TransportProvider>) -> Self {
        Self {
            provider,
            page_limit: None,
            _entity: PhantomData,
        }
    }

    /// A service over an already-built transport.
    pub fn with_transport(transport: Arc<dyn RecordTransport>) -> Self {
        Self::new(Arc::new(TransportProvider::ready(transport)))
    }

    /// A service over the hosted store, connected lazily.
    pub fn from_config(config: StoreConfig) -> Self {
        let limit = config.fetch_limit;
        Self::new(Arc::new(TransportProvider::from_config(config))).with_page_limit(limit)
    }

    /// Overrides the page size for tables whose reads are paged.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn provider(&self) -> &Arc<TransportProvider> {
        &self.provider
    }

    fn table() -> &'static str {
        E::schema().table
    }

    /// The read request issued by [`get_all`](Self::get_all).
    pub fn fetch_params(&self) -> FetchParams {
        let params = FetchParams::for_schema(E::schema());
        match self.page_limit {
            Some(limit) => params.with_page_limit(limit),
            None => params,
        }
    }

    /// Every row of the table, in the table's fixed order.
    ///
    /// Never fails: a transport error or backend rejection is logged and
    /// yields an empty list. Use [`try_get_all`](Self::try_get_all) to see
    /// the failure.
    pub async fn get_all(&self) -> Vec<E> {
        match self.try_get_all().await {
            Ok(entities) => entities,
            Err(e) => {
                error!(table = Self::table(), error = %e, "failed to fetch {} records", E::KIND);
                Vec::new()
            }
        }
    }

    /// Like [`get_all`](Self::get_all), but propagates failures.
    pub async fn try_get_all(&self) -> StoreResult<Vec<E>> {
        self.fetch(self.fetch_params()).await
    }

    /// Rows matching every clause in `filters`, in the table's fixed order.
    pub async fn find(&self, filters: Vec<WhereClause>) -> StoreResult<Vec<E>> {
        self.fetch(self.fetch_params().with_filters(filters)).await
    }

    async fn fetch(&self, params: FetchParams) -> StoreResult<Vec<E>> {
        let transport = self.provider.get().await?;
        let response = transport.fetch_records(Self::table(), &params).await?;
        if !response.success {
            return Err(StoreError::rejected(
                response.message,
                &format!("failed to fetch {} records", E::KIND),
            ));
        }
        let records = response.data.unwrap_or_default();
        debug!(table = Self::table(), count = records.len(), "fetched records");
        Ok(records.iter().map(E::from_record).collect())
    }

    /// One row by identifier.
    pub async fn get_by_id(&self, id: RecordId) -> StoreResult<E> {
        let not_found = || StoreError::RecordNotFound {
            kind: E::KIND,
            key: id.to_string(),
        };

        let transport = self.provider.get().await?;
        let params = ProjectionParams::for_schema(E::schema());
        let response = match transport.get_record_by_id(Self::table(), id, &params).await {
            Ok(response) => response,
            Err(StoreError::BackendRejected { message }) => {
                warn!(table = Self::table(), %id, reason = %message, "lookup rejected");
                return Err(not_found());
            }
            Err(e) => return Err(e),
        };

        if !response.success {
            warn!(
                table = Self::table(),
                %id,
                reason = response.message.as_deref().unwrap_or_default(),
                "lookup rejected"
            );
            return Err(not_found());
        }
        response
            .data
            .map(|raw| E::from_record(&raw))
            .ok_or_else(not_found)
    }

    /// Creates one row and returns it as stored.
    ///
    /// A success that echoes no stored row is a [`StoreError::WriteFailed`];
    /// the store-assigned `Id` would otherwise be lost.
    pub async fn create(&self, entity: &E) -> StoreResult<E> {
        self.create_many(std::slice::from_ref(entity))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::WriteFailed(format!("no {} returned from create", E::KIND)))
    }

    /// Creates several rows in one batch.
    ///
    /// Returns the rows that were stored; fails only when none were.
    pub async fn create_many(&self, entities: &[E]) -> StoreResult<Vec<E>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        let records = entities.iter().map(E::to_create_record).collect();
        self.write(WriteKind::Create, records)
            .await?
            .into_created::<E>()
    }

    /// Updates one row. `true` once the store accepts it.
    pub async fn update(&self, id: RecordId, entity: &E) -> StoreResult<bool> {
        self.update_batch(vec![entity.to_update_record(id)])
            .await?
            .updated::<E>()
    }

    /// Updates one row and returns it as stored.
    pub async fn update_returning(&self, id: RecordId, entity: &E) -> StoreResult<E> {
        let summary = self.update_batch(vec![entity.to_update_record(id)]).await?;
        summary.updated::<E>()?;
        Ok(summary
            .successes
            .first()
            .and_then(Option::as_ref)
            .map(E::from_record)
            .unwrap_or_else(|| E::from_record(&entity.to_update_record(id))))
    }

    /// Updates several rows in one batch. `true` if any was updated.
    pub async fn update_many(&self, updates: &[(RecordId, E)]) -> StoreResult<bool> {
        if updates.is_empty() {
            return Ok(false);
        }
        let records = updates
            .iter()
            .map(|(id, entity)| entity.to_update_record(*id))
            .collect();
        self.update_batch(records).await?.updated::<E>()
    }

    async fn update_batch(&self, records: Vec<RawRecord>) -> StoreResult<BatchSummary> {
        self.write(WriteKind::Update, records).await
    }

    /// Deletes one row. `false` when the store reports nothing deleted.
    pub async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        self.delete_many(&[id]).await
    }

    /// Deletes several rows in one batch. `true` if any was deleted.
    pub async fn delete_many(&self, ids: &[RecordId]) -> StoreResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }
        let transport = self.provider.get().await?;
        let payload = DeletePayload {
            record_ids: ids.to_vec(),
        };
        let response = transport.delete_records(Self::table(), &payload).await?;
        let summary = Self::summarize(response, "delete")?;
        Ok(summary.deleted())
    }

    async fn write(&self, kind: WriteKind, records: Vec<RawRecord>) -> StoreResult<BatchSummary> {
        for record in &records {
            E::schema().check_payload(record)?;
        }
        let transport = self.provider.get().await?;
        let payload = RecordsPayload { records };
        let (response, verb) = match kind {
            WriteKind::Create => (transport.create_records(Self::table(), &payload).await?, "create"),
            WriteKind::Update => (transport.update_records(Self::table(), &payload).await?, "update"),
        };
        Self::summarize(response, verb)
    }

    fn summarize(response: WriteResponse, verb: &str) -> StoreResult<BatchSummary> {
        if !response.success {
            error!(table = Self::table(), reason = ?response.message, "{verb} rejected");
            return Err(StoreError::rejected(
                response.message,
                &format!("failed to {verb} {}", E::KIND),
            ));
        }
        let results = response.results.unwrap_or_default();
        if results.is_empty() {
            warn!(table = Self::table(), "no results returned from {verb}");
        }
        Ok(BatchSummary::aggregate(Self::table(), results))
    }
}

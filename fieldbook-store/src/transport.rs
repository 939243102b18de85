//! Transport abstraction.
//!
//! The record store is reached through an opaque capability exposing five
//! table operations. [`crate::http::HttpTransport`] talks to the hosted store;
//! [`mock::MockTransport`] stands in for it in tests.

use crate::error::StoreResult;
use crate::protocol::{
    DeletePayload, FetchParams, FetchResponse, GetResponse, ProjectionParams, RecordsPayload,
    WriteResponse,
};
use async_trait::async_trait;
use fieldbook_model::RecordId;

/// The record store's table operations.
///
/// An `Err` means the call itself failed (unreachable store, undecodable
/// reply). A reply with `success: false` is a backend rejection and is
/// returned as `Ok` for the caller to interpret.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// Returns a short name for log lines.
    fn name(&self) -> &'static str;

    /// Reads the rows of `table` matching `params`.
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> StoreResult<FetchResponse>;

    /// Reads one row of `table`.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &ProjectionParams,
    ) -> StoreResult<GetResponse>;

    /// Inserts a batch of rows.
    async fn create_records(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> StoreResult<WriteResponse>;

    /// Updates a batch of rows, each addressed by its `Id` column.
    async fn update_records(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> StoreResult<WriteResponse>;

    /// Deletes a batch of rows by identifier.
    async fn delete_records(
        &self,
        table: &str,
        payload: &DeletePayload,
    ) -> StoreResult<WriteResponse>;
}

/// In-memory transports for testing.
pub mod mock {
    use super::*;
    use crate::chat::FunctionInvoker;
    use crate::error::StoreError;
    use crate::protocol::{FunctionResponse, RecordResult};
    use fieldbook_model::{RawRecord, ID_FIELD};
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// A call observed by [`MockTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        Fetch {
            table: String,
            params: FetchParams,
        },
        Get {
            table: String,
            id: RecordId,
            params: ProjectionParams,
        },
        Create {
            table: String,
            payload: RecordsPayload,
        },
        Update {
            table: String,
            payload: RecordsPayload,
        },
        Delete {
            table: String,
            payload: DeletePayload,
        },
    }

    /// A scripted reply: the response, or the message of a transport failure.
    type Scripted<T> = Result<T, String>;

    #[derive(Default)]
    struct MockState {
        calls: Vec<RecordedCall>,
        unavailable: Option<String>,
        fetch: VecDeque<Scripted<FetchResponse>>,
        get: VecDeque<Scripted<GetResponse>>,
        create: VecDeque<Scripted<WriteResponse>>,
        update: VecDeque<Scripted<WriteResponse>>,
        delete: VecDeque<Scripted<WriteResponse>>,
        next_id: i64,
    }

    /// A scriptable, recording [`RecordTransport`].
    ///
    /// Queued replies are consumed in order per operation. Once a queue is
    /// empty the mock falls back to a well-behaved store: fetches return no
    /// rows, lookups find nothing, and every written record succeeds (creates
    /// are echoed back with a fresh `Id`).
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Arc<Mutex<MockState>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Makes every subsequent call fail as if the store were unreachable.
        pub fn set_unavailable(&self, message: impl Into<String>) {
            self.state().unavailable = Some(message.into());
        }

        pub fn queue_fetch(&self, response: FetchResponse) {
            self.state().fetch.push_back(Ok(response));
        }

        /// Makes the next fetch fail at the transport level.
        pub fn queue_fetch_error(&self, message: impl Into<String>) {
            self.state().fetch.push_back(Err(message.into()));
        }

        pub fn queue_get(&self, response: GetResponse) {
            self.state().get.push_back(Ok(response));
        }

        pub fn queue_get_error(&self, message: impl Into<String>) {
            self.state().get.push_back(Err(message.into()));
        }

        pub fn queue_create(&self, response: WriteResponse) {
            self.state().create.push_back(Ok(response));
        }

        pub fn queue_update(&self, response: WriteResponse) {
            self.state().update.push_back(Ok(response));
        }

        pub fn queue_delete(&self, response: WriteResponse) {
            self.state().delete.push_back(Ok(response));
        }

        /// Every call made so far, oldest first.
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.state().calls.clone()
        }

        pub fn call_count(&self) -> usize {
            self.state().calls.len()
        }

        /// The most recent call, if any.
        pub fn last_call(&self) -> Option<RecordedCall> {
            self.state().calls.last().cloned()
        }

        fn record(&self, call: RecordedCall) -> StoreResult<()> {
            let mut state = self.state();
            state.calls.push(call);
            match &state.unavailable {
                Some(message) => Err(StoreError::TransportUnavailable(message.clone())),
                None => Ok(()),
            }
        }

        fn take<T>(
            &self,
            pick: impl FnOnce(&mut MockState) -> &mut VecDeque<Scripted<T>>,
        ) -> Option<StoreResult<T>> {
            let mut state = self.state();
            pick(&mut *state)
                .pop_front()
                .map(|scripted| scripted.map_err(StoreError::TransportUnavailable))
        }

        fn echo_created(&self, records: &[RawRecord]) -> WriteResponse {
            let mut state = self.state();
            let results = records
                .iter()
                .map(|record| {
                    state.next_id += 1;
                    let mut data = record.clone();
                    data.insert(ID_FIELD.to_string(), Value::from(state.next_id));
                    RecordResult::succeeded(Some(data))
                })
                .collect();
            WriteResponse::ok(results)
        }
    }

    #[async_trait]
    impl RecordTransport for MockTransport {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn fetch_records(
            &self,
            table: &str,
            params: &FetchParams,
        ) -> StoreResult<FetchResponse> {
            self.record(RecordedCall::Fetch {
                table: table.to_string(),
                params: params.clone(),
            })?;
            self.take(|s| &mut s.fetch)
                .unwrap_or_else(|| Ok(FetchResponse::ok(Vec::new())))
        }

        async fn get_record_by_id(
            &self,
            table: &str,
            id: RecordId,
            params: &ProjectionParams,
        ) -> StoreResult<GetResponse> {
            self.record(RecordedCall::Get {
                table: table.to_string(),
                id,
                params: params.clone(),
            })?;
            self.take(|s| &mut s.get)
                .unwrap_or_else(|| Ok(GetResponse::ok(None)))
        }

        async fn create_records(
            &self,
            table: &str,
            payload: &RecordsPayload,
        ) -> StoreResult<WriteResponse> {
            self.record(RecordedCall::Create {
                table: table.to_string(),
                payload: payload.clone(),
            })?;
            self.take(|s| &mut s.create)
                .unwrap_or_else(|| Ok(self.echo_created(&payload.records)))
        }

        async fn update_records(
            &self,
            table: &str,
            payload: &RecordsPayload,
        ) -> StoreResult<WriteResponse> {
            self.record(RecordedCall::Update {
                table: table.to_string(),
                payload: payload.clone(),
            })?;
            self.take(|s| &mut s.update).unwrap_or_else(|| {
                Ok(WriteResponse::ok(
                    payload
                        .records
                        .iter()
                        .map(|r| RecordResult::succeeded(Some(r.clone())))
                        .collect(),
                ))
            })
        }

        async fn delete_records(
            &self,
            table: &str,
            payload: &DeletePayload,
        ) -> StoreResult<WriteResponse> {
            self.record(RecordedCall::Delete {
                table: table.to_string(),
                payload: payload.clone(),
            })?;
            self.take(|s| &mut s.delete).unwrap_or_else(|| {
                Ok(WriteResponse::ok(
                    payload
                        .record_ids
                        .iter()
                        .map(|_| RecordResult::succeeded(None))
                        .collect(),
                ))
            })
        }
    }

    #[derive(Default)]
    struct InvokerState {
        calls: Vec<(String, Value)>,
        replies: VecDeque<Scripted<FunctionResponse>>,
    }

    /// A scriptable [`FunctionInvoker`] that records each invocation.
    #[derive(Clone, Default)]
    pub struct MockInvoker {
        state: Arc<Mutex<InvokerState>>,
    }

    impl MockInvoker {
        pub fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> MutexGuard<'_, InvokerState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn queue_reply(&self, response: FunctionResponse) {
            self.state().replies.push_back(Ok(response));
        }

        /// Makes the next invocation fail at the transport level.
        pub fn queue_error(&self, message: impl Into<String>) {
            self.state().replies.push_back(Err(message.into()));
        }

        /// `(function, body)` for every invocation so far.
        pub fn calls(&self) -> Vec<(String, Value)> {
            self.state().calls.clone()
        }
    }

    #[async_trait]
    impl FunctionInvoker for MockInvoker {
        async fn invoke(&self, function: &str, body: &Value) -> StoreResult<FunctionResponse> {
            let mut state = self.state();
            state.calls.push((function.to_string(), body.clone()));
            match state.replies.pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(StoreError::TransportUnavailable(message)),
                None => Ok(FunctionResponse {
                    success: false,
                    data: None,
                    message: Some("no reply scripted".to_string()),
                }),
            }
        }
    }
}

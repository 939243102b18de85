//! Record-store access for Fieldbook.
//!
//! Sits between application logic and the hosted, schema-less record store.
//! Reads go out through a [`RecordTransport`] and come back as typed
//! entities via each entity's [`fieldbook_model::RecordMapping`]; writes go
//! out as batches whose per-record outcomes are folded by [`BatchSummary`].
//!
//! ## Components
//!
//! - **Transport**: the store's five table operations ([`HttpTransport`],
//!   or [`transport::mock::MockTransport`] in tests)
//! - **Provider**: builds the shared transport once, on first use
//! - **Service**: [`RecordService`], one per entity kind
//! - **Weather**: forecast lookups on top of the weather table
//! - **Chat**: the farm assistant conversation
//!
//! # Example
//!
//! ```no_run
//! use fieldbook_model::Crop;
//! use fieldbook_store::{RecordService, StoreConfig};
//!
//! # async fn run() -> fieldbook_store::StoreResult<()> {
//! let crops: RecordService<Crop> = RecordService::from_config(StoreConfig::from_env()?);
//! for crop in crops.get_all().await {
//!     println!("{} ({})", crop.name, crop.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod chat;
pub mod config;
mod error;
pub mod http;
pub mod protocol;
mod provider;
mod service;
pub mod transport;
mod weather;

pub use batch::{BatchFailure, BatchSummary};
pub use chat::{ChatMessage, ChatSession, ConversationLog, FunctionInvoker, Role};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use http::HttpTransport;
pub use protocol::{FilterOperator, WhereClause};
pub use provider::TransportProvider;
pub use service::RecordService;
pub use transport::RecordTransport;
pub use weather::WeatherService;

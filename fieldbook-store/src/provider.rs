//! Lazily built, shared store transport.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::http::HttpTransport;
use crate::transport::RecordTransport;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

enum Source {
    Ready,
    Config(StoreConfig),
}

/// Hands out the shared transport, building it on first use.
///
/// Construction happens at most once per provider even when several tasks
/// ask concurrently. A failed construction is not cached; the next caller
/// retries it.
pub struct TransportProvider {
    source: Source,
    cell: OnceCell<Arc<dyn RecordTransport>>,
}

impl TransportProvider {
    /// Wraps a transport that already exists.
    pub fn ready(transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            source: Source::Ready,
            cell: OnceCell::new_with(Some(transport)),
        }
    }

    /// Defers building an [`HttpTransport`] from `config` until first use.
    pub fn from_config(config: StoreConfig) -> Self {
        Self {
            source: Source::Config(config),
            cell: OnceCell::new(),
        }
    }

    /// Whether the transport has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the shared transport.
    ///
    /// Fails with [`StoreError::TransportUnavailable`] when it cannot be built.
    pub async fn get(&self) -> StoreResult<Arc<dyn RecordTransport>> {
        self.cell
            .get_or_try_init(|| async {
                match &self.source {
                    Source::Ready => Err(StoreError::TransportUnavailable(
                        "no transport configured".to_string(),
                    )),
                    Source::Config(config) => match HttpTransport::new(config.clone()) {
                        Ok(transport) => {
                            info!(base_url = %config.base_url, "store transport ready");
                            Ok(Arc::new(transport) as Arc<dyn RecordTransport>)
                        }
                        Err(e) => {
                            warn!(error = %e, "could not build store transport");
                            Err(StoreError::TransportUnavailable(e.to_string()))
                        }
                    },
                }
            })
            .await
            .cloned()
    }
}

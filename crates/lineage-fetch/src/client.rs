//! The chain source seam.

use async_trait::async_trait;
use ethers::types::{Address, Log, H256};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::range::BlockRange;

/// Failures reported by a chain source for a single call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("source rejected query: {0}")]
    Rejected(String),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

/// One `eth_getLogs` request: a single topic at a single address over one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    pub topic: H256,
    pub range: BlockRange,
}

/// Read access to an EVM-style log source.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current head block number.
    async fn head_block(&self) -> Result<u64, ClientError>;

    /// Logs matching `query`, in the order the source returns them.
    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>, ClientError>;
}

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for Arc<C> {
    async fn head_block(&self) -> Result<u64, ClientError> {
        (**self).head_block().await
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>, ClientError> {
        (**self).logs(query).await
    }
}

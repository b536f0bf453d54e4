//! JSON-RPC chain source.

use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError};
use ethers::types::{Filter, Log};

use crate::client::{ChainClient, ClientError, LogQuery};

/// [`ChainClient`] backed by a JSON-RPC endpoint
/// (`eth_blockNumber` / `eth_getLogs`).
///
/// Generic over the transport so the request mapping can run against any
/// [`JsonRpcClient`]; the CLI uses plain HTTP.
#[derive(Debug, Clone)]
pub struct RpcChainClient<P = Http> {
    provider: Provider<P>,
}

impl RpcChainClient<Http> {
    pub fn new(rpc_url: &str) -> Result<Self, ClientError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ClientError::Rejected(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        Ok(Self { provider })
    }
}

impl<P: JsonRpcClient> RpcChainClient<P> {
    pub fn from_provider(provider: Provider<P>) -> Self {
        Self { provider }
    }
}

/// The filter sent for one chunk query.
fn log_filter(query: &LogQuery) -> Filter {
    Filter::new()
        .address(query.address)
        .topic0(query.topic)
        .from_block(query.range.from)
        .to_block(query.range.to)
}

fn transport(error: ProviderError) -> ClientError {
    ClientError::Transport(error.to_string())
}

#[async_trait]
impl<P: JsonRpcClient + 'static> ChainClient for RpcChainClient<P> {
    async fn head_block(&self) -> Result<u64, ClientError> {
        let head = self.provider.get_block_number().await.map_err(transport)?;
        Ok(head.as_u64())
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>, ClientError> {
        self.provider
            .get_logs(&log_filter(query))
            .await
            .map_err(transport)
    }
}

use async_trait::async_trait;
use ethers::types::Log;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::client::{ChainClient, ClientError, LogQuery};
use crate::range::BlockRange;

/// Scripted chain source for tests.
///
/// Serves a fixed log set filtered by address, topic, and block range, and can
/// be told to fail particular ranges or stall every query.
pub struct InMemoryChainClient {
    head: u64,
    head_error: bool,
    logs: Vec<Log>,
    failing: Vec<BlockRange>,
    fail_all: bool,
    latency: Option<Duration>,
    queries: Mutex<Vec<LogQuery>>,
    head_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryChainClient {
    pub fn new(head: u64) -> Self {
        Self {
            head,
            head_error: false,
            logs: Vec::new(),
            failing: Vec::new(),
            fail_all: false,
            latency: None,
            queries: Mutex::new(Vec::new()),
            head_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_logs(mut self, logs: impl IntoIterator<Item = Log>) -> Self {
        self.logs.extend(logs);
        self
    }

    /// Fail every query whose range overlaps `range`.
    pub fn fail_range(mut self, range: BlockRange) -> Self {
        self.failing.push(range);
        self
    }

    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn with_head_error(mut self) -> Self {
        self.head_error = true;
        self
    }

    /// Delay every log query by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every log query received so far, in arrival order.
    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    /// Highest number of log queries observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn matches(log: &Log, query: &LogQuery) -> bool {
        log.address == query.address
            && log.topics.first() == Some(&query.topic)
            && log
                .block_number
                .is_some_and(|block| query.range.contains(block.as_u64()))
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainClient for InMemoryChainClient {
    async fn head_block(&self) -> Result<u64, ClientError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if self.head_error {
            return Err(ClientError::Transport("head block unavailable".to_string()));
        }
        Ok(self.head)
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>, ClientError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*query);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail_all || self.failing.iter().any(|r| r.overlaps(&query.range)) {
            return Err(ClientError::Transport(format!(
                "connection reset while reading {}",
                query.range
            )));
        }

        Ok(self
            .logs
            .iter()
            .filter(|log| Self::matches(log, query))
            .cloned()
            .collect())
    }
}

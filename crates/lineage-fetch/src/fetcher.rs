//! Chunked, failure-tolerant log scans.

use ethers::types::{Address, Log};
use futures::stream::{self, StreamExt};
use lineage_types::EventKind;
use serde::Serialize;
use std::num::NonZeroU64;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::client::{ChainClient, ClientError, LogQuery};
use crate::range::{chunk_ranges, BlockRange};

/// Errors that abort a scan.
///
/// Individual chunk failures never surface here; see [`FetchReport`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read head block: {0}")]
    HeadBlock(#[source] ClientError),

    #[error("source unreachable: all {chunks} {kind} chunk queries failed: {last_error}")]
    SourceUnreachable {
        kind: EventKind,
        chunks: usize,
        #[source]
        last_error: ClientError,
    },
}

/// Knobs for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Widest block span per query. Must stay under the source's hard cap.
    pub chunk_width: NonZeroU64,

    /// Deadline for a single chunk query; expiry counts as a chunk failure.
    pub query_timeout: Duration,

    /// Chunk queries in flight at once. `1` scans strictly in sequence.
    pub max_concurrent_chunks: usize,
}

impl FetchConfig {
    /// Public RPC endpoints commonly cap `eth_getLogs` at 10 000 blocks.
    pub const DEFAULT_CHUNK_WIDTH: NonZeroU64 = match NonZeroU64::new(9_000) {
        Some(width) => width,
        None => unreachable!(),
    };
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chunk_width: Self::DEFAULT_CHUNK_WIDTH,
            query_timeout: Self::DEFAULT_QUERY_TIMEOUT,
            max_concurrent_chunks: 1,
        }
    }
}

/// Which registry logs to scan for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSelector {
    pub address: Address,
    pub kind: EventKind,
}

impl LogSelector {
    pub fn new(address: Address, kind: EventKind) -> Self {
        Self { address, kind }
    }

    fn query(&self, range: BlockRange) -> LogQuery {
        LogQuery {
            address: self.address,
            topic: self.kind.topic(),
            range,
        }
    }
}

/// Block span of one scan, with the head pinned when the scan was planned.
///
/// Logs mined after the head snapshot are not picked up by this scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanBounds {
    pub from: u64,
    pub to: u64,
}

impl ScanBounds {
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    /// Pin the upper bound, sampling the source head once when `to` is unset.
    pub async fn resolve<C: ChainClient + ?Sized>(
        client: &C,
        from: u64,
        to: Option<u64>,
    ) -> Result<Self, FetchError> {
        let to = match to {
            Some(to) => to,
            None => client.head_block().await.map_err(FetchError::HeadBlock)?,
        };
        Ok(Self { from, to })
    }
}

/// How complete a scan was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    pub chunks_total: usize,
    pub chunks_failed: usize,

    /// Ranges whose logs are missing from the result, ascending.
    pub failed_ranges: Vec<BlockRange>,

    /// Logs returned across all successful chunks.
    pub records: usize,
}

impl FetchReport {
    /// True when every planned chunk came back.
    pub fn is_complete(&self) -> bool {
        self.chunks_failed == 0
    }
}

/// Logs from a scan, concatenated in ascending chunk order.
#[derive(Debug, Clone, Default)]
pub struct FetchedLogs {
    pub logs: Vec<Log>,
    pub report: FetchReport,
}

/// Scan `bounds` for logs matching `selector`, one bounded chunk at a time.
///
/// Chunks that fail or time out are logged and skipped, so the result may be
/// missing whole ranges; they are listed in the report. The scan is fatal only
/// when it planned at least one chunk and every one of them failed.
#[instrument(
    skip(client, config),
    fields(kind = %selector.kind, from = bounds.from, to = bounds.to)
)]
pub async fn fetch_logs<C: ChainClient + ?Sized>(
    client: &C,
    selector: LogSelector,
    bounds: ScanBounds,
    config: &FetchConfig,
) -> Result<FetchedLogs, FetchError> {
    let ranges: Vec<BlockRange> =
        chunk_ranges(bounds.from, bounds.to, config.chunk_width).collect();
    info!(chunks = ranges.len(), "scanning registry logs");

    let outcomes: Vec<(BlockRange, Result<Vec<Log>, ClientError>)> = stream::iter(ranges)
        .map(|range| async move {
            let outcome = query_chunk(client, selector.query(range), config.query_timeout).await;
            (range, outcome)
        })
        .buffered(config.max_concurrent_chunks.max(1))
        .collect()
        .await;

    let mut fetched = FetchedLogs::default();
    let mut last_error = None;

    for (range, outcome) in outcomes {
        fetched.report.chunks_total += 1;
        match outcome {
            Ok(logs) => {
                debug!(%range, logs = logs.len(), "chunk fetched");
                fetched.logs.extend(logs);
            }
            Err(error) => {
                warn!(%range, %error, "skipping chunk after failed log query");
                fetched.report.chunks_failed += 1;
                fetched.report.failed_ranges.push(range);
                last_error = Some(error);
            }
        }
    }
    fetched.report.records = fetched.logs.len();

    if fetched.report.chunks_failed == fetched.report.chunks_total {
        if let Some(last_error) = last_error {
            return Err(FetchError::SourceUnreachable {
                kind: selector.kind,
                chunks: fetched.report.chunks_total,
                last_error,
            });
        }
    }

    info!(
        records = fetched.report.records,
        failed = fetched.report.chunks_failed,
        "scan finished"
    );
    Ok(fetched)
}

async fn query_chunk<C: ChainClient + ?Sized>(
    client: &C,
    query: LogQuery,
    timeout: Duration,
) -> Result<Vec<Log>, ClientError> {
    match tokio::time::timeout(timeout, client.logs(&query)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ClientError::Timeout(timeout)),
    }
}

//! Chunked retrieval of registry logs from a range-limited source.
//!
//! RPC providers cap how many blocks a single `eth_getLogs` call may span.
//! [`fetch_logs`] splits a scan into bounded [`BlockRange`]s, queries them in
//! ascending order, and skips chunks that fail so one flaky range does not
//! sink the whole scan. Skipped ranges are reported in the [`FetchReport`]
//! rather than raised.
//!
//! The source itself sits behind the [`ChainClient`] trait, implemented by
//! [`RpcChainClient`] over JSON-RPC through `ethers`. The `test-util` feature
//! adds `InMemoryChainClient`, a scripted source for tests of code built on
//! top of this crate.

mod client;
mod fetcher;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod range;
mod rpc;

pub use client::{ChainClient, ClientError, LogQuery};
pub use fetcher::{
    fetch_logs, FetchConfig, FetchError, FetchReport, FetchedLogs, LogSelector, ScanBounds,
};
#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryChainClient;
pub use range::{chunk_ranges, BlockRange, ChunkRanges};
pub use rpc::RpcChainClient;

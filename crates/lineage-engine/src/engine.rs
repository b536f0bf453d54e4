//! Fetch, decode, build.

use ethers::types::Log;
use lineage_decode::FromLog;
use lineage_fetch::{fetch_logs, ChainClient, FetchError, FetchReport, LogSelector, ScanBounds};
use lineage_graph::build_graph;
use lineage_types::{AssetEvent, AttestationEvent, ProvenanceGraph};
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, EngineConfig};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("reconstruction cancelled")]
    Cancelled,
}

/// A graph together with how complete the scans behind it were.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    /// Blocks covered, with the head pinned at scan start.
    pub bounds: ScanBounds,
    pub graph: ProvenanceGraph,
    pub assets: FetchReport,
    pub attestations: FetchReport,

    /// Logs that came back but could not be decoded.
    pub skipped_records: usize,
}

impl GraphReport {
    /// True when no chunk was skipped and every log decoded.
    pub fn is_complete(&self) -> bool {
        self.assets.is_complete() && self.attestations.is_complete() && self.skipped_records == 0
    }
}

/// Decoded events of one kind.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub events: Vec<T>,
    pub skipped: usize,
}

/// Decode every log as `T`, skipping and logging malformed records.
pub fn decode_logs<T: FromLog>(logs: &[Log]) -> Decoded<T> {
    let mut events = Vec::with_capacity(logs.len());
    let mut skipped = 0;

    for log in logs {
        match T::from_log(log) {
            Ok(event) => events.push(event),
            Err(error) => {
                skipped += 1;
                warn!(
                    kind = %T::KIND,
                    tx = ?log.transaction_hash,
                    block = ?log.block_number,
                    %error,
                    "skipping malformed log"
                );
            }
        }
    }

    Decoded { events, skipped }
}

struct Scan<T> {
    events: Vec<T>,
    skipped: usize,
    report: FetchReport,
}

/// Rebuilds the provenance graph from a chain source on every call.
pub struct Engine<C> {
    client: C,
    config: EngineConfig,
}

impl<C: ChainClient> Engine<C> {
    pub fn new(client: C, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Scan both event kinds concurrently and build the graph.
    ///
    /// Skipped chunks and malformed logs degrade the result without failing
    /// it; the report says how much was lost.
    pub async fn fetch_and_build(&self) -> Result<GraphReport, EngineError> {
        let bounds =
            ScanBounds::resolve(&self.client, self.config.start_block, self.config.to_block)
                .await?;
        info!(from = bounds.from, to = bounds.to, "rebuilding provenance graph");

        let (assets, attestations) = tokio::try_join!(
            self.fetch_events::<AssetEvent>(bounds),
            self.fetch_events::<AttestationEvent>(bounds),
        )?;

        let graph = build_graph(&assets.events, &attestations.events);
        info!(
            assets = graph.total_assets,
            derivatives = graph.total_derivatives,
            attestations = graph.total_attestations,
            max_depth = graph.max_depth,
            "provenance graph built"
        );

        let report = GraphReport {
            bounds,
            graph,
            skipped_records: assets.skipped + attestations.skipped,
            assets: assets.report,
            attestations: attestations.report,
        };
        if !report.is_complete() {
            warn!(
                failed_chunks = report.assets.chunks_failed + report.attestations.chunks_failed,
                skipped_records = report.skipped_records,
                "graph built from incomplete logs"
            );
        }
        Ok(report)
    }

    /// [`Engine::fetch_and_build`] without the fetch diagnostics.
    pub async fn fetch_and_build_graph(&self) -> Result<ProvenanceGraph, EngineError> {
        Ok(self.fetch_and_build().await?.graph)
    }

    /// Like [`Engine::fetch_and_build`], abandoned as soon as `cancel` resolves.
    ///
    /// In-flight queries are dropped and no partial graph is returned.
    pub async fn fetch_and_build_until<F>(&self, cancel: F) -> Result<GraphReport, EngineError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                warn!("provenance rebuild cancelled");
                Err(EngineError::Cancelled)
            }
            report = self.fetch_and_build() => report,
        }
    }

    async fn fetch_events<T: FromLog>(&self, bounds: ScanBounds) -> Result<Scan<T>, EngineError> {
        let selector = LogSelector::new(self.config.contract_address, T::KIND);
        let fetched = fetch_logs(&self.client, selector, bounds, &self.config.fetch).await?;
        let decoded = decode_logs(&fetched.logs);
        Ok(Scan {
            events: decoded.events,
            skipped: decoded.skipped,
            report: fetched.report,
        })
    }
}

/// Rebuild the graph from `client` with the default configuration.
pub async fn fetch_and_build_graph<C: ChainClient>(
    client: C,
) -> Result<ProvenanceGraph, EngineError> {
    Engine::new(client, EngineConfig::default())?
        .fetch_and_build_graph()
        .await
}

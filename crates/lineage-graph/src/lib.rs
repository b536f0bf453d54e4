//! Reconstruction of the provenance forest from flat event records.
//!
//! [`build_graph`] is pure and deterministic: given the same asset and
//! attestation sequences it yields the same tree. Structural anomalies
//! (orphans, dangling attestations, duplicate ids, parent cycles) are resolved
//! by fixed policies and reported in
//! [`GraphDiagnostics`](lineage_types::GraphDiagnostics), never raised.
//!
//! [`flatten_transactions`] linearizes a graph into the newest-first
//! transaction list shown by activity views, and [`flat_graph`] lists nodes
//! with their depth for output that must not nest per generation.

mod builder;
mod flatten;
mod layout;

pub use builder::build_graph;
pub use flatten::{flatten_transactions, TransactionKind, TransactionRow};
pub use layout::{flat_graph, FlatGraph, FlatNode};

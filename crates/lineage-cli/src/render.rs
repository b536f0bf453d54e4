//! Terminal output for graphs and transaction lists.

use colored::Colorize;
use lineage_engine::GraphReport;
use lineage_fetch::FetchReport;
use lineage_graph::{TransactionKind, TransactionRow};
use lineage_types::{AssetId, GraphDiagnostics, GraphMetrics, ProvenanceGraph, H256};

/// Block explorer for the default deployment.
pub const EXPLORER_URL: &str = "https://testnet.arcscan.app";

/// `0x1234...7890` form of an address or hash.
pub fn short_hex(bytes: &[u8]) -> String {
    let hex = hex::encode(bytes);
    if hex.len() <= 8 {
        return format!("0x{hex}");
    }
    format!("0x{}...{}", &hex[..4], &hex[hex.len() - 4..])
}

pub fn explorer_tx_url(tx_hash: &H256) -> String {
    format!("{EXPLORER_URL}/tx/0x{}", hex::encode(tx_hash.as_bytes()))
}

pub fn render_metrics(metrics: &GraphMetrics) -> String {
    let rows = [
        ("Total Assets", metrics.total_assets),
        ("Derivatives", metrics.total_derivatives),
        ("Attestations", metrics.total_attestations),
        ("Max Depth", metrics.max_depth),
    ];
    rows.iter()
        .map(|(label, value)| format!("  {} {}\n", format!("{label:<14}").bold(), value))
        .collect()
}

/// Indented lineage tree, one line per reachable asset.
pub fn render_tree(graph: &ProvenanceGraph) -> String {
    if graph.is_empty() {
        return format!("  {}\n", "No assets found".yellow());
    }

    let mut out = String::new();
    let mut stack: Vec<_> = graph.roots.iter().rev().map(|node| (node, 0usize)).collect();

    while let Some((node, depth)) = stack.pop() {
        let asset = &node.asset;
        let branch = if depth == 0 { "" } else { "└─ " };
        let mut line = format!(
            "  {}{}{} {} by {} at block {}",
            "   ".repeat(depth.saturating_sub(1)),
            branch,
            format!("#{}", asset.asset_id).bold(),
            asset.action.to_string().cyan(),
            short_hex(asset.actor.as_bytes()),
            asset.block_number,
        );
        if !asset.recipe_uri.is_empty() {
            line.push_str(&format!("  {}", asset.recipe_uri.dimmed()));
        }
        match node.attestations.len() {
            0 => {}
            1 => line.push_str(&format!("  {}", "1 attestation".green())),
            n => line.push_str(&format!("  {}", format!("{n} attestations").green())),
        }
        out.push_str(&line);
        out.push('\n');

        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

fn id_list(ids: &[AssetId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structural anomalies, or nothing for a clean graph.
pub fn render_diagnostics(diagnostics: &GraphDiagnostics) -> String {
    if diagnostics.is_clean() {
        return String::new();
    }

    let mut out = format!("{}\n", "Diagnostics".bold().yellow());
    if !diagnostics.orphans.is_empty() {
        out.push_str(&format!("  Orphaned assets: {}\n", id_list(&diagnostics.orphans)));
    }
    if diagnostics.dangling_attestations > 0 {
        out.push_str(&format!(
            "  Attestations for unknown assets: {}\n",
            diagnostics.dangling_attestations
        ));
    }
    if !diagnostics.duplicate_ids.is_empty() {
        out.push_str(&format!(
            "  Duplicate asset ids: {}\n",
            id_list(&diagnostics.duplicate_ids)
        ));
    }
    if !diagnostics.broken_cycles.is_empty() {
        out.push_str(&format!(
            "  Parent cycles broken at: {}\n",
            id_list(&diagnostics.broken_cycles)
        ));
    }
    out
}

/// Metrics, tree, and diagnostics for a graph.
pub fn render_graph(graph: &ProvenanceGraph) -> String {
    let mut out = format!("{}\n", "Provenance Metrics".bold().underline());
    out.push_str(&render_metrics(&graph.metrics()));
    out.push('\n');
    out.push_str(&format!("{}\n", "Lineage".bold().underline()));
    out.push_str(&render_tree(graph));

    let diagnostics = render_diagnostics(&graph.diagnostics);
    if !diagnostics.is_empty() {
        out.push('\n');
        out.push_str(&diagnostics);
    }
    out
}

fn scan_line(label: &str, report: &FetchReport) -> String {
    let status = if report.is_complete() {
        "complete".green()
    } else {
        format!("{} of {} chunks skipped", report.chunks_failed, report.chunks_total).yellow()
    };
    let mut line = format!(
        "  {} {} records, {}\n",
        format!("{label:<14}").bold(),
        report.records,
        status
    );
    for range in &report.failed_ranges {
        line.push_str(&format!("    {} {range}\n", "missing".yellow()));
    }
    line
}

/// Scan summary followed by [`render_graph`].
pub fn render_report(report: &GraphReport) -> String {
    let mut out = format!("{}\n", "Scan".bold().underline());
    out.push_str(&format!(
        "  {} {} to {}\n",
        format!("{:<14}", "Blocks").bold(),
        report.bounds.from,
        report.bounds.to
    ));
    out.push_str(&scan_line("Assets", &report.assets));
    out.push_str(&scan_line("Attestations", &report.attestations));
    if report.skipped_records > 0 {
        out.push_str(&format!(
            "  {} {}\n",
            format!("{:<14}", "Undecodable").bold(),
            report.skipped_records.to_string().yellow()
        ));
    }
    out.push('\n');
    out.push_str(&render_graph(&report.graph));
    out
}

fn kind_label(kind: TransactionKind) -> String {
    let padded = format!("{:<8}", kind.to_string());
    match kind {
        TransactionKind::Publish => padded.green().to_string(),
        TransactionKind::Derive => padded.blue().to_string(),
        TransactionKind::Attest => padded.cyan().to_string(),
    }
}

/// Transaction table, newest first. `total` is the row count before any limit.
pub fn render_transactions(rows: &[TransactionRow], total: usize, links: bool) -> String {
    if rows.is_empty() {
        return format!("{}\n", "No transactions found".yellow());
    }

    let header = format!(
        "{:<8} {:<10} {:<14} {:>10}  {}",
        "TYPE", "ASSET", "ACTOR", "BLOCK", "TRANSACTION"
    );
    let mut out = format!("{}\n", header.bold());

    for row in rows {
        let tx = if links {
            explorer_tx_url(&row.tx_hash)
        } else {
            short_hex(row.tx_hash.as_bytes())
        };
        out.push_str(&format!(
            "{} {:<10} {:<14} {:>10}  {}\n",
            kind_label(row.kind),
            format!("#{}", row.asset_id),
            short_hex(row.actor.as_bytes()),
            row.block_number,
            tx
        ));
    }

    if total > rows.len() {
        out.push_str(&format!(
            "{}\n",
            format!("Showing {} of {total} transactions", rows.len()).dimmed()
        ));
    }
    out
}

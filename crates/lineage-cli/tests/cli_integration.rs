//! Integration tests for the `lineage` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lineage"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute lineage")
}

fn hash(byte: char) -> String {
    format!("0x{}", byte.to_string().repeat(64))
}

fn asset(id: u64, parent: u64, actor: &str, block: u64) -> serde_json::Value {
    serde_json::json!({
        "assetId": format!("{id:#x}"),
        "parentId": format!("{parent:#x}"),
        "actor": actor,
        "action": if parent == 0 { "publish" } else { "derive" },
        "recipeHash": hash('a'),
        "recipeURI": format!("ipfs://QmAsset{id}/metadata.json"),
        "txHash": format!("0x{:064x}", id),
        "blockNumber": block,
    })
}

fn attestation(id: u64, block: u64) -> serde_json::Value {
    serde_json::json!({
        "assetId": format!("{id:#x}"),
        "actor": "0xfedcba9876543210fedcba9876543210fedcba98",
        "claimHash": hash('b'),
        "claimURI": format!("ipfs://QmClaim{block}"),
        "txHash": format!("0x{:064x}", 1_000_000 + block),
        "blockNumber": block,
    })
}

/// Two roots, a derivative chain three deep under the first, three attestations.
fn write_dump(dir: &Path) -> PathBuf {
    let alice = "0x1234567890123456789012345678901234567890";
    let bob = "0xabcdef0123456789abcdef0123456789abcdef01";
    let dump = serde_json::json!({
        "assets": [
            asset(1, 0, alice, 1000),
            asset(2, 0, bob, 1050),
            asset(3, 1, bob, 1100),
            asset(4, 1, alice, 1150),
            asset(5, 3, alice, 1300),
        ],
        "attestations": [
            attestation(1, 1200),
            attestation(3, 1250),
            attestation(1, 1400),
        ],
    });

    let path = dir.join("events.json");
    fs::write(&path, serde_json::to_string_pretty(&dump).unwrap()).unwrap();
    path
}

#[test]
fn test_build_prints_metrics_and_tree() {
    let dir = TempDir::new().unwrap();
    let dump = write_dump(dir.path());

    let output = run(&["build", dump.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Provenance Metrics"));
    assert!(stdout.contains("Total Assets   5"));
    assert!(stdout.contains("Derivatives    3"));
    assert!(stdout.contains("Attestations   3"));
    assert!(stdout.contains("Max Depth      3"));
    assert!(stdout.contains("#1 publish by 0x1234...7890 at block 1000"));
    assert!(stdout.contains("└─ #3 derive by 0xabcd...ef01"));
    assert!(!stdout.contains("Diagnostics"));
}

#[test]
fn test_build_json_output() {
    let dir = TempDir::new().unwrap();
    let dump = write_dump(dir.path());

    let output = run(&["build", dump.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["totalAssets"], 5);
    assert_eq!(graph["totalDerivatives"], 3);
    assert_eq!(graph["totalAttestations"], 3);
    assert_eq!(graph["maxDepth"], 3);
    assert_eq!(graph["roots"].as_array().unwrap().len(), 2);
    assert_eq!(graph["roots"][0]["recipeURI"], "ipfs://QmAsset1/metadata.json");
    assert_eq!(graph["roots"][0]["attestations"].as_array().unwrap().len(), 2);
}

#[test]
fn test_build_json_deep_chain_is_flat() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.json");
    let alice = "0x1234567890123456789012345678901234567890";
    let assets: Vec<serde_json::Value> = (1..=5_000u64)
        .map(|id| asset(id, id - 1, alice, 1000 + id))
        .collect();
    fs::write(&path, serde_json::json!({ "assets": assets }).to_string()).unwrap();

    let output = run(&["build", path.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["maxDepth"], 5_000);
    let nodes = graph["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5_000);
    assert_eq!(nodes[4_999]["depth"], 5_000);
    assert_eq!(nodes[4_999]["parentId"], "0x1387");
}

#[test]
fn test_build_reports_orphans() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orphans.json");
    let dump = serde_json::json!({
        "assets": [asset(1, 0, "0x1234567890123456789012345678901234567890", 10),
                   asset(7, 99, "0x1234567890123456789012345678901234567890", 20)],
    });
    fs::write(&path, dump.to_string()).unwrap();

    let output = run(&["build", path.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Diagnostics"));
    assert!(stdout.contains("Orphaned assets: #7"));
}

#[test]
fn test_txs_from_dump_newest_first() {
    let dir = TempDir::new().unwrap();
    let dump = write_dump(dir.path());

    let output = run(&["txs", "--events", dump.to_str().unwrap(), "--limit", "3"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("TYPE"));
    assert!(lines[1].starts_with("attest"));
    assert!(lines[1].contains("1400"));
    assert!(lines[2].starts_with("derive"));
    assert!(lines[2].contains("#5"));
    assert!(lines[3].starts_with("attest"));
    assert!(lines[3].contains("1250"));
    assert_eq!(lines[4], "Showing 3 of 8 transactions");
}

#[test]
fn test_txs_json_rows() {
    let dir = TempDir::new().unwrap();
    let dump = write_dump(dir.path());

    let output = run(&["txs", "--events", dump.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["kind"], "attest");
    assert_eq!(rows[0]["blockNumber"], 1400);
    assert_eq!(rows[7]["kind"], "publish");
    assert_eq!(rows[7]["blockNumber"], 1000);
}

#[test]
fn test_build_missing_file_fails() {
    let output = run(&["build", "/nonexistent/events.json"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read /nonexistent/events.json"));
}

#[test]
fn test_build_rejects_malformed_dump() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"assets": [{"assetId": 1}]}"#).unwrap();

    let output = run(&["build", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse event dump"));
}

#[test]
fn test_graph_rejects_inverted_range_before_connecting() {
    let output = run(&[
        "graph",
        "--rpc-url",
        "http://127.0.0.1:9",
        "--from-block",
        "500",
        "--to-block",
        "100",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid scan settings"));
}

#[test]
fn test_graph_rejects_bad_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lineage.toml");
    fs::write(&path, "[scan]\nchunk_size = 10\n").unwrap();

    let output = run(&["graph", "--config", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
}

#[test]
fn test_help_lists_commands() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("graph"));
    assert!(stdout.contains("txs"));
    assert!(stdout.contains("build"));
}

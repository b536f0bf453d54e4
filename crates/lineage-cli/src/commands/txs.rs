use anyhow::Result;
use lineage_graph::flatten_transactions;

use super::TxsArgs;
use crate::dump::EventDump;
use crate::render;
use crate::settings::SourceArgs;

/// Handle `lineage txs`.
pub async fn cmd_txs(source: &SourceArgs, args: TxsArgs) -> Result<()> {
    let graph = match &args.events {
        Some(path) => EventDump::load(path)?.build(),
        None => super::rebuild(source.resolve()?).await?.graph,
    };

    let mut rows = flatten_transactions(&graph);
    let total = rows.len();
    rows.truncate(args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render::render_transactions(&rows, total, args.links));
    }
    Ok(())
}

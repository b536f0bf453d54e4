use anyhow::Result;

use crate::json::report_json;
use crate::render;
use crate::settings::Settings;

/// Handle `lineage graph`.
pub async fn cmd_graph(settings: Settings, json: bool) -> Result<()> {
    let report = super::rebuild(settings).await?;

    if json {
        println!("{}", report_json(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }
    Ok(())
}

use crate::analysis::aggregate;
use crate::cli::RenderArgs;
use crate::config::OutputLayout;
use crate::normalize::normalize;
use crate::report::{build_output, output_json, output_ndjson, output_terminal, write_outputs};
use crate::table::read_table;
use anyhow::Context;
use console::style;
use std::path::Path;
use tracing::info;

pub fn exec(input: &Path, args: &RenderArgs) -> anyhow::Result<()> {
    let (raw, encoding) = read_table(input)
        .with_context(|| format!("Failed to load commit table {}", input.display()))?;
    info!(%encoding, "decoded commit table");

    let normalized = normalize(&raw).context("Failed to normalize commit table")?;
    let options = args.analysis_options();
    let result = aggregate(&normalized.table, &options);
    let output = build_output(&result, &normalized.report, &input.to_string_lossy());

    let layout = OutputLayout::new(&args.output_dir);
    let written = write_outputs(&layout, &normalized.table, &output, &options)
        .with_context(|| format!("Failed to write outputs to {}", args.output_dir.display()))?;

    if args.json {
        output_json(&output)?;
    } else if args.ndjson {
        output_ndjson(&result)?;
    } else if !args.quiet {
        output_terminal(&result, &options)?;
        println!();
        for path in &written {
            println!("{} {}", style("wrote").green(), path.display());
        }
    }

    Ok(())
}

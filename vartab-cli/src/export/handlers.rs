use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

use vartab_export::pipeline::{run_export, ExportConfig};
use vartab_export::shard::ShardWidth;

pub fn run_export_cmd(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to the extracted record stream is required.");

    let samples = matches
        .get_one::<String>("samples")
        .expect("A path to the sample identity table is required.");

    let output = matches
        .get_one::<String>("output")
        .expect("An output path is required.");

    let shard_width: ShardWidth = matches
        .get_one::<String>("shard-width")
        .expect("A shard width is required.")
        .parse()?;

    let regions: Vec<String> = matches
        .get_many::<String>("region")
        .unwrap_or_default()
        .cloned()
        .collect();

    let sample_names: Vec<String> = matches
        .get_many::<String>("sample-name")
        .unwrap_or_default()
        .cloned()
        .collect();

    let config = ExportConfig {
        input: PathBuf::from(input),
        sample_table: PathBuf::from(samples),
        output: PathBuf::from(output),
        schema: matches.get_one::<String>("schema").map(PathBuf::from),
        representative_header: matches.get_one::<String>("header").map(PathBuf::from),
        regions,
        shard_width,
        sample_names,
        preserve_sample_order: matches.get_flag("preserve-sample-order"),
        strict_schema: matches.get_flag("strict-schema"),
        temp_dir: PathBuf::from(
            matches
                .get_one::<String>("temp-dir")
                .expect("A temp dir is required."),
        ),
    };

    let summary = run_export(&config)?;

    println!(
        "Wrote {} records across {} shards for {} samples to {}",
        summary.records,
        summary.shards,
        summary.samples,
        config.output.display()
    );

    Ok(())
}

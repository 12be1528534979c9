use clap::{arg, Arg, ArgAction, Command};

pub use vartab_export::consts::*;

pub fn create_export_cli() -> Command {
    Command::new(EXPORT_CMD)
        .author("vartab developers")
        .about("Export an extracted variant record stream to one coordinate-sorted VCF file.")
        .arg(Arg::new("input").required(true))
        .arg(Arg::new("samples").required(true))
        .arg(arg!(--output <output>).required(true))
        .arg(arg!(--schema <schema>))
        .arg(arg!(--header <header>))
        .arg(
            Arg::new("region")
                .long("region")
                .action(ArgAction::Append)
                .help("Genomic region to export, as reference:start-end. Repeatable."),
        )
        .arg(
            Arg::new("shard-width")
                .long("shard-width")
                .default_value(DEFAULT_SHARD_WIDTH)
                .help("Bases per shard, or \"all\" for one shard per reference."),
        )
        .arg(
            Arg::new("sample-name")
                .long("sample-name")
                .action(ArgAction::Append)
                .help("Explicit output sample name, in column order. Repeatable."),
        )
        .arg(
            Arg::new("preserve-sample-order")
                .long("preserve-sample-order")
                .action(ArgAction::SetTrue)
                .help("Keep derived sample names in first-observed order instead of sorting."),
        )
        .arg(
            Arg::new("strict-schema")
                .long("strict-schema")
                .action(ArgAction::SetTrue)
                .help("Fail on unparseable annotation structure instead of dropping it."),
        )
        .arg(arg!(--"temp-dir" <dir>).default_value(DEFAULT_TEMP_DIR))
}

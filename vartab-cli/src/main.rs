mod export;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "vartab";
    pub const BIN_NAME: &str = "vartab";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("vartab developers")
        .about("Tools for exporting tabular variant datasets to one coordinate-sorted VCF file.")
        .subcommand_required(true)
        .subcommand(export::cli::create_export_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // EXPORT
        //
        Some((export::cli::EXPORT_CMD, matches)) => {
            export::handlers::run_export_cmd(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

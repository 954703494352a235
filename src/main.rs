//! config-merge command-line tool
//!
//! Merges layered JSON/YAML configuration files and resolves indirection
//! tokens from the command line.

use anyhow::Result;
use clap::Parser;
use config_merge::cli::{Cli, Command, MergeArgs, OutputArg, ResolveArgs};
use config_merge::config::{ConfigLoader, GlobalConfig, get_actual_values};
use config_merge::format::OutputFormat;
use config_merge::logging::{self, LogTarget};
use serde_json::Value;
use tracing::debug;

/// Convert CLI output format to renderer format
fn cli_output_to_format(output: OutputArg) -> OutputFormat {
    match output {
        OutputArg::Yaml => OutputFormat::Yaml,
        OutputArg::Json => OutputFormat::Json,
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let format = cli_output_to_format(args.output);
    debug!(files = args.files.len(), global = args.global, "merging files");

    let rendered = if args.global {
        let loader = args
            .files
            .into_iter()
            .fold(ConfigLoader::<GlobalConfig>::new(), |loader, path| {
                loader.with_file(path)
            });
        format.render(&loader.load()?)?
    } else {
        let loader = args
            .files
            .into_iter()
            .fold(ConfigLoader::<Value>::new(), |loader, path| {
                loader.with_file(path)
            });
        format.render(&loader.load()?)?
    };

    print!("{rendered}");
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    for value in get_actual_values(&args.values) {
        println!("{value}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), logging::level(cli.verbose))?;

    match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::Resolve(args) => run_resolve(args),
    }
}

mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // pinvokegen info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("pinvokegen", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Generate {
            modules,
            output,
            assemblies,
        } => commands::generate::run(modules, output, assemblies, &cli.global),
        Command::Scan { assemblies } => commands::scan::run(assemblies, &cli.global),
    }
}

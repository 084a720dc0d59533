use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pinvokegen - generate C interop tables and callback trampolines for .NET modules
#[derive(Debug, Parser)]
#[command(name = "pinvokegen", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan modules and write the pinvoke table and trampolines to a C source file.
    Generate {
        /// Native module to emit an import table for (repeatable, order is kept).
        #[arg(short = 'm', long = "module", value_name = "MODULE", required = true)]
        modules: Vec<String>,

        /// Path of the generated C file.
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// .NET modules to scan; directories are searched recursively.
        #[arg(value_name = "ASSEMBLY", required = true)]
        assemblies: Vec<PathBuf>,
    },

    /// List the P/Invokes and native callbacks found in modules.
    Scan {
        /// .NET modules to scan; directories are searched recursively.
        #[arg(value_name = "ASSEMBLY", required = true)]
        assemblies: Vec<PathBuf>,
    },
}

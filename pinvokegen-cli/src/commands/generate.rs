use std::path::{Path, PathBuf};

use anyhow::Context;
use pinvokegen::{Generator, GeneratorOptions};
use serde::Serialize;

use crate::{app::GlobalOptions, commands::common::expand_inputs, output::print_output};

#[derive(Debug, Serialize)]
struct GenerateOutput {
    output: String,
    assemblies: usize,
    modules: Vec<String>,
}

pub fn run(
    modules: &[String],
    output: &Path,
    assemblies: &[PathBuf],
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let assemblies = expand_inputs(assemblies)?;

    let options = GeneratorOptions::new()
        .modules(modules.iter().cloned())
        .assemblies(assemblies.iter().cloned())
        .output(output);
    Generator::new(options)
        .write()
        .with_context(|| format!("failed to generate {}", output.display()))?;

    let summary = GenerateOutput {
        output: output.display().to_string(),
        assemblies: assemblies.len(),
        modules: modules.to_vec(),
    };

    print_output(&summary, opts, |out| {
        println!(
            "Wrote {} ({} modules scanned, {} native modules)",
            out.output,
            out.assemblies,
            out.modules.len()
        );
    })
}

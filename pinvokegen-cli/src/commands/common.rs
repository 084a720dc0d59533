use std::path::{Path, PathBuf};

use anyhow::Context;

/// Expand the command line inputs: files are kept as given, directories are replaced by the
/// modules they contain, sorted by path.
pub fn expand_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            collect_assemblies(input, &mut found)?;
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn collect_assemblies(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_assemblies(&path, files)?;
        } else if is_assembly_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns true if the path has an `.exe` or `.dll` extension.
pub fn is_assembly_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("exe" | "dll")
    )
}

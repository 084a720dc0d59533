//! The complete generation run: scan, emit, write.

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    interop::{
        declarations::{emit_declarations, NativeModuleSet},
        scanner::{scan, ScanResult},
        trampolines::emit_trampolines,
    },
    Error, Result,
};

/// Inputs of a generation run.
///
/// ```rust
/// use pinvokegen::GeneratorOptions;
///
/// let options = GeneratorOptions::new()
///     .module("libc")
///     .module("libSystem.Native")
///     .assembly("App.dll")
///     .output("pinvoke-table.h");
///
/// assert_eq!(options.modules_list(), ["libc", "libSystem.Native"]);
/// assert_eq!(options.assemblies_list().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeneratorOptions {
    modules: NativeModuleSet,
    assemblies: Vec<PathBuf>,
    output: Option<PathBuf>,
}

impl GeneratorOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit import tables for native module `module`
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.modules.insert(module);
        self
    }

    /// Emit import tables for every module in `modules`
    #[must_use]
    pub fn modules<S: Into<String>>(mut self, modules: impl IntoIterator<Item = S>) -> Self {
        self.modules.extend(modules);
        self
    }

    /// Scan the managed module at `path`
    #[must_use]
    pub fn assembly(mut self, path: impl Into<PathBuf>) -> Self {
        self.assemblies.push(path.into());
        self
    }

    /// Scan every managed module in `paths`
    #[must_use]
    pub fn assemblies<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.assemblies.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Write the artifact to `path`
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Native modules, in the order they were added
    #[must_use]
    pub fn modules_set(&self) -> &NativeModuleSet {
        &self.modules
    }

    /// Native modules, in the order they were added
    #[must_use]
    pub fn modules_list(&self) -> Vec<&str> {
        self.modules.iter().collect()
    }

    /// Managed modules to scan
    #[must_use]
    pub fn assemblies_list(&self) -> &[PathBuf] {
        &self.assemblies
    }

    /// Output path, if one was set
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Runs the scanner and both emitters over a set of modules.
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// A generator for `options`
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Generator { options }
    }

    /// The options this generator runs with
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Scan all configured assemblies.
    ///
    /// # Errors
    /// Returns the first load or scan error.
    pub fn scan(&self) -> Result<ScanResult> {
        scan(&self.options.assemblies)
    }

    /// Scan and render the whole artifact in memory.
    ///
    /// # Errors
    /// Returns any scan, validation or naming error.
    pub fn render(&self) -> Result<String> {
        let mut found = self.scan()?;
        render(&mut found, &self.options.modules)
    }

    /// Render the artifact and write it to the configured output path.
    ///
    /// The file is only created once rendering succeeded, so a failed run leaves no output
    /// behind. A write that fails after the file was opened removes the partial file; a file
    /// that could not be opened is left untouched.
    ///
    /// # Errors
    /// Returns an error if no output path is set, if rendering fails, or if the file cannot be
    /// written.
    pub fn write(&self) -> Result<()> {
        let Some(path) = self.options.output.as_deref() else {
            return Err(Error::Error("No output path configured".to_string()));
        };

        let text = self.render()?;

        log::info!("Generating pinvoke table to '{}'", path.display());
        write_file(path, &text)
    }
}

/// Compose declarations and trampolines from an existing scan result.
///
/// `found.callbacks` is left in emission order with trampoline names assigned.
///
/// # Errors
/// Returns the trampoline validation or naming error.
pub fn render(found: &mut ScanResult, modules: &NativeModuleSet) -> Result<String> {
    let declarations = emit_declarations(&found.native_calls, modules);
    let trampolines = emit_trampolines(&mut found.callbacks)?;

    log::debug!(
        "Rendered {} pinvokes for {} native modules and {} callbacks",
        found.native_calls.len(),
        modules.len(),
        found.callbacks.len()
    );

    Ok(declarations + &trampolines)
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let mut writer = BufWriter::new(file);
    if let Err(error) = writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
    {
        drop(writer);
        let _ = std::fs::remove_file(path);
        return Err(error.into());
    }

    Ok(())
}

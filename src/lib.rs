// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # pinvokegen
//!
//! Static scanner for the P/Invoke surface of .NET modules. `pinvokegen` reads ECMA-335
//! metadata straight from PE files, without loading them into a runtime, finds every method
//! that calls into native code and every method native code may call back into, and renders
//! the C glue an interpreter-based runtime (such as Mono on WebAssembly) compiles in:
//!
//! - a C prototype per native entry point,
//! - one import table per native module, plus the arrays indexing them,
//! - a native-to-interpreter trampoline per callback, plus its name map.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pinvokegen::{Generator, GeneratorOptions};
//!
//! let options = GeneratorOptions::new()
//!     .modules(["libc", "libSystem.Native"])
//!     .assemblies(["App.dll", "System.Private.CoreLib.dll"])
//!     .output("pinvoke-table.h");
//!
//! Generator::new(options).write()?;
//! # Ok::<(), pinvokegen::Error>(())
//! ```
//!
//! ### Inspecting a scan
//!
//! ```rust,no_run
//! use pinvokegen::interop::scanner::scan;
//!
//! let found = scan(&["App.dll"])?;
//! for call in &found.native_calls {
//!     println!("{} -> {}!{}", call.method, call.native_module, call.entry_point);
//! }
//! for callback in &found.callbacks {
//!     println!("callback {} ({:?})", callback.method, callback.marker);
//! }
//! # Ok::<(), pinvokegen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - PE/CLI headers, streams, tables and signatures, plus an owned per-module
//!   model ([`metadata::assembly::AssemblyMetadata`])
//! - [`interop`] - the scanner, the managed-to-C type mapping and both emitters
//!
//! Errors are reported through [`Error`]; nothing is written when a run fails.
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use pinvokegen::prelude::*;
///
/// let found = scan(&["App.dll"])?;
/// println!("{} native calls", found.native_calls.len());
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub mod prelude;

/// Definitions, parsing and loading of CIL metadata based on ECMA-335
///
/// Covers the subset of the metadata system a P/Invoke scan needs: the CLI header, the
/// metadata root, the `#~` tables stream with the `#Strings` and `#Blob` heaps, and method
/// signatures. [`metadata::assembly::AssemblyMetadata`] is the owned model the scanner works
/// on.
///
/// # Examples
///
/// ```rust,no_run
/// use pinvokegen::metadata::assembly::AssemblyMetadata;
///
/// let assembly = AssemblyMetadata::from_file(std::path::Path::new("App.dll"))?;
/// for method in assembly.methods().iter().filter(|method| method.is_pinvoke()) {
///     println!("{}", method.name);
/// }
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub mod metadata;

/// P/Invoke and callback discovery, type mapping and C code generation
pub mod interop;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use pinvokegen::{interop::scanner::ScanResult, Result};
///
/// fn scan_app() -> Result<ScanResult> {
///     pinvokegen::interop::scanner::scan(&["App.dll"])
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `pinvokegen` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use pinvokegen::{Error, Generator, GeneratorOptions};
///
/// let options = GeneratorOptions::new().module("libc").assembly("App.dll");
/// match Generator::new(options).render() {
///     Ok(text) => print!("{text}"),
///     Err(Error::NotSupported) => println!("Not a .NET module"),
///     Err(Error::NonBlittableParameter { method, index, type_name }) => {
///         println!("{method}: parameter {index} has type {type_name}")
///     }
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

/// Entry point for complete generation runs.
///
/// See [`interop::generator`] for details.
pub use interop::generator::{Generator, GeneratorOptions};

/// Descriptors produced by the scanner
pub use interop::scanner::{CallbackDescriptor, MarkerKind, NativeCallDescriptor, ScanResult};

/// Metadata streams and heaps for direct access to ECMA-335 data structures.
///
/// - [`Blob`] - Binary blob heap for signatures
/// - [`Strings`] - String heap for names and identifiers
/// - [`TablesHeader`] - Metadata tables header information
/// - [`StreamHeader`] - Individual stream header information
pub use metadata::streams::{Blob, StreamHeader, Strings, TablesHeader};

/// Provides access to low-level file and memory parsing utilities.
///
/// # Example
///
/// ```rust
/// use pinvokegen::Parser;
///
/// let data = [0x81, 0x80, 0x2A];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_compressed_uint()?, 0x180);
/// assert_eq!(parser.read_le::<u8>()?, 0x2A);
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub use file::{parser::Parser, File};

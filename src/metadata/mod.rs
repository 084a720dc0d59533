//! Metadata parsing for .NET images.
//!
//! Reads the ECMA-335 structures a P/Invoke scan needs, bottom-up: the CLI header
//! ([`cor20header`]), the metadata root ([`root`]), the heaps and the tables stream
//! ([`streams`], [`tables`]) and method signatures ([`signatures`]). [`assembly`] turns these
//! into an owned model of one module, and [`method`] and [`typesystem`] describe methods and
//! types the way reflection names them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pinvokegen::metadata::assembly::AssemblyMetadata;
//! use std::path::Path;
//!
//! let assembly = AssemblyMetadata::from_file(Path::new("App.dll"))?;
//! println!("Assembly: {}", assembly.identity());
//! println!("Methods: {}", assembly.methods().len());
//! println!("Types: {}", assembly.types().count());
//! # Ok::<(), pinvokegen::Error>(())
//! ```

/// Owned per-module model of types, methods, imports and attributes
pub mod assembly;
/// Borrowed view of the metadata of a loaded image
pub mod cilassemblyview;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Method descriptors and method flags
pub mod method;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method and type signatures
pub mod signatures;
/// Implementation of the metadata streams (tables header and heaps)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Reflection-style type descriptors
pub mod typesystem;

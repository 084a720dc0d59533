//! # pinvokegen Prelude
//!
//! The types most runs need: the generator and its options, the scanner and its descriptors,
//! and the metadata model they are built from.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all pinvokegen operations
pub use crate::Error;

/// The result type used throughout pinvokegen
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Complete generation runs
pub use crate::interop::generator::{Generator, GeneratorOptions};

/// Scanning modules for native calls and callbacks
pub use crate::interop::scanner::{
    scan, scan_assembly, scan_path, CallbackDescriptor, MarkerKind, NativeCallDescriptor,
    ScanResult,
};

/// Rendering individual sections
pub use crate::interop::{
    declarations::{emit_declarations, NativeModuleSet},
    trampolines::emit_trampolines,
    typemap::{is_blittable, NativeType},
};

/// Low-level file parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Owned per-module metadata model
pub use crate::metadata::assembly::{AssemblyMetadata, AttributeLookup, MethodInfo, TypeInfo};

/// Method and type descriptors
pub use crate::metadata::{
    method::{DeclaringType, MethodAttributes, MethodDescriptor, MethodDescriptorRc},
    typesystem::TypeDescriptor,
};

//! Discovery of interop methods in module metadata.
//!
//! A method is a *native call* when its flags carry `PinvokeImpl`; its native module and entry
//! point come from the method's `ImplMap` row. Independently, a method is a *callback* when one
//! of its custom attributes is a callable-from-native marker. Attributes whose type cannot be
//! named are skipped and never stop the scan.

use std::{path::Path, sync::Arc};

use rayon::prelude::*;

use crate::{
    metadata::{
        assembly::{AssemblyMetadata, AttributeLookup, ImportInfo},
        method::MethodDescriptorRc,
    },
    Error::MissingEntryPoint,
    Result,
};

/// Full name of the primary callback marker
pub const UNMANAGED_CALLERS_ONLY: &str =
    "System.Runtime.InteropServices.UnmanagedCallersOnlyAttribute";
/// Simple name of the legacy callback marker, matched in any namespace
pub const MONO_PINVOKE_CALLBACK: &str = "MonoPInvokeCallbackAttribute";

/// The recognised callable-from-native markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `System.Runtime.InteropServices.UnmanagedCallersOnlyAttribute`
    UnmanagedCallersOnly,
    /// `MonoPInvokeCallbackAttribute`, in any namespace
    MonoPInvokeCallback,
}

impl MarkerKind {
    /// Classify a resolved attribute type; `None` for unrelated or unresolved attributes
    #[must_use]
    pub fn classify(attribute: &AttributeLookup) -> Option<MarkerKind> {
        let AttributeLookup::Resolved { name, .. } = attribute else {
            return None;
        };

        if attribute.full_name().as_deref() == Some(UNMANAGED_CALLERS_ONLY) {
            Some(MarkerKind::UnmanagedCallersOnly)
        } else if name == MONO_PINVOKE_CALLBACK {
            Some(MarkerKind::MonoPInvokeCallback)
        } else {
            None
        }
    }
}

/// A method that calls into a native module.
#[derive(Clone, Debug)]
pub struct NativeCallDescriptor {
    /// Name of the native function
    pub entry_point: String,
    /// Name of the native module the function is imported from
    pub native_module: String,
    /// The managed declaration
    pub method: MethodDescriptorRc,
}

/// A managed method that native code calls back into.
#[derive(Clone, Debug)]
pub struct CallbackDescriptor {
    /// The managed method
    pub method: MethodDescriptorRc,
    /// The marker that made this a callback
    pub marker: MarkerKind,
    /// Trampoline identifier, set once by the trampoline naming pass
    pub trampoline_name: Option<String>,
}

impl CallbackDescriptor {
    /// A callback that has not been named yet
    #[must_use]
    pub fn new(method: MethodDescriptorRc, marker: MarkerKind) -> Self {
        CallbackDescriptor {
            method,
            marker,
            trampoline_name: None,
        }
    }
}

/// Interop methods found in a set of modules.
#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    /// Methods implemented by native functions
    pub native_calls: Vec<NativeCallDescriptor>,
    /// Methods callable from native code
    pub callbacks: Vec<CallbackDescriptor>,
}

impl ScanResult {
    /// Append the findings of `other`
    pub fn extend(&mut self, other: ScanResult) {
        self.native_calls.extend(other.native_calls);
        self.callbacks.extend(other.callbacks);
    }

    /// `true` if nothing was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.native_calls.is_empty() && self.callbacks.is_empty()
    }
}

/// Scan every module in `paths`.
///
/// Modules are loaded and scanned in parallel; results are merged in input order.
///
/// # Errors
/// Returns the first error, in input order, of any module that cannot be loaded or that
/// declares a P/Invoke without an entry point.
pub fn scan<P: AsRef<Path> + Sync>(paths: &[P]) -> Result<ScanResult> {
    let per_module = paths
        .par_iter()
        .map(|path| scan_path(path.as_ref()))
        .collect::<Vec<_>>();

    let mut result = ScanResult::default();
    for module in per_module {
        result.extend(module?);
    }

    log::debug!(
        "Found {} pinvokes and {} callbacks in {} modules",
        result.native_calls.len(),
        result.callbacks.len(),
        paths.len()
    );

    Ok(result)
}

/// Load and scan a single module
///
/// # Errors
/// Returns an error if the module cannot be loaded or is not a valid interop declaration.
pub fn scan_path(path: &Path) -> Result<ScanResult> {
    log::info!("Collecting pinvokes from {}", path.display());

    let assembly = AssemblyMetadata::from_file(path)?;
    scan_assembly(&assembly)
}

/// Classify the methods of every type in `assembly`.
///
/// # Errors
/// Returns [`crate::Error::MissingEntryPoint`] for a P/Invoke without import data, and any
/// signature decoding error of an interop method.
pub fn scan_assembly(assembly: &AssemblyMetadata) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for ty in assembly.types() {
        for &index in &ty.methods {
            let method = &assembly.methods()[index];

            let marker = method
                .attributes
                .iter()
                .filter(|attribute| match attribute {
                    AttributeLookup::Unresolved { reason } => {
                        log::debug!(
                            "Skipping attribute on {}::{}: {reason}",
                            ty.name.full_name,
                            method.name
                        );
                        false
                    }
                    AttributeLookup::Resolved { .. } => true,
                })
                .find_map(MarkerKind::classify);

            if !method.is_pinvoke() && marker.is_none() {
                continue;
            }

            let descriptor: MethodDescriptorRc = Arc::new(assembly.method_descriptor(index)?);

            if method.is_pinvoke() {
                result
                    .native_calls
                    .push(native_call(method.import.as_ref(), &descriptor)?);
            }

            if let Some(marker) = marker {
                result
                    .callbacks
                    .push(CallbackDescriptor::new(descriptor, marker));
            }
        }
    }

    Ok(result)
}

fn native_call(
    import: Option<&ImportInfo>,
    method: &MethodDescriptorRc,
) -> Result<NativeCallDescriptor> {
    match import {
        Some(import) if !import.entry_point.is_empty() => Ok(NativeCallDescriptor {
            entry_point: import.entry_point.clone(),
            native_module: import.module.clone(),
            method: method.clone(),
        }),
        _ => Err(MissingEntryPoint {
            method: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ImageBuilder;

    fn load(builder: ImageBuilder) -> AssemblyMetadata {
        AssemblyMetadata::from_mem(builder.build()).unwrap()
    }

    #[test]
    fn classify_markers() {
        let resolved = |namespace: &str, name: &str| AttributeLookup::Resolved {
            namespace: namespace.into(),
            name: name.into(),
        };

        assert_eq!(
            MarkerKind::classify(&resolved(
                "System.Runtime.InteropServices",
                "UnmanagedCallersOnlyAttribute"
            )),
            Some(MarkerKind::UnmanagedCallersOnly)
        );
        assert_eq!(
            MarkerKind::classify(&resolved("", "UnmanagedCallersOnlyAttribute")),
            None
        );
        assert_eq!(
            MarkerKind::classify(&resolved("ObjCRuntime", "MonoPInvokeCallbackAttribute")),
            Some(MarkerKind::MonoPInvokeCallback)
        );
        assert_eq!(
            MarkerKind::classify(&resolved("", "MonoPInvokeCallbackAttribute")),
            Some(MarkerKind::MonoPInvokeCallback)
        );
        assert_eq!(
            MarkerKind::classify(&resolved("System", "ObsoleteAttribute")),
            None
        );
        assert_eq!(
            MarkerKind::classify(&AttributeLookup::Unresolved {
                reason: "missing".into()
            }),
            None
        );
    }

    #[test]
    fn finds_pinvokes() {
        let mut builder = ImageBuilder::new("Demo.App");
        builder.add_type("Demo", "Native");
        builder.add_pinvoke("Foo", &[0x00, 0x01, 0x0A, 0x0D], "libc", "foo_entry");
        builder.add_method("Managed", &[0x00, 0x00, 0x01]);

        let result = scan_assembly(&load(builder)).unwrap();
        assert_eq!(result.native_calls.len(), 1);
        assert!(result.callbacks.is_empty());

        let call = &result.native_calls[0];
        assert_eq!(call.entry_point, "foo_entry");
        assert_eq!(call.native_module, "libc");
        assert_eq!(call.method.name, "Foo");
        assert_eq!(call.method.return_type.name, "Int64");
        assert_eq!(call.method.parameters[0].name, "Double");
        assert_eq!(call.method.module_identity, "Demo.App");
    }

    #[test]
    fn finds_callbacks_once_per_method() {
        let mut builder = ImageBuilder::new("Callbacks");
        builder.add_type("Demo", "Handlers");
        let both = builder.add_method("Both", &[0x00, 0x01, 0x01, 0x08]);
        builder.add_attribute(both, "AOT", MONO_PINVOKE_CALLBACK);
        builder.add_attribute(
            both,
            "System.Runtime.InteropServices",
            "UnmanagedCallersOnlyAttribute",
        );
        let plain = builder.add_method("Plain", &[0x00, 0x00, 0x01]);
        builder.add_attribute(plain, "System", "ObsoleteAttribute");

        let result = scan_assembly(&load(builder)).unwrap();
        assert_eq!(result.callbacks.len(), 1);
        assert_eq!(result.callbacks[0].method.name, "Both");
        assert_eq!(result.callbacks[0].marker, MarkerKind::MonoPInvokeCallback);
        assert!(result.callbacks[0].trampoline_name.is_none());
    }

    #[test]
    fn locally_defined_marker() {
        let mut builder = ImageBuilder::new("Local");
        builder.add_type("AOT", MONO_PINVOKE_CALLBACK);
        let ctor = builder.add_method_with_flags(".ctor", &[0x20, 0x00, 0x01], 0x1886);
        builder.add_type("Demo", "Handlers");
        let callback = builder.add_method("OnTick", &[0x00, 0x00, 0x01]);
        builder.add_method_attribute(callback, ctor);

        let result = scan_assembly(&load(builder)).unwrap();
        assert_eq!(result.callbacks.len(), 1);
        assert_eq!(result.callbacks[0].method.declaring_type.name, "Handlers");
    }

    #[test]
    fn unresolved_attributes_do_not_abort() {
        let mut builder = ImageBuilder::new("Partial");
        builder.add_type("Demo", "Handlers");
        let method = builder.add_method("OnEvent", &[0x00, 0x00, 0x01]);
        builder.add_unresolvable_attribute(method);
        builder.add_attribute(
            method,
            "System.Runtime.InteropServices",
            "UnmanagedCallersOnlyAttribute",
        );
        let other = builder.add_method("Other", &[0x00, 0x00, 0x01]);
        builder.add_unresolvable_attribute(other);

        let result = scan_assembly(&load(builder)).unwrap();
        assert_eq!(result.callbacks.len(), 1);
        assert_eq!(result.callbacks[0].method.name, "OnEvent");
        assert_eq!(
            result.callbacks[0].marker,
            MarkerKind::UnmanagedCallersOnly
        );
    }

    #[test]
    fn pinvoke_and_callback_together() {
        let mut builder = ImageBuilder::new("Both");
        builder.add_type("Demo", "Native");
        let method = builder.add_pinvoke("Tick", &[0x00, 0x00, 0x01], "libtick", "tick");
        builder.add_attribute(method, "", MONO_PINVOKE_CALLBACK);

        let result = scan_assembly(&load(builder)).unwrap();
        assert_eq!(result.native_calls.len(), 1);
        assert_eq!(result.callbacks.len(), 1);
        assert!(Arc::ptr_eq(
            &result.native_calls[0].method,
            &result.callbacks[0].method
        ));
    }

    #[test]
    fn missing_entry_point_is_fatal() {
        let mut builder = ImageBuilder::new("Broken");
        builder.add_type("Demo", "Native");
        builder.add_method_with_flags("Orphan", &[0x00, 0x00, 0x01], 0x2096);

        match scan_assembly(&load(builder)) {
            Err(MissingEntryPoint { method }) => {
                assert_eq!(method, "Void Demo.Native::Orphan()");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_entry_point_is_fatal() {
        let mut builder = ImageBuilder::new("Broken");
        builder.add_type("Demo", "Native");
        builder.add_pinvoke("Nameless", &[0x00, 0x00, 0x01], "libc", "");

        assert!(matches!(
            scan_assembly(&load(builder)),
            Err(MissingEntryPoint { .. })
        ));
    }

    #[test]
    fn module_type_is_skipped() {
        let builder = ImageBuilder::new("Empty");
        let assembly = load(builder);

        assert_eq!(assembly.types().count(), 0);
        assert!(scan_assembly(&assembly).unwrap().is_empty());
    }

    #[test]
    fn scan_files_in_order() {
        let dir = tempfile::tempdir().unwrap();

        let mut paths = Vec::new();
        for (name, entry) in [("First", "first_entry"), ("Second", "second_entry")] {
            let mut builder = ImageBuilder::new(name);
            builder.add_type("Demo", "Native");
            builder.add_pinvoke("Call", &[0x00, 0x00, 0x01], "libc", entry);

            let path = dir.path().join(format!("{name}.dll"));
            std::fs::write(&path, builder.build()).unwrap();
            paths.push(path);
        }

        let result = scan(&paths).unwrap();
        let entries: Vec<_> = result
            .native_calls
            .iter()
            .map(|call| call.entry_point.as_str())
            .collect();
        assert_eq!(entries, ["first_entry", "second_entry"]);

        paths.push(dir.path().join("missing.dll"));
        assert!(scan(&paths).is_err());
    }
}

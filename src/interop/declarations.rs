//! C declarations and per-module import tables for native calls.
//!
//! Output is deterministic: declarations and table entries are ordered by entry point (byte
//! order, stable for equal names), and modules appear in the order they were first added to
//! the [`NativeModuleSet`].

use std::{collections::HashSet, fmt::Write};

use indexmap::{IndexMap, IndexSet};

use crate::interop::{scanner::NativeCallDescriptor, typemap::NativeType};

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// GENERATED FILE, DO NOT MODIFY";

/// Name of the method whose native declaration is fixed regardless of its signature
const ENUM_CALENDAR_INFO: &str = "EnumCalendarInfo";

/// The native modules whose imports are emitted, in caller order.
///
/// Adding a module twice keeps its first position.
///
/// ```rust
/// use pinvokegen::interop::declarations::NativeModuleSet;
///
/// let modules: NativeModuleSet = ["libc", "libSystem.Native", "libc"].into_iter().collect();
/// assert_eq!(modules.len(), 2);
/// assert!(modules.contains("libSystem.Native"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeModuleSet {
    modules: IndexSet<String>,
}

impl NativeModuleSet {
    /// An empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `module`; returns `false` if it was already present
    pub fn insert(&mut self, module: impl Into<String>) -> bool {
        self.modules.insert(module.into())
    }

    /// `true` if `module` is in the set
    #[must_use]
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    /// Modules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Number of modules
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// `true` if no module was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NativeModuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        NativeModuleSet {
            modules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for NativeModuleSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.modules.extend(iter.into_iter().map(Into::into));
    }
}

/// A name usable as a C identifier: every character outside `[A-Za-z0-9_]` becomes `_`
#[must_use]
pub fn module_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// The C prototype of one native call, e.g. `int64_t foo_entry (double);`
#[must_use]
pub fn declaration(call: &NativeCallDescriptor) -> String {
    if call.method.name == ENUM_CALENDAR_INFO {
        return format!("int {} (int, int, int, int, int);", call.entry_point);
    }

    let parameters = call
        .method
        .parameters
        .iter()
        .map(|parameter| NativeType::of(parameter).as_c())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{} {} ({parameters});",
        NativeType::of(&call.method.return_type),
        call.entry_point
    )
}

/// Render the declarations, the import tables and the table arrays for `modules`.
///
/// Calls into modules outside the set are ignored. Identical declarations are written once;
/// each entry point appears once per module table, annotated with every assembly that
/// imports it.
#[must_use]
pub fn emit_declarations(
    native_calls: &[NativeCallDescriptor],
    modules: &NativeModuleSet,
) -> String {
    let mut calls: Vec<&NativeCallDescriptor> = native_calls.iter().collect();
    calls.sort_by(|a, b| a.entry_point.cmp(&b.entry_point));

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");

    let mut written = HashSet::new();
    for call in calls.iter().filter(|call| modules.contains(&call.native_module)) {
        let text = declaration(call);
        if written.insert(text.clone()) {
            out.push_str(&text);
            out.push('\n');
        }
    }

    for module in modules.iter() {
        let mut entries: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for call in calls.iter().filter(|call| call.native_module == module) {
            entries
                .entry(call.entry_point.as_str())
                .or_default()
                .insert(call.method.module_identity.as_str());
        }

        let _ = writeln!(
            out,
            "static PinvokeImport {}_imports [] = {{",
            module_identifier(module)
        );
        for (entry_point, sources) in &entries {
            let sources = sources.iter().copied().collect::<Vec<_>>().join(", ");
            let _ = writeln!(out, "{{\"{entry_point}\", {entry_point}}}, // {sources}");
        }
        out.push_str("{NULL, NULL}\n};\n");
    }

    out.push_str("static void *pinvoke_tables[] = { ");
    for module in modules.iter() {
        let _ = write!(out, "{}_imports,", module_identifier(module));
    }
    out.push_str("};\n");

    out.push_str("static char *pinvoke_names[] = { ");
    for module in modules.iter() {
        let _ = write!(out, "\"{module}\",");
    }
    out.push_str("};\n");

    out
}

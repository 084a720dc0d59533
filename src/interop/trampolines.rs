//! Native-to-interpreter trampolines for callbacks.
//!
//! Each callback gets a C function with its native signature that boxes every argument by
//! address and forwards to the interpreter entry stored in `wasm_native_to_interp_ftndescs`.
//! The interpreter calling convention takes one `int*` slot per value: the return slot (when
//! the callback returns something), each parameter, and the descriptor's auxiliary argument.

use std::{collections::HashSet, fmt::Write};

use crate::{
    interop::{
        declarations::module_identifier,
        scanner::CallbackDescriptor,
        typemap::{is_blittable, NativeType},
    },
    Error::{DuplicateTrampoline, NonBlittableParameter, NonBlittableReturn},
    Result,
};

/// Prefix of every trampoline identifier
pub const TRAMPOLINE_PREFIX: &str = "wasm_native_to_interp_";

/// Check that every callback only passes blittable values across the boundary.
///
/// # Errors
/// Returns [`crate::Error::NonBlittableReturn`] or [`crate::Error::NonBlittableParameter`] for
/// the first offending callback.
pub fn validate(callbacks: &[CallbackDescriptor]) -> Result<()> {
    for callback in callbacks {
        let method = &callback.method;

        if !method.return_type.is_void() && !is_blittable(&method.return_type) {
            return Err(NonBlittableReturn {
                method: method.to_string(),
                type_name: method.return_type.full_name.clone(),
            });
        }

        if let Some((index, parameter)) = method
            .parameters
            .iter()
            .enumerate()
            .find(|(_, parameter)| !is_blittable(parameter))
        {
            return Err(NonBlittableParameter {
                method: method.to_string(),
                index,
                type_name: parameter.full_name.clone(),
            });
        }
    }

    Ok(())
}

/// `{module}_{type}_{method}`, the lookup key of a callback.
///
/// Compiler-generated names such as ``Box`1`` or `<Main>g__Cb|0_0` are mapped to C identifier
/// characters, like module names are.
#[must_use]
pub fn lookup_name(callback: &CallbackDescriptor) -> String {
    let method = &callback.method;
    format!(
        "{}_{}_{}",
        module_identifier(&method.module_identity),
        module_identifier(&method.declaring_type.name),
        module_identifier(&method.name)
    )
}

/// Sort `callbacks` into emission order and give each its trampoline identifier.
///
/// Emission order is by module identity, declaring type name, method name and token, so the
/// result does not depend on scan order.
///
/// # Errors
/// Returns [`crate::Error::DuplicateTrampoline`] if two callbacks derive the same identifier.
pub fn assign_trampoline_names(callbacks: &mut [CallbackDescriptor]) -> Result<()> {
    callbacks.sort_by(|a, b| {
        let (a, b) = (&a.method, &b.method);
        (&a.module_identity, &a.declaring_type.name, &a.name, a.token).cmp(&(
            &b.module_identity,
            &b.declaring_type.name,
            &b.name,
            b.token,
        ))
    });

    let mut seen = HashSet::with_capacity(callbacks.len());
    for callback in callbacks.iter_mut() {
        let name = format!("{TRAMPOLINE_PREFIX}{}", lookup_name(callback));
        if !seen.insert(name.clone()) {
            return Err(DuplicateTrampoline { name });
        }

        callback.trampoline_name = Some(name);
    }

    Ok(())
}

/// The trampoline of the callback in slot `index`
fn trampoline(index: usize, name: &str, callback: &CallbackDescriptor) -> String {
    let method = &callback.method;
    let return_type = NativeType::of(&method.return_type);
    let returns = !return_type.is_void();

    let slots = usize::from(returns) + method.parameters.len() + 1;
    let signature = vec!["int*"; slots].join(",");

    let parameters = method
        .parameters
        .iter()
        .enumerate()
        .map(|(arg, parameter)| format!("{} arg{arg}", NativeType::of(parameter)))
        .collect::<Vec<_>>()
        .join(",");

    let mut arguments = Vec::with_capacity(slots);
    if returns {
        arguments.push("&res".to_string());
    }
    arguments.extend((0..method.parameters.len()).map(|arg| format!("&arg{arg}")));
    arguments.push(format!("wasm_native_to_interp_ftndescs [{index}].arg"));

    let mut out = String::new();
    let _ = writeln!(out, "{return_type} {name} ({parameters}) {{");
    let _ = writeln!(out, "typedef void (*WasmInterpEntrySig_{index}) ({signature});");
    if returns {
        let _ = writeln!(out, "{return_type} res;");
    }
    let _ = writeln!(
        out,
        "((WasmInterpEntrySig_{index})wasm_native_to_interp_ftndescs [{index}].func) ({});",
        arguments.join(", ")
    );
    if returns {
        out.push_str("return res;\n");
    }
    out.push_str("}\n");
    out
}

/// Validate and name `callbacks`, then render the descriptor array, one trampoline per
/// callback and the two lookup arrays.
///
/// `callbacks` is left sorted in emission order with every trampoline name assigned.
///
/// # Errors
/// Returns the validation or naming error; nothing is rendered in that case.
pub fn emit_trampolines(callbacks: &mut [CallbackDescriptor]) -> Result<String> {
    validate(callbacks)?;
    assign_trampoline_names(callbacks)?;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "InterpFtnDesc wasm_native_to_interp_ftndescs[{}];",
        callbacks.len()
    );

    for (index, callback) in callbacks.iter().enumerate() {
        let name = callback.trampoline_name.as_deref().unwrap_or_default();
        out.push_str(&trampoline(index, name, callback));
    }

    out.push_str("static void *wasm_native_to_interp_funcs[] = { ");
    for callback in callbacks.iter() {
        let _ = write!(
            out,
            "{},",
            callback.trampoline_name.as_deref().unwrap_or_default()
        );
    }
    out.push_str("};\n");

    out.push_str("static const char *wasm_native_to_interp_map[] = { ");
    for callback in callbacks.iter() {
        let _ = writeln!(out, "\"{}\",", lookup_name(callback));
    }
    out.push_str("};\n");

    Ok(out)
}

use std::path::PathBuf;

use anyhow::Context;
use pinvokegen::{interop::scanner::scan, MarkerKind};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::expand_inputs,
    output::{print_output, TabWriter},
};

#[derive(Debug, Serialize)]
struct NativeCall {
    token: String,
    assembly: String,
    method: String,
    module: String,
    entry_point: String,
}

#[derive(Debug, Serialize)]
struct Callback {
    token: String,
    assembly: String,
    method: String,
    marker: &'static str,
}

#[derive(Debug, Serialize)]
struct ScanOutput {
    native_calls: Vec<NativeCall>,
    callbacks: Vec<Callback>,
}

fn marker_name(marker: MarkerKind) -> &'static str {
    match marker {
        MarkerKind::UnmanagedCallersOnly => "UnmanagedCallersOnly",
        MarkerKind::MonoPInvokeCallback => "MonoPInvokeCallback",
    }
}

pub fn run(assemblies: &[PathBuf], opts: &GlobalOptions) -> anyhow::Result<()> {
    let assemblies = expand_inputs(assemblies)?;
    let found = scan(&assemblies).context("failed to scan assemblies")?;

    let output = ScanOutput {
        native_calls: found
            .native_calls
            .iter()
            .map(|call| NativeCall {
                token: call.method.token.to_string(),
                assembly: call.method.module_identity.clone(),
                method: call.method.to_string(),
                module: call.native_module.clone(),
                entry_point: call.entry_point.clone(),
            })
            .collect(),
        callbacks: found
            .callbacks
            .iter()
            .map(|callback| Callback {
                token: callback.method.token.to_string(),
                assembly: callback.method.module_identity.clone(),
                method: callback.method.to_string(),
                marker: marker_name(callback.marker),
            })
            .collect(),
    };

    print_output(&output, opts, |out| {
        if out.native_calls.is_empty() {
            println!("P/Invokes: none");
        } else {
            println!("P/Invokes ({} entries):", out.native_calls.len());
            let mut tw = TabWriter::new(&["Token", "Assembly", "Module", "Entry point", "Method"])
            .indent("  ");
            for call in &out.native_calls {
                tw.row(vec![
                    call.token.clone(),
                    call.assembly.clone(),
                    call.module.clone(),
                    call.entry_point.clone(),
                    call.method.clone(),
                ]);
            }
            tw.print();
        }

        if out.callbacks.is_empty() {
            println!("\nCallbacks: none");
        } else {
            println!("\nCallbacks ({} entries):", out.callbacks.len());
            let mut tw = TabWriter::new(&["Token", "Assembly", "Marker", "Method"])
            .indent("  ");
            for callback in &out.callbacks {
                tw.row(vec![
                    callback.token.clone(),
                    callback.assembly.clone(),
                    callback.marker.to_string(),
                    callback.method.clone(),
                ]);
            }
            tw.print();
        }
    })
}

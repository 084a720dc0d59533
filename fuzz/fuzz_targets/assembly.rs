#![no_main]

use libfuzzer_sys::fuzz_target;
use pinvokegen::{interop::scanner::scan_assembly, metadata::assembly::AssemblyMetadata};

fuzz_target!(|data: &[u8]| {
    if let Ok(assembly) = AssemblyMetadata::from_mem(data.to_vec()) {
        let _ = scan_assembly(&assembly);
    }
});

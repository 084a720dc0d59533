//! P/Invoke discovery and C code generation.
//!
//! The pipeline runs leaf-first: [`scanner`] classifies methods into native calls and
//! callbacks, [`typemap`] maps managed types onto C scalars, and the two emitters render
//! text fragments: [`declarations`] for native calls and [`trampolines`] for callbacks.
//! [`generator`] composes them into the final artifact.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pinvokegen::interop::{
//!     declarations::{emit_declarations, NativeModuleSet},
//!     scanner::scan,
//!     trampolines::emit_trampolines,
//! };
//!
//! let mut found = scan(&["App.dll"])?;
//! let modules: NativeModuleSet = ["libc"].into_iter().collect();
//!
//! print!("{}", emit_declarations(&found.native_calls, &modules));
//! print!("{}", emit_trampolines(&mut found.callbacks)?);
//! # Ok::<(), pinvokegen::Error>(())
//! ```

pub mod declarations;
pub mod generator;
pub mod scanner;
pub mod trampolines;
pub mod typemap;

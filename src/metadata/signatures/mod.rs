//! Signature blobs (ECMA-335 II.23.2).

mod parser;
mod types;

pub use parser::SignatureParser;
pub use types::*;

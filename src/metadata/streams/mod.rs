//! Metadata streams: the stream directory, the heaps and the tables stream.

mod blob;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;

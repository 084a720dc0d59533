//! The metadata root (ECMA-335 II.24.2.1).
//!
//! The root starts with the `BSJB` signature, carries the runtime version string and the
//! directory of streams that hold heaps and tables.
//!
//! # Example
//!
//! ```rust
//! use pinvokegen::metadata::root::Root;
//!
//! let root = Root::read(&[
//!     0x42, 0x53, 0x4A, 0x42,
//!     0x01, 0x00,
//!     0x01, 0x00,
//!     0x00, 0x00, 0x00, 0x00,
//!     0x04, 0x00, 0x00, 0x00,
//!     b'v', b'4', 0x00, 0x00,
//!     0x00, 0x00,
//!     0x01, 0x00,
//!     0x20, 0x00, 0x00, 0x00,
//!     0x04, 0x00, 0x00, 0x00,
//!     0x23, 0x7E, 0x00, 0x00,
//! ])?;
//! assert_eq!(root.version, "v4");
//! assert_eq!(root.stream_headers[0].name, "#~");
//! # Ok::<(), pinvokegen::Error>(())
//! ```

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// `BSJB`
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The metadata root header with its stream directory.
#[derive(Debug, Clone)]
pub struct Root {
    /// Major version of the metadata format
    pub major_version: u16,
    /// Minor version of the metadata format
    pub minor_version: u16,
    /// Runtime version string, e.g. `v4.0.30319`
    pub version: String,
    /// All stream headers in directory order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parse the metadata root from the start of the metadata blob.
    ///
    /// # Errors
    /// Returns an error for a bad signature, a truncated header or streams that point outside
    /// of `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let mut offset = 4;
        let major_version = read_le_at::<u16>(data, &mut offset)?;
        let minor_version = read_le_at::<u16>(data, &mut offset)?;
        offset += 4;
        let version_length = read_le_at::<u32>(data, &mut offset)? as usize;

        let Some(version_end) = offset.checked_add(version_length) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_length
            ));
        };
        if version_end > data.len() {
            return Err(OutOfBounds);
        }

        let version_bytes = &data[offset..version_end];
        let version_len = version_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        // flags
        offset = version_end + 2;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || usize::from(stream_count) * 9 > data.len() {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers = Vec::with_capacity(usize::from(stream_count));
        for _ in 0..stream_count {
            if offset >= data.len() {
                return Err(OutOfBounds);
            }

            let header = StreamHeader::from(&data[offset..])?;
            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(OutOfBounds),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        header.offset,
                        header.size
                    ))
                }
            }

            offset += header.encoded_len();
            stream_headers.push(header);
        }

        Ok(Root {
            major_version,
            minor_version,
            version,
            stream_headers,
        })
    }

    /// Find a stream header by name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}

//! Stream directory entries of the metadata root (ECMA-335 II.24.2.2).

use crate::{file::io::read_le_at, Error::OutOfBounds, Result};

/// Longest stream name allowed, including the terminator
const MAX_NAME_LEN: usize = 32;

/// Location and name of one metadata stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Stream name, e.g. `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Parse a stream header from the start of `data`.
    ///
    /// # Errors
    /// Returns an error if the header is truncated or its name is not terminated within 32 bytes.
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let mut offset = 0;
        let stream_offset = read_le_at::<u32>(data, &mut offset)?;
        let size = read_le_at::<u32>(data, &mut offset)?;

        let name_area = &data[8..data.len().min(8 + MAX_NAME_LEN)];
        let Some(name_len) = name_area.iter().position(|&b| b == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };
        if name_len == 0 {
            return Err(malformed_error!("Stream header has an empty name"));
        }

        let name = String::from_utf8_lossy(&name_area[..name_len]).into_owned();

        Ok(StreamHeader {
            offset: stream_offset,
            size,
            name,
        })
    }

    /// Bytes this header occupies in the directory (name padded to 4 bytes)
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,
        ];

        let parsed = StreamHeader::from(&header_bytes).unwrap();

        assert_eq!(parsed.offset, 0x6C);
        assert_eq!(parsed.size, 0x45A4);
        assert_eq!(parsed.name, "#~");
        assert_eq!(parsed.encoded_len(), 12);
    }

    #[test]
    fn strings_name_padding() {
        let mut header_bytes = vec![0, 0, 0, 0, 0x10, 0, 0, 0];
        header_bytes.extend_from_slice(b"#Strings\0\0\0\0");

        let parsed = StreamHeader::from(&header_bytes).unwrap();
        assert_eq!(parsed.name, "#Strings");
        assert_eq!(parsed.encoded_len(), 20);
    }

    #[test]
    fn unterminated_name() {
        let mut header_bytes = vec![0_u8; 8];
        header_bytes.extend_from_slice(&[b'A'; 40]);

        assert!(StreamHeader::from(&header_bytes).is_err());
        assert!(matches!(StreamHeader::from(&[0_u8; 4]), Err(OutOfBounds)));
    }
}

//! The CLI header (`IMAGE_COR20_HEADER`, ECMA-335 II.25.3.3).
//!
//! The header is the target of PE data directory 14 and points at the metadata root. Only the
//! fields needed to reach metadata are kept; the rest are skipped over while reading.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Size in bytes of a well-formed CLI header
pub const COR20_HEADER_SIZE: usize = 72;

/// The parts of the CLI header that locate the metadata of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Major version of the runtime the image targets
    pub major_runtime_version: u16,
    /// Minor version of the runtime the image targets
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*` bits
    pub flags: u32,
    /// Token of the managed entry point, or a file index for native entry points
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Read the header from the bytes the CLR data directory points to.
    ///
    /// # Errors
    /// Returns an error if fewer than 72 bytes are available, if the `cb` field is not 72, or
    /// if the metadata location is zero.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < COR20_HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != COR20_HEADER_SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(malformed_error!(
                "CLR header has no metadata - rva: {}, size: {}",
                meta_data_rva,
                meta_data_size
            ));
        }

        let flags = parser.read_le::<u32>()?;
        let entry_point_token = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cb: u32, rva: u32, size: u32) -> Vec<u8> {
        let mut data = vec![0_u8; COR20_HEADER_SIZE];
        data[0..4].copy_from_slice(&cb.to_le_bytes());
        data[4..6].copy_from_slice(&2_u16.to_le_bytes());
        data[6..8].copy_from_slice(&5_u16.to_le_bytes());
        data[8..12].copy_from_slice(&rva.to_le_bytes());
        data[12..16].copy_from_slice(&size.to_le_bytes());
        data[16..20].copy_from_slice(&1_u32.to_le_bytes());
        data[20..24].copy_from_slice(&0x0600_0001_u32.to_le_bytes());
        data
    }

    #[test]
    fn crafted() {
        let parsed = Cor20Header::read(&header(72, 0x2050, 0x300)).unwrap();

        assert_eq!(parsed.major_runtime_version, 2);
        assert_eq!(parsed.minor_runtime_version, 5);
        assert_eq!(parsed.meta_data_rva, 0x2050);
        assert_eq!(parsed.meta_data_size, 0x300);
        assert_eq!(parsed.flags, 1);
        assert_eq!(parsed.entry_point_token, 0x0600_0001);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(Cor20Header::read(&header(64, 0x2050, 0x300)).is_err());
        assert!(Cor20Header::read(&header(72, 0, 0x300)).is_err());
        assert!(Cor20Header::read(&header(72, 0x2050, 0)).is_err());
        assert!(matches!(Cor20Header::read(&[0_u8; 16]), Err(OutOfBounds)));
    }
}

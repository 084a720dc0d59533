//! The `#Blob` heap (ECMA-335 II.24.2.4): length-prefixed binary values such as signatures
//! and custom attribute values.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Read-only view of the `#Blob` heap.
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Wrap the heap bytes. The first byte must be the empty blob.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with a null byte.
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.first() != Some(&0) {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob at `index`, without its compressed length prefix.
    ///
    /// # Errors
    /// Returns an error if the index or the encoded length points outside the heap.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;

        let Some(data_start) = index.checked_add(parser.pos()) else {
            return Err(OutOfBounds);
        };
        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };
        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        let mut data = vec![0x00, 0x04, 0x00, 0x01, 0x0A, 0x0D, 0x03, 0x20, 0x00, 0x01];
        // two-byte length prefix
        data.push(0x80);
        data.push(0x81);
        data.extend_from_slice(&[0xAB; 0x81]);

        let heap = Blob::from(&data).unwrap();

        assert_eq!(heap.get(0).unwrap(), &[] as &[u8]);
        assert_eq!(heap.get(1).unwrap(), &[0x00, 0x01, 0x0A, 0x0D]);
        assert_eq!(heap.get(6).unwrap(), &[0x20, 0x00, 0x01]);
        assert_eq!(heap.get(10).unwrap().len(), 0x81);
    }

    #[test]
    fn invalid() {
        assert!(Blob::from(&[]).is_err());
        assert!(Blob::from(&[0x01]).is_err());

        let heap = Blob::from(&[0x00, 0x05, 0x01]).unwrap();
        assert!(matches!(heap.get(1), Err(OutOfBounds)));
        assert!(matches!(heap.get(3), Err(OutOfBounds)));
    }
}

//! The `#Strings` heap (ECMA-335 II.24.2.3): null-terminated UTF-8 identifiers.

use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// Read-only view of the `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use pinvokegen::metadata::streams::Strings;
///
/// let heap = Strings::from(b"\0System\0Int32\0")?;
/// assert_eq!(heap.get(1)?, "System");
/// assert_eq!(heap.get(8)?, "Int32");
/// assert_eq!(heap.get(0)?, "");
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wrap the heap bytes. The first byte must be the empty string.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with a null byte.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.first() != Some(&0) {
            return Err(malformed_error!("Provided #Strings heap is invalid"));
        }

        Ok(Strings { data })
    }

    /// Get the string starting at `index`.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range or the string is not terminated UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        CStr::from_bytes_until_nul(&self.data[index..])
            .ok()
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| malformed_error!("Invalid string at index - {}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        let heap = Strings::from(b"\0<Module>\0NativeLib\0Sum\0").unwrap();

        assert_eq!(heap.get(0).unwrap(), "");
        assert_eq!(heap.get(1).unwrap(), "<Module>");
        assert_eq!(heap.get(10).unwrap(), "NativeLib");
        assert_eq!(heap.get(16).unwrap(), "Lib");
        assert_eq!(heap.get(20).unwrap(), "Sum");
    }

    #[test]
    fn invalid() {
        assert!(Strings::from(b"").is_err());
        assert!(Strings::from(b"A\0").is_err());

        let heap = Strings::from(b"\0Unterminated").unwrap();
        assert!(heap.get(1).is_err());
        assert!(matches!(heap.get(64), Err(OutOfBounds)));

        let heap = Strings::from(&[0x00, 0xFF, 0xFE, 0x00]).unwrap();
        assert!(heap.get(1).is_err());
    }
}

//! Memory-mapped backend for PE images on disk.

use super::Backend;
use crate::{
    Error::{FileError, OutOfBounds},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// Read-only memory map of a file on disk
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Open and map the file at `path`
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path).map_err(FileError)?;

        // The mapping is read-only; inputs are build artifacts that are not rewritten while
        // the generator runs.
        let mmap = unsafe { Mmap::map(&file) }.map_err(FileError)?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn physical() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(&[0x4D, 0x5A, 0x90, 0x00, 0x03]).unwrap();
        temp.flush().unwrap();

        let physical = Physical::new(temp.path()).unwrap();

        assert_eq!(physical.len(), 5);
        assert_eq!(physical.data()[0], 0x4D);
        assert_eq!(physical.data_slice(2, 3).unwrap(), &[0x90, 0x00, 0x03]);
        assert!(physical.data_slice(4, 2).is_err());
    }

    #[test]
    fn physical_missing_file() {
        match Physical::new("/nonexistent/path/to/file.dll") {
            Err(FileError(io_error)) => {
                assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileError"),
        }
    }
}

//! PE file access for .NET images.
//!
//! [`File`] owns the bytes of an image (memory-mapped from disk or handed over as a buffer),
//! parses the PE headers with `goblin` and exposes what the metadata reader needs: the CLR
//! runtime header directory and RVA to file offset translation.
//!
//! # Example
//!
//! ```rust,no_run
//! use pinvokegen::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("App.dll"))?;
//! let (clr_rva, clr_size) = file.clr();
//! let clr_offset = file.rva_to_offset(clr_rva)?;
//! let clr_data = file.data_slice(clr_offset, clr_size)?;
//! println!("CLR header starts with: {:02x?}", &clr_data[0..8]);
//! # Ok::<(), pinvokegen::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr, NotSupported},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Source of the raw bytes of a PE image.
pub trait Backend: Send + Sync {
    /// Returns a bounds-checked slice of `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns an error if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE file that carries a CLR runtime header.
///
/// Loading fails for images without an optional header or without the CLR runtime header data
/// directory, so every `File` is known to contain .NET metadata.
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory-maps and parses the PE file at `file`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE image, or has no CLR header
    /// ([`crate::Error::NotSupported`]).
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parses a PE image that is already in memory.
    ///
    /// # Errors
    /// Returns an error if the buffer is empty, is not a PE image, or has no CLR header
    /// ([`crate::Error::NotSupported`]).
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);

        File::try_new(data, |data| match PE::parse(data.data()) {
            Ok(pe) => match pe.header.optional_header {
                Some(optional_header) => {
                    if optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .is_none()
                    {
                        Err(NotSupported)
                    } else {
                        Ok(pe)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            },
            Err(error) => Err(GoblinErr(error)),
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.borrow_data().len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw bytes of the image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.borrow_data().data()
    }

    /// Returns a bounds-checked slice of the image.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.borrow_data().data_slice(offset, len)
    }

    /// Returns the RVA and size of the CLR runtime header.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            pe.header
                .optional_header
                .and_then(|optional_header| {
                    optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .map(|clr_dir| (clr_dir.virtual_address as usize, clr_dir.size as usize))
                })
                .unwrap_or((0, 0))
        })
    }

    /// Converts a relative virtual address to a file offset using the section table.
    ///
    /// # Errors
    /// Returns an error if no section contains `rva`.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}

//! Borrowed view over the metadata of a loaded image.
//!
//! [`CilAssemblyView`] keeps the [`File`] alive and exposes the CLI header, the metadata root,
//! the heaps and the tables stream as zero-copy views into the file bytes.

use ouroboros::self_referencing;
use std::{path::Path, sync::Arc};

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        root::Root,
        streams::{Blob, Strings, TablesHeader},
    },
    Result,
};

/// The parsed metadata structures, borrowing from the file bytes.
pub struct CilAssemblyViewData<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root with its stream directory
    pub metadata_root: Root,
    /// The `#~` or `#-` stream
    pub metadata_tables: Option<TablesHeader<'a>>,
    /// The `#Strings` heap
    pub strings: Option<Strings<'a>>,
    /// The `#Blob` heap
    pub blobs: Option<Blob<'a>>,
}

impl<'a> CilAssemblyViewData<'a> {
    /// Locate and parse the metadata of `file`.
    ///
    /// # Errors
    /// Returns an error if the CLI header, the metadata root or one of the streams is malformed.
    pub fn from_file(file: &'a File) -> Result<Self> {
        let (clr_rva, clr_size) = file.clr();
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let metadata_root = Root::read(metadata)?;

        let mut metadata_tables = None;
        let mut strings = None;
        let mut blobs = None;

        for stream in &metadata_root.stream_headers {
            let start = stream.offset as usize;
            let Some(stream_data) = start
                .checked_add(stream.size as usize)
                .and_then(|end| metadata.get(start..end))
            else {
                return Err(malformed_error!(
                    "Stream {} exceeds the metadata - {} + {}",
                    stream.name,
                    stream.offset,
                    stream.size
                ));
            };

            match stream.name.as_str() {
                "#~" | "#-" => metadata_tables = Some(TablesHeader::from(stream_data)?),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                _ => {}
            }
        }

        Ok(CilAssemblyViewData {
            cor20header,
            metadata_root,
            metadata_tables,
            strings,
            blobs,
        })
    }
}

#[self_referencing]
/// A loaded image together with borrowed views of its metadata.
pub struct CilAssemblyView {
    file: Arc<File>,
    #[borrows(file)]
    #[not_covariant]
    data: CilAssemblyViewData<'this>,
}

impl CilAssemblyView {
    /// Load and parse the image at `file`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its metadata is malformed.
    pub fn from_file(file: &Path) -> Result<Self> {
        Self::load(Arc::new(File::from_file(file)?))
    }

    /// Parse an image held in memory.
    ///
    /// # Errors
    /// Returns an error if the image or its metadata is malformed.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::load(Arc::new(File::from_mem(data)?))
    }

    fn load(file: Arc<File>) -> Result<Self> {
        CilAssemblyView::try_new(file, |file| CilAssemblyViewData::from_file(file))
    }

    /// Run `f` with access to the parsed metadata
    pub fn with_view<R>(&self, f: impl FnOnce(&CilAssemblyViewData<'_>) -> R) -> R {
        self.with_data(|data| f(data))
    }

    /// The CLI header
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        self.with_data(|data| &data.cor20header)
    }

    /// The metadata root
    #[must_use]
    pub fn metadata_root(&self) -> &Root {
        self.with_data(|data| &data.metadata_root)
    }

    /// The underlying file
    #[must_use]
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }
}

//! Generic table machinery shared by all typed rows.
//!
//! [`MetadataTable`] is a lazily decoded view over the rows of one table; rows are only parsed
//! when they are requested through [`MetadataTable::get`] or iteration.

mod codedindex;
mod schema;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::Result;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use schema::Column;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

/// A row type that can be decoded out of a metadata table.
pub trait RowReadable: Sized + Send {
    /// The table this row type is stored in
    const TABLE_ID: TableId;

    /// Decode the row `rid` starting at `offset`, advancing `offset` past it.
    ///
    /// # Errors
    /// Returns an error if the row is truncated or holds an invalid coded index.
    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self>;
}

/// Typed view over the rows of one metadata table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows stored at the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too short for all rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = sizes.row_size(T::TABLE_ID);
        if u64::from(row_count) * u64::from(row_size) > data.len() as u64 {
            return Err(crate::Error::OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode row `rid` (1-based).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for a row outside the table, or a decoding error.
    pub fn get(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(crate::Error::OutOfBounds);
        }

        let mut offset = (rid as usize - 1) * self.row_size as usize;
        T::read_row(self.data, &mut offset, rid, &self.sizes)
    }

    /// Iterate over all rows in order
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 1,
        }
    }
}

impl<'t, 'a, T: RowReadable> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = Result<T>;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rows of a [`MetadataTable`].
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.table.row_count {
            return None;
        }

        let row = self.table.get(self.current_row);
        self.current_row += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.table.row_count + 1).saturating_sub(self.current_row) as usize;
        (remaining, Some(remaining))
    }
}

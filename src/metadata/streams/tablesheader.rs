//! The tables stream header (`#~` or `#-`, ECMA-335 II.24.2.6).
//!
//! The header lists which tables are present and their row counts. All tables follow it back to
//! back in [`TableId`] order; their offsets are derived from the row sizes in [`TableInfo`].

use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

/// `HeapSizes` bit announcing 4 extra bytes after the row counts
const EXTRA_DATA_FLAG: u8 = 0x40;

/// Parsed header of the tables stream with the location of every table.
pub struct TablesHeader<'a> {
    /// Major version of the table schema
    pub major_version: u8,
    /// Minor version of the table schema
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    tables: Vec<Option<(usize, u32)>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the header and locate all tables within `data`.
    ///
    /// # Errors
    /// Returns an error if no table is present or the tables do not fit into the stream.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let heap_sizes = read_le::<u8>(&data[6..])?;
        let valid = read_le::<u64>(&data[8..])?;
        if valid == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let (info, mut offset) = TableInfo::new(data, valid, heap_sizes)?;
        if heap_sizes & EXTRA_DATA_FLAG != 0 {
            offset += 4;
        }

        let mut tables = vec![None; TableId::COUNT];
        for table_id in TableId::iter() {
            let rows = info.get(table_id).rows;
            if rows == 0 {
                continue;
            }

            let size = u64::from(rows) * u64::from(info.row_size(table_id));
            let Some(end) = (offset as u64).checked_add(size) else {
                return Err(OutOfBounds);
            };
            if end > data.len() as u64 {
                return Err(OutOfBounds);
            }

            tables[table_id as usize] = Some((offset, rows));
            offset = end as usize;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info: Arc::new(info),
            data,
            tables,
        })
    }

    /// Number of tables present in the stream
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Row count of `table_id`, `0` if the table is absent
    #[must_use]
    pub fn rows(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Typed access to the table holding rows of type `T`
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let (offset, rows) = self.tables.get(T::TABLE_ID as usize).copied().flatten()?;
        MetadataTable::new(&self.data[offset..], rows, self.info.clone()).ok()
    }
}

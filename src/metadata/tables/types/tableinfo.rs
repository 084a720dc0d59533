use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::{CodedIndexType, Column, TableId},
    Error::OutOfBounds,
    Result,
};

/// Row count of one table and the width of indexes into it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to store any row index of this table
    pub bits: u8,
    /// `true` if indexes into this table take 4 bytes
    pub is_large: bool,
}

impl TableRowInfo {
    /// Compute the index width for a table with `rows` rows
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Sizing information for all tables and heap indexes of a `#~` stream.
///
/// Every column that references a heap or a table is 2 or 4 bytes wide depending on the size
/// of its target, so the row layout of a module is only known once all row counts are read.
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared reference to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read the row counts that follow the fixed tables header.
    ///
    /// Tables with a bit set in `valid` beyond the known range still carry a row count, which
    /// is consumed so the returned offset points at the first table row.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row counts are truncated.
    pub fn new(data: &[u8], valid_bitvec: u64, heap_size_flags: u8) -> Result<(Self, usize)> {
        let mut rows = vec![TableRowInfo::default(); TableId::COUNT];
        let mut offset = 24;

        for bit in 0..64_usize {
            if valid_bitvec & (1_u64 << bit) == 0 {
                continue;
            }

            if offset + 4 > data.len() {
                return Err(OutOfBounds);
            }

            let row_count = read_le_at::<u32>(data, &mut offset)?;
            if let Some(info) = rows.get_mut(bit) {
                *info = TableRowInfo::new(row_count);
            }
        }

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 0x01 != 0,
            is_large_index_guid: heap_size_flags & 0x02 != 0,
            is_large_index_blob: heap_size_flags & 0x04 != 0,
        };
        table_info.calculate_coded_index_bits();

        Ok((table_info, offset))
    }

    #[cfg(test)]
    pub(crate) fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table, rows) in valid_tables {
            table_info.rows[*table as usize] = TableRowInfo::new(*rows);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Row information for `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// `true` if indexes into `table` are 4 bytes
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows[table as usize].is_large
    }

    /// `true` if `#Strings` indexes are 4 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// `true` if `#GUID` indexes are 4 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// `true` if `#Blob` indexes are 4 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a coded index of `coded_index_type`
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Width of one column
    #[must_use]
    pub fn column_bytes(&self, column: Column) -> u8 {
        let wide = |large: bool| if large { 4 } else { 2 };

        match column {
            Column::U16 => 2,
            Column::U32 => 4,
            Column::Str => wide(self.is_large_index_str),
            Column::Guid => wide(self.is_large_index_guid),
            Column::Blob => wide(self.is_large_index_blob),
            Column::Index(table) => wide(self.is_large(table)),
            Column::Coded(coded_index_type) => self.coded_index_bytes(coded_index_type),
        }
    }

    /// Size in bytes of one row of `table`
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        table
            .columns()
            .iter()
            .map(|column| u32::from(self.column_bytes(*column)))
            .sum()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index_type in CodedIndexType::iter() {
            let max_bits = coded_index_type
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index_type as usize] = max_bits + coded_index_type.tag_bits();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_row_sizes() {
        let info = TableInfo::new_test(
            &[(TableId::TypeDef, 3), (TableId::MethodDef, 5)],
            false,
            false,
            false,
        );

        assert_eq!(info.row_size(TableId::Module), 10);
        assert_eq!(info.row_size(TableId::TypeRef), 6);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::MethodDef), 14);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
        assert_eq!(info.row_size(TableId::ImplMap), 8);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::AssemblyRef), 20);
    }

    #[test]
    fn large_heaps_and_tables() {
        let info = TableInfo::new_test(&[(TableId::MethodDef, 0x1_0000)], true, true, true);

        assert!(info.is_large(TableId::MethodDef));
        assert!(!info.is_large(TableId::TypeDef));
        // 4 + 2 + 2 + str 4 + blob 4 + param 2
        assert_eq!(info.row_size(TableId::MethodDef), 18);
        // MethodDef needs 17 bits plus 5 tag bits
        assert_eq!(info.coded_index_bytes(CodedIndexType::HasCustomAttribute), 4);
        assert_eq!(info.coded_index_bytes(CodedIndexType::TypeDefOrRef), 2);
        assert_eq!(info.row_size(TableId::Module), 2 + 4 + 4 + 4 + 4);
    }

    #[test]
    fn coded_index_threshold() {
        // 2^11 rows need 12 bits; with 5 tag bits that is 17
        let info = TableInfo::new_test(&[(TableId::Param, 2048)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexType::HasCustomAttribute), 4);

        let info = TableInfo::new_test(&[(TableId::Param, 2047)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexType::HasCustomAttribute), 2);
    }

    #[test]
    fn reads_row_counts() {
        let mut data = vec![0_u8; 24];
        data.extend_from_slice(&1_u32.to_le_bytes());
        data.extend_from_slice(&7_u32.to_le_bytes());
        data.extend_from_slice(&9_u32.to_le_bytes());

        let valid = TableId::Module.bit() | TableId::MethodDef.bit() | (1_u64 << 0x30);
        let (info, offset) = TableInfo::new(&data, valid, 0x01).unwrap();

        assert_eq!(offset, 36);
        assert_eq!(info.get(TableId::Module).rows, 1);
        assert_eq!(info.get(TableId::MethodDef).rows, 7);
        assert!(info.is_large_str());
        assert!(!info.is_large_blob());

        assert!(matches!(
            TableInfo::new(&data[..30], valid, 0),
            Err(OutOfBounds)
        ));
    }
}

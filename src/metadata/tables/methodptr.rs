//! The `MethodPtr` indirection table (0x05), present in unoptimized `#-` streams.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `MethodPtr` row.
#[derive(Clone, Debug)]
pub struct MethodPtrRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// The `MethodDef` row this slot stands for
    pub method: u32,
}

impl RowReadable for MethodPtrRaw {
    const TABLE_ID: TableId = TableId::MethodPtr;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MethodPtrRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            method: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

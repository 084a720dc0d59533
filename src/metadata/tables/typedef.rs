//! The `TypeDef` table (0x02): types defined in this module.
//!
//! Each row owns a contiguous run of methods, from its `method_list` up to the `method_list`
//! of the next row (or the end of the `MethodDef` table for the last row).

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// Mask of the visibility bits in `TypeAttributes`
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;

/// A raw `TypeDef` row.
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `TypeAttributes`
    pub flags: u32,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
    /// Base type
    pub extends: CodedIndex,
    /// First row of the `Field` list
    pub field_list: u32,
    /// First row of the `MethodDef` (or `MethodPtr`) list
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    const TABLE_ID: TableId = TableId::TypeDef;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeDefRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            flags: read_le_at::<u32>(data, offset)?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            extends: CodedIndex::read(data, offset, sizes, CodedIndexType::TypeDefOrRef)?,
            field_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

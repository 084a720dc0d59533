//! The `MemberRef` table (0x0A): references to fields and methods of other types, including
//! the constructors of attributes defined outside the module.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `MemberRef` row.
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Owner of the member
    pub class: CodedIndex,
    /// `#Strings` index of the member name
    pub name: u32,
    /// `#Blob` index of the member signature
    pub signature: u32,
}

impl RowReadable for MemberRefRaw {
    const TABLE_ID: TableId = TableId::MemberRef;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            class: CodedIndex::read(data, offset, sizes, CodedIndexType::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

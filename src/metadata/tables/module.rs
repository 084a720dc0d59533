//! The `Module` table (0x00): one row naming the module itself.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `Module` row.
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Reserved, always zero
    pub generation: u32,
    /// `#Strings` index of the module file name
    pub name: u32,
    /// `#GUID` index of the module version id
    pub mvid: u32,
    /// `#GUID` index, edit and continue
    pub encid: u32,
    /// `#GUID` index, edit and continue
    pub encbaseid: u32,
}

impl RowReadable for ModuleRaw {
    const TABLE_ID: TableId = TableId::Module;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ModuleRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            generation: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            mvid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encbaseid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }
}

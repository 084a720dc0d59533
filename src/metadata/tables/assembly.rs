//! The `Assembly` table (0x20): at most one row, present in manifest modules.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `Assembly` row.
#[derive(Clone, Debug)]
pub struct AssemblyRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `AssemblyHashAlgorithm`
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u32,
    /// Minor version
    pub minor_version: u32,
    /// Build number
    pub build_number: u32,
    /// Revision number
    pub revision_number: u32,
    /// `AssemblyFlags`
    pub flags: u32,
    /// `#Blob` index of the public key
    pub public_key: u32,
    /// `#Strings` index of the simple assembly name
    pub name: u32,
    /// `#Strings` index of the culture
    pub culture: u32,
}

impl RowReadable for AssemblyRaw {
    const TABLE_ID: TableId = TableId::Assembly;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            hash_alg_id: read_le_at::<u32>(data, offset)?,
            major_version: u32::from(read_le_at::<u16>(data, offset)?),
            minor_version: u32::from(read_le_at::<u16>(data, offset)?),
            build_number: u32::from(read_le_at::<u16>(data, offset)?),
            revision_number: u32::from(read_le_at::<u16>(data, offset)?),
            flags: read_le_at::<u32>(data, offset)?,
            public_key: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

//! The `TypeSpec` table (0x1B): constructed types such as generic instances.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `TypeSpec` row.
#[derive(Clone, Debug)]
pub struct TypeSpecRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `#Blob` index of the type signature
    pub signature: u32,
}

impl RowReadable for TypeSpecRaw {
    const TABLE_ID: TableId = TableId::TypeSpec;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeSpecRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::MetadataTable;

    #[test]
    fn crafted_short() {
        let data = vec![0x01, 0x00, 0x09, 0x00];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 2)], false, false, false));
        let table = MetadataTable::<TypeSpecRaw>::new(&data, 2, sizes).unwrap();

        assert_eq!(table.get(2).unwrap().signature, 9);
        assert_eq!(table.get(2).unwrap().token.value(), 0x1B00_0002);
    }
}

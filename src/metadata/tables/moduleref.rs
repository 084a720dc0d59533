//! The `ModuleRef` table (0x1A): native and managed modules referenced by name.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `ModuleRef` row.
#[derive(Clone, Debug)]
pub struct ModuleRefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `#Strings` index of the module name
    pub name: u32,
}

impl RowReadable for ModuleRefRaw {
    const TABLE_ID: TableId = TableId::ModuleRef;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ModuleRefRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::MetadataTable;

    #[test]
    fn crafted_long() {
        let data = vec![0x01, 0x02, 0x03, 0x00];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::ModuleRef, 1)], true, false, false));
        let table = MetadataTable::<ModuleRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x1A00_0001);
        assert_eq!(row.name, 0x0003_0201);
    }
}

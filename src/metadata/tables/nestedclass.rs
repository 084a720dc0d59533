//! The `NestedClass` table (0x29): links nested types to their enclosing type.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `NestedClass` row.
#[derive(Clone, Debug)]
pub struct NestedClassRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `TypeDef` row of the nested type
    pub nested_class: u32,
    /// `TypeDef` row of the enclosing type
    pub enclosing_class: u32,
}

impl RowReadable for NestedClassRaw {
    const TABLE_ID: TableId = TableId::NestedClass;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(NestedClassRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            nested_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            enclosing_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
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
        let data = vec![0x03, 0x00, 0x02, 0x00];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::NestedClass, 1), (TableId::TypeDef, 3)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<NestedClassRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.nested_class, 3);
        assert_eq!(row.enclosing_class, 2);
        assert_eq!(row.token.value(), 0x2900_0001);
    }
}

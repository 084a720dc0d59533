//! The `TypeRef` table (0x01): types defined in other modules or assemblies.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `TypeRef` row.
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Module, `ModuleRef`, `AssemblyRef` or enclosing `TypeRef` for nested types
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}

impl RowReadable for TypeRefRaw {
    const TABLE_ID: TableId = TableId::TypeRef;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            resolution_scope: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::ResolutionScope,
            )?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
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
        let data = vec![
            0x06, 0x00, // resolution_scope (tag 2 = AssemblyRef, row 1)
            0x10, 0x00, // type_name
            0x20, 0x00, // type_namespace
            0x0F, 0x00, // resolution_scope (tag 3 = TypeRef, row 3)
            0x11, 0x00, // type_name
            0x00, 0x00, // type_namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, 3), (TableId::AssemblyRef, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<TypeRefRaw>::new(&data, 2, sizes).unwrap();

        let rows: Vec<TypeRefRaw> = table.iter().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resolution_scope.tag, TableId::AssemblyRef);
        assert_eq!(rows[0].type_name, 0x10);
        assert_eq!(rows[0].type_namespace, 0x20);
        assert_eq!(rows[1].token.value(), 0x0100_0002);
        assert_eq!(rows[1].resolution_scope, CodedIndex::new(TableId::TypeRef, 3));
    }
}

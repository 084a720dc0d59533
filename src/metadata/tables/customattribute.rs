//! The `CustomAttribute` table (0x0C).

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `CustomAttribute` row.
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// The entity the attribute is applied to
    pub parent: CodedIndex,
    /// The attribute constructor, a `MethodDef` or `MemberRef`
    pub constructor: CodedIndex,
    /// `#Blob` index of the encoded arguments
    pub value: u32,
}

impl RowReadable for CustomAttributeRaw {
    const TABLE_ID: TableId = TableId::CustomAttribute;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(CustomAttributeRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasCustomAttribute)?,
            constructor: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::CustomAttributeType,
            )?,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
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
            0x40, 0x00, // parent (tag 0 = MethodDef, row 2)
            0x0B, 0x00, // constructor (tag 3 = MemberRef, row 1)
            0x07, 0x00, // value
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[
                (TableId::CustomAttribute, 1),
                (TableId::MethodDef, 2),
                (TableId::MemberRef, 1),
            ],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<CustomAttributeRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x0C00_0001);
        assert_eq!(row.parent, CodedIndex::new(TableId::MethodDef, 2));
        assert_eq!(row.constructor, CodedIndex::new(TableId::MemberRef, 1));
        assert_eq!(row.value, 7);
    }

    #[test]
    fn invalid_constructor_tag() {
        let data = vec![0x40, 0x00, 0x0F, 0x00, 0x07, 0x00];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::CustomAttribute, 1), (TableId::MethodDef, 2)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<CustomAttributeRaw>::new(&data, 1, sizes).unwrap();

        assert!(table.get(1).is_err());
    }
}

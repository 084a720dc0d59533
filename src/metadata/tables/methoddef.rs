//! The `MethodDef` table (0x06).

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// A raw `MethodDef` row.
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// RVA of the method body, `0` for abstract, runtime and P/Invoke methods
    pub rva: u32,
    /// `MethodImplAttributes`
    pub impl_flags: u32,
    /// `MethodAttributes`
    pub flags: u32,
    /// `#Strings` index of the method name
    pub name: u32,
    /// `#Blob` index of the `MethodDefSig`
    pub signature: u32,
    /// First row of the `Param` list
    pub param_list: u32,
}

impl RowReadable for MethodDefRaw {
    const TABLE_ID: TableId = TableId::MethodDef;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: u32::from(read_le_at::<u16>(data, offset)?),
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
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
            0x00, 0x00, 0x00, 0x00, // rva
            0x80, 0x00, // impl_flags (PreserveSig)
            0x96, 0x20, // flags (PinvokeImpl | HideBySig | Static | Public)
            0x22, 0x00, // name
            0x01, 0x00, // signature
            0x01, 0x00, // param_list
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::MethodDef, 1)], false, false, false));
        let table = MetadataTable::<MethodDefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x0600_0001);
        assert_eq!(row.rva, 0);
        assert_eq!(row.impl_flags, 0x80);
        assert_eq!(row.flags, 0x2096);
        assert_eq!(row.name, 0x22);
        assert_eq!(row.signature, 1);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x50, 0x20, 0x00, 0x00, // rva
            0x00, 0x00, // impl_flags
            0x06, 0x00, // flags
            0x22, 0x00, 0x01, 0x00, // name
            0x10, 0x00, 0x02, 0x00, // signature
            0x01, 0x00, 0x00, 0x00, // param_list
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MethodDef, 1), (TableId::Param, 0x1_0000)],
            true,
            true,
            false,
        ));
        let table = MetadataTable::<MethodDefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.rva, 0x2050);
        assert_eq!(row.name, 0x0001_0022);
        assert_eq!(row.signature, 0x0002_0010);
        assert_eq!(row.param_list, 1);
    }
}

//! The `ImplMap` table (0x1C): P/Invoke mapping of a method to a native module and entry point.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
        token::Token,
    },
    Result,
};

#[allow(non_snake_case)]
/// Flags of the `mapping_flags` column (ECMA-335 II.23.1.8)
pub mod PInvokeAttributes {
    /// Use the member name as specified
    pub const NO_MANGLE: u32 = 0x0001;
    /// Mask of the character set bits
    pub const CHAR_SET_MASK: u32 = 0x0006;
    /// Marshal strings as ANSI
    pub const CHAR_SET_ANSI: u32 = 0x0002;
    /// Marshal strings as UTF-16
    pub const CHAR_SET_UNICODE: u32 = 0x0004;
    /// Callee sets the last error
    pub const SUPPORTS_LAST_ERROR: u32 = 0x0040;
    /// Mask of the calling convention bits
    pub const CALL_CONV_MASK: u32 = 0x0700;
    /// Platform default calling convention
    pub const CALL_CONV_WINAPI: u32 = 0x0100;
    /// `cdecl`
    pub const CALL_CONV_CDECL: u32 = 0x0200;
    /// `stdcall`
    pub const CALL_CONV_STDCALL: u32 = 0x0300;
    /// `thiscall`
    pub const CALL_CONV_THISCALL: u32 = 0x0400;
    /// `fastcall`
    pub const CALL_CONV_FASTCALL: u32 = 0x0500;
}

/// A raw `ImplMap` row.
#[derive(Clone, Debug)]
pub struct ImplMapRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// `PInvokeAttributes`
    pub mapping_flags: u32,
    /// The forwarded member; only `MethodDef` is valid
    pub member_forwarded: CodedIndex,
    /// `#Strings` index of the native entry point name
    pub import_name: u32,
    /// `ModuleRef` row of the native module
    pub import_scope: u32,
}

impl RowReadable for ImplMapRaw {
    const TABLE_ID: TableId = TableId::ImplMap;

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ImplMapRaw {
            rid,
            token: Token::from_parts(Self::TABLE_ID.id(), rid),
            mapping_flags: u32::from(read_le_at::<u16>(data, offset)?),
            member_forwarded: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::MemberForwarded,
            )?,
            import_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            import_scope: read_le_at_dyn(data, offset, sizes.is_large(TableId::ModuleRef))?,
        })
    }
}

use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfo},
        token::Token,
    },
    Error::OutOfBounds,
    Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// A coded index stores a row number shifted left by a small tag that selects the target table
/// from a fixed list.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum CodedIndexType {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// Target tables, indexed by tag value
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            // Tags 0, 1 and 4 are reserved; 2 is MethodDef and 3 is MemberRef
            CodedIndexType::CustomAttributeType => &[
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MemberRef,
                TableId::MemberRef,
            ],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }

    /// Number of low bits holding the tag
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let count = self.tables().len();
        (usize::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// A decoded coded index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The table selected by the tag
    pub tag: TableId,
    /// 1-based row in `tag`, `0` for a null reference
    pub row: u32,
    /// Token equivalent of `tag` and `row`
    pub token: Token,
}

impl CodedIndex {
    /// Read a coded index of type `ci_type` at `offset`, advancing it.
    ///
    /// # Errors
    /// Returns an error if the read is out of bounds or the tag is not valid for `ci_type`.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfo,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let value = read_le_at_dyn(data, offset, info.coded_index_bytes(ci_type) == 4)?;
        Self::decode(value, ci_type)
    }

    /// Split a raw coded index value into its table and row.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the tag does not select a table.
    pub fn decode(value: u32, ci_type: CodedIndexType) -> Result<Self> {
        let tables = ci_type.tables();
        let tag_bits = ci_type.tag_bits();
        let tag = (value & ((1 << tag_bits) - 1)) as usize;

        let Some(table) = tables.get(tag) else {
            return Err(OutOfBounds);
        };

        Ok(CodedIndex::new(*table, value >> tag_bits))
    }

    /// Build a coded index pointing at `row` of `tag`
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_parts(tag.id(), row),
        }
    }
}

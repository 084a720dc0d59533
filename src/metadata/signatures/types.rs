use crate::metadata::token::Token;

/// A type as encoded in a signature blob (ECMA-335 II.23.2.12).
///
/// Custom modifiers are consumed by the parser and not represented.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TypeSignature {
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    I,
    U,
    String,
    Object,
    TypedByRef,
    Ptr(Box<TypeSignature>),
    ByRef(Box<TypeSignature>),
    /// A `TypeDefOrRef` token of a value type
    ValueType(Token),
    /// A `TypeDefOrRef` token of a reference type
    Class(Token),
    /// `!n`, a generic parameter of the declaring type
    GenericParamType(u32),
    /// `!!n`, a generic parameter of the method
    GenericParamMethod(u32),
    Array(SignatureArray),
    SzArray(Box<TypeSignature>),
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    FnPtr(Box<SignatureMethod>),
    Pinned(Box<TypeSignature>),
}

/// A general array with its rank; sizes and bounds are not kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
}

/// A return type or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameter {
    /// `true` if the parameter is passed by reference
    pub by_ref: bool,
    /// The type, without the by-ref marker
    pub base: TypeSignature,
}

/// A method signature (`MethodDefSig`, `MethodRefSig`, `StandAloneMethodSig`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMethod {
    /// Instance method
    pub has_this: bool,
    /// `this` is passed explicitly as the first parameter
    pub explicit_this: bool,
    /// Low 4 bits of the calling convention byte
    pub calling_convention: u8,
    /// Number of method generic parameters
    pub param_count_generic: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Fixed parameters
    pub params: Vec<SignatureParameter>,
    /// Parameters after the vararg sentinel
    pub varargs: Vec<SignatureParameter>,
}

/// The type held by a `TypeSpec` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTypeSpec {
    /// The constructed type
    pub base: TypeSignature,
}

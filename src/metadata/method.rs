//! Method descriptors: the read-only view of one method that the interop layer works with.

use bitflags::bitflags;
use std::{fmt, sync::Arc};

use crate::metadata::{token::Token, typesystem::TypeDescriptor};

/// Mask of the member access bits
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// `MethodAttributes` (ECMA-335 II.23.1.10), without the access bits
    pub struct MethodAttributes: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new vtable slot
        const NEW_SLOT = 0x0100;
        /// Method can only be overridden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Runtime-special name, e.g. `.ctor`
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through P/Invoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security attached
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}

impl MethodAttributes {
    /// Keep the known flag bits of a raw `MethodDef.flags` value
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK)
    }
}

/// The type that declares a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclaringType {
    /// Namespace of the outermost enclosing type
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Full name with `+` between nesting levels
    pub full_name: String,
}

/// Read-only view of one method, shared between interop descriptors.
///
/// ```rust
/// use pinvokegen::metadata::{
///     method::{DeclaringType, MethodDescriptor},
///     token::Token,
///     typesystem::TypeDescriptor,
/// };
///
/// let method = MethodDescriptor {
///     declaring_type: DeclaringType {
///         namespace: "Demo".into(),
///         name: "Native".into(),
///         full_name: "Demo.Native".into(),
///     },
///     name: "Sum".into(),
///     return_type: TypeDescriptor::primitive("Int64"),
///     parameters: vec![TypeDescriptor::primitive("Double")],
///     module_identity: "Demo.App".into(),
///     token: Token::new(0x0600_0002),
/// };
///
/// assert_eq!(method.to_string(), "Int64 Demo.Native::Sum(Double)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// The declaring type
    pub declaring_type: DeclaringType,
    /// Method name
    pub name: String,
    /// Return type, `System.Void` for none
    pub return_type: TypeDescriptor,
    /// Parameter types in declaration order
    pub parameters: Vec<TypeDescriptor>,
    /// Identity of the module that defines the method
    pub module_identity: String,
    /// `MethodDef` token
    pub token: Token,
}

/// Shared reference to a [`MethodDescriptor`]
pub type MethodDescriptorRc = Arc<MethodDescriptor>;

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}::{}(",
            self.return_type.name, self.declaring_type.full_name, self.name
        )?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&parameter.name)?;
        }
        f.write_str(")")
    }
}

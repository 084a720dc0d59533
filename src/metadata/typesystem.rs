//! Managed type descriptors as seen through reflection.
//!
//! A [`TypeDescriptor`] carries the reflection-style names of a type (`Int32`, `Int32&`,
//! `Byte*`, `String[]`, `Span`1`) together with its [`TypeFlavor`], which is all the interop
//! layer needs to map a type to C and to decide whether it may cross the native boundary.

use std::fmt;

#[allow(non_snake_case, dead_code, missing_docs)]
/// Element type bytes used in signature blobs (ECMA-335 II.23.1.16)
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    pub const PTR: u8 = 0x0f;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1b;
    pub const OBJECT: u8 = 0x1c;
    pub const SZARRAY: u8 = 0x1d;
    pub const MVAR: u8 = 0x1e;
    pub const CMOD_REQD: u8 = 0x1f;
    pub const CMOD_OPT: u8 = 0x20;
    pub const INTERNAL: u8 = 0x21;
    pub const MODIFIER: u8 = 0x40;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
}

/// Simple names of the `System` types reflection reports as primitive
pub const PRIMITIVE_NAMES: [&str; 14] = [
    "Boolean", "Char", "SByte", "Byte", "Int16", "UInt16", "Int32", "UInt32", "Int64", "UInt64",
    "IntPtr", "UIntPtr", "Single", "Double",
];

/// Namespace of all primitive types
pub const SYSTEM_NAMESPACE: &str = "System";

/// Simple name of the primitive type encoded by an element type byte
#[must_use]
pub fn primitive_name(element_type: u8) -> Option<&'static str> {
    let name = match element_type {
        ELEMENT_TYPE::BOOLEAN => "Boolean",
        ELEMENT_TYPE::CHAR => "Char",
        ELEMENT_TYPE::I1 => "SByte",
        ELEMENT_TYPE::U1 => "Byte",
        ELEMENT_TYPE::I2 => "Int16",
        ELEMENT_TYPE::U2 => "UInt16",
        ELEMENT_TYPE::I4 => "Int32",
        ELEMENT_TYPE::U4 => "UInt32",
        ELEMENT_TYPE::I8 => "Int64",
        ELEMENT_TYPE::U8 => "UInt64",
        ELEMENT_TYPE::R4 => "Single",
        ELEMENT_TYPE::R8 => "Double",
        ELEMENT_TYPE::I => "IntPtr",
        ELEMENT_TYPE::U => "UIntPtr",
        _ => return None,
    };

    Some(name)
}

/// The shape of a type, mirroring the `Is*` predicates of reflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    /// `System.Void`
    Void,
    /// One of [`PRIMITIVE_NAMES`]
    Primitive,
    /// A managed reference (`ref`, `out`, `in`)
    ByRef,
    /// An unmanaged pointer
    Pointer,
    /// A non-primitive value type
    ValueType,
    /// A reference type, including `String` and `Object`
    Class,
    /// A single or multi dimensional array
    Array,
    /// A type (`!n`) or method (`!!n`) generic parameter
    GenericParameter,
    /// An unmanaged function pointer
    FunctionPointer,
}

/// A managed type, named the way reflection names it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Namespace, empty for generic parameters and the global namespace
    pub namespace: String,
    /// Simple name, e.g. `Int32&`
    pub name: String,
    /// Full name, e.g. `System.Int32&` or `Outer.Type+Nested`
    pub full_name: String,
    /// Shape of the type
    pub flavor: TypeFlavor,
}

impl TypeDescriptor {
    /// Create a descriptor whose full name is `namespace.name`
    #[must_use]
    pub fn new(namespace: &str, name: &str, flavor: TypeFlavor) -> Self {
        TypeDescriptor {
            namespace: namespace.to_string(),
            name: name.to_string(),
            full_name: join_name(namespace, name),
            flavor,
        }
    }

    /// `System.Void`
    #[must_use]
    pub fn void() -> Self {
        Self::new(SYSTEM_NAMESPACE, "Void", TypeFlavor::Void)
    }

    /// The primitive `System` type with simple name `name`
    #[must_use]
    pub fn primitive(name: &str) -> Self {
        Self::new(SYSTEM_NAMESPACE, name, TypeFlavor::Primitive)
    }

    /// Classify a named type, normalising `System` primitives and `System.Void`.
    ///
    /// Signatures may spell a primitive as a `VALUETYPE` token; reflection still reports it as
    /// primitive, so this is applied to every resolved type name.
    #[must_use]
    pub fn named(namespace: &str, name: &str, full_name: String, is_value_type: bool) -> Self {
        let flavor = if namespace == SYSTEM_NAMESPACE && name == "Void" {
            TypeFlavor::Void
        } else if namespace == SYSTEM_NAMESPACE && PRIMITIVE_NAMES.contains(&name) {
            TypeFlavor::Primitive
        } else if is_value_type {
            TypeFlavor::ValueType
        } else {
            TypeFlavor::Class
        };

        TypeDescriptor {
            namespace: namespace.to_string(),
            name: name.to_string(),
            full_name,
            flavor,
        }
    }

    /// A managed reference to `self`, named with a `&` suffix
    #[must_use]
    pub fn make_by_ref(&self) -> Self {
        self.with_suffix("&", TypeFlavor::ByRef)
    }

    /// An unmanaged pointer to `self`, named with a `*` suffix
    #[must_use]
    pub fn make_pointer(&self) -> Self {
        self.with_suffix("*", TypeFlavor::Pointer)
    }

    /// An array of `self` with `rank` dimensions; rank 0 is a vector (`[]`)
    #[must_use]
    pub fn make_array(&self, rank: u32) -> Self {
        let suffix = match rank {
            0 => "[]".to_string(),
            1 => "[*]".to_string(),
            _ => format!("[{}]", ",".repeat(rank as usize - 1)),
        };

        self.with_suffix(&suffix, TypeFlavor::Array)
    }

    /// A generic parameter, `!n` for types and `!!n` for methods
    #[must_use]
    pub fn generic_parameter(index: u32, is_method: bool) -> Self {
        let name = if is_method {
            format!("!!{index}")
        } else {
            format!("!{index}")
        };

        TypeDescriptor {
            namespace: String::new(),
            full_name: name.clone(),
            name,
            flavor: TypeFlavor::GenericParameter,
        }
    }

    /// An unmanaged function pointer
    #[must_use]
    pub fn function_pointer() -> Self {
        Self::new("", "FunctionPointer", TypeFlavor::FunctionPointer)
    }

    /// `true` for `System.Void`
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.flavor == TypeFlavor::Void
    }

    /// `true` for the primitive `System` types
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.flavor == TypeFlavor::Primitive
    }

    /// `true` for managed references
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        self.flavor == TypeFlavor::ByRef
    }

    /// `true` for unmanaged pointers
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.flavor == TypeFlavor::Pointer
    }

    fn with_suffix(&self, suffix: &str, flavor: TypeFlavor) -> Self {
        TypeDescriptor {
            namespace: self.namespace.clone(),
            name: format!("{}{suffix}", self.name),
            full_name: format!("{}{suffix}", self.full_name),
            flavor,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// `namespace.name`, or just `name` in the global namespace
#[must_use]
pub fn join_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

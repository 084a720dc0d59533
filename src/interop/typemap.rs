//! Managed to native type mapping.
//!
//! The interop layer only ever passes scalar values across the native boundary, so every
//! managed type collapses onto one of five C spellings. Names outside the known set deliberately
//! narrow to `int`: the native side treats them as an integer sized slot.

use std::fmt;

use crate::metadata::typesystem::TypeDescriptor;

/// Native C scalar a managed type is declared as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// No value, `void`
    Void,
    /// 64-bit float, `double`
    Double,
    /// 32-bit float, `float`
    Float,
    /// Signed 64-bit integer, `int64_t`
    Int64,
    /// Unsigned 64-bit integer, `uint64_t`
    UInt64,
    /// Everything else, `int`
    Int,
}

impl NativeType {
    /// Map a managed type's simple name to its native spelling.
    ///
    /// Total: every name outside the known set maps to [`NativeType::Int`].
    ///
    /// ```rust
    /// use pinvokegen::interop::typemap::NativeType;
    ///
    /// assert_eq!(NativeType::map_type("Int64"), NativeType::Int64);
    /// assert_eq!(NativeType::map_type("Byte*").as_c(), "int");
    /// ```
    #[must_use]
    pub fn map_type(name: &str) -> NativeType {
        match name {
            "Void" => NativeType::Void,
            "Double" => NativeType::Double,
            "Single" => NativeType::Float,
            "Int64" => NativeType::Int64,
            "UInt64" => NativeType::UInt64,
            _ => NativeType::Int,
        }
    }

    /// Map a type descriptor by its simple name
    #[must_use]
    pub fn of(ty: &TypeDescriptor) -> NativeType {
        Self::map_type(&ty.name)
    }

    /// The C spelling
    #[must_use]
    pub fn as_c(self) -> &'static str {
        match self {
            NativeType::Void => "void",
            NativeType::Double => "double",
            NativeType::Float => "float",
            NativeType::Int64 => "int64_t",
            NativeType::UInt64 => "uint64_t",
            NativeType::Int => "int",
        }
    }

    /// `true` for [`NativeType::Void`]
    #[must_use]
    pub fn is_void(self) -> bool {
        self == NativeType::Void
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_c())
    }
}

/// `true` if values of `ty` can cross the native boundary without conversion.
///
/// Only primitives, managed references and unmanaged pointers qualify.
#[must_use]
pub fn is_blittable(ty: &TypeDescriptor) -> bool {
    ty.is_primitive() || ty.is_by_ref() || ty.is_pointer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeFlavor, PRIMITIVE_NAMES};

    #[test]
    fn known_names() {
        assert_eq!(NativeType::map_type("Void").as_c(), "void");
        assert_eq!(NativeType::map_type("Double").as_c(), "double");
        assert_eq!(NativeType::map_type("Single").as_c(), "float");
        assert_eq!(NativeType::map_type("Int64").as_c(), "int64_t");
        assert_eq!(NativeType::map_type("UInt64").as_c(), "uint64_t");
    }

    #[test]
    fn unknown_names_default_to_int() {
        for name in [
            "Int32", "Boolean", "IntPtr", "Byte*", "Int32&", "String", "Object", "Span`1", "",
            "int64", "double",
        ] {
            assert_eq!(NativeType::map_type(name), NativeType::Int, "{name}");
        }
        assert_eq!(NativeType::Int.to_string(), "int");
    }

    #[test]
    fn descriptor_mapping_uses_simple_name() {
        let ptr = TypeDescriptor::primitive("Double").make_pointer();
        assert_eq!(NativeType::of(&ptr), NativeType::Int);
        assert_eq!(NativeType::of(&TypeDescriptor::void()), NativeType::Void);
        assert!(NativeType::of(&TypeDescriptor::void()).is_void());
    }

    #[test]
    fn blittability() {
        for name in PRIMITIVE_NAMES {
            assert!(is_blittable(&TypeDescriptor::primitive(name)), "{name}");
        }

        let string = TypeDescriptor::named("System", "String", "System.String".into(), false);
        assert!(!is_blittable(&string));
        assert!(is_blittable(&string.make_by_ref()));
        assert!(is_blittable(&TypeDescriptor::primitive("Byte").make_pointer()));

        let point = TypeDescriptor::new("Geometry", "Point", TypeFlavor::ValueType);
        assert!(!is_blittable(&point));
        assert!(!is_blittable(&TypeDescriptor::primitive("Int32").make_array(0)));
        assert!(!is_blittable(&TypeDescriptor::function_pointer()));
        assert!(!is_blittable(&TypeDescriptor::generic_parameter(0, true)));
        assert!(!is_blittable(&TypeDescriptor::void()));
    }
}

//! Metadata tables of the `#~` / `#-` stream (ECMA-335 II.22).
//!
//! Only the tables needed to enumerate types, methods, custom attributes and P/Invoke mappings
//! have typed rows. All other tables are still sized through their column layout so the tables
//! that follow them can be located.

mod types;

pub mod assembly;
pub mod customattribute;
pub mod implmap;
pub mod memberref;
pub mod methoddef;
pub mod methodptr;
pub mod module;
pub mod moduleref;
pub mod nestedclass;
pub mod typedef;
pub mod typeref;
pub mod typespec;

pub use assembly::AssemblyRaw;
pub use customattribute::CustomAttributeRaw;
pub use implmap::ImplMapRaw;
pub use memberref::MemberRefRaw;
pub use methoddef::MethodDefRaw;
pub use methodptr::MethodPtrRaw;
pub use module::ModuleRaw;
pub use moduleref::ModuleRefRaw;
pub use nestedclass::NestedClassRaw;
pub use typedef::TypeDefRaw;
pub use typeref::TypeRefRaw;
pub use typespec::TypeSpecRaw;
pub use types::*;

//! Owned, typed model of one module's metadata.
//!
//! [`AssemblyMetadata`] is built once from a [`CilAssemblyView`] and then no longer borrows the
//! file. It holds what interop discovery needs: the module identity, every type with its
//! methods, method flags, P/Invoke import data and the types of the custom attributes applied
//! to each method. Signatures stay encoded until [`AssemblyMetadata::method_descriptor`] decodes
//! them, so modules with many methods but few interop entry points stay cheap to load.
//!
//! Type names follow reflection: nested types are joined to their enclosing type with `+` and
//! report the namespace of the outermost type.

use std::{collections::HashMap, path::Path};

use crate::{
    metadata::{
        cilassemblyview::{CilAssemblyView, CilAssemblyViewData},
        method::{DeclaringType, MethodAttributes, MethodDescriptor},
        signatures::{SignatureParameter, SignatureParser, TypeSignature},
        streams::{Blob, Strings, TablesHeader},
        tables::{
            AssemblyRaw, CodedIndex, CustomAttributeRaw, ImplMapRaw, MemberRefRaw, MetadataTable,
            MethodDefRaw, MethodPtrRaw, ModuleRaw, ModuleRefRaw, NestedClassRaw, TableId, TypeDefRaw,
            TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
        typesystem::{join_name, TypeDescriptor, SYSTEM_NAMESPACE},
    },
    Error::RecursionLimit,
    Result,
};

/// Deepest chain of enclosing types or nested type specifications that is followed
const MAX_NESTING_DEPTH: usize = 64;

/// A resolved type name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeName {
    /// Namespace of the outermost enclosing type
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Full name, `+` separating nesting levels
    pub full_name: String,
}

/// A type defined in the module.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    /// `TypeDef` token
    pub token: Token,
    /// Reflection-style name
    pub name: TypeName,
    /// `TypeAttributes`
    pub flags: u32,
    /// Indices into [`AssemblyMetadata::methods`] of the methods this type declares
    pub methods: Vec<usize>,
}

/// Import data of a P/Invoke method, taken from its `ImplMap` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportInfo {
    /// Name of the native module (the `ModuleRef` the row points at)
    pub module: String,
    /// Name of the native function
    pub entry_point: String,
    /// `PInvokeAttributes`
    pub flags: u32,
}

/// The type of one custom attribute applied to a method.
///
/// Attribute constructors can point at metadata this module cannot name, such as a constructor
/// on a module reference. Those stay as [`AttributeLookup::Unresolved`] so that callers can skip
/// them and keep going.
///
/// Type references resolve against this module's own `TypeRef` rows by namespace and name. The
/// referenced assembly is never loaded, so any type with a matching name counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeLookup {
    /// The attribute type was named
    Resolved {
        /// Namespace of the attribute type
        namespace: String,
        /// Simple name of the attribute type
        name: String,
    },
    /// The attribute type could not be determined
    Unresolved {
        /// Why the lookup failed
        reason: String,
    },
}

impl AttributeLookup {
    /// `namespace.name` of a resolved attribute
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match self {
            AttributeLookup::Resolved { namespace, name } => Some(join_name(namespace, name)),
            AttributeLookup::Unresolved { .. } => None,
        }
    }
}

/// A method defined in the module.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    /// `MethodDef` token
    pub token: Token,
    /// Method name
    pub name: String,
    /// `MethodAttributes` without the access bits
    pub flags: MethodAttributes,
    /// `MethodImplAttributes`
    pub impl_flags: u32,
    /// Index into [`AssemblyMetadata::types`] of the declaring type
    pub declaring_type: Option<usize>,
    /// Encoded `MethodDefSig`
    pub signature: Vec<u8>,
    /// P/Invoke import data, if the module has an `ImplMap` row for this method
    pub import: Option<ImportInfo>,
    /// Types of the custom attributes applied to this method
    pub attributes: Vec<AttributeLookup>,
}

impl MethodInfo {
    /// `true` if the method forwards to native code
    #[must_use]
    pub fn is_pinvoke(&self) -> bool {
        self.flags.contains(MethodAttributes::PINVOKE_IMPL)
    }
}

/// The interop-relevant metadata of one module, detached from the file.
///
/// # Examples
///
/// ```rust,no_run
/// use pinvokegen::metadata::assembly::AssemblyMetadata;
/// use std::path::Path;
///
/// let assembly = AssemblyMetadata::from_file(Path::new("App.dll"))?;
/// for ty in assembly.types() {
///     for &index in &ty.methods {
///         let method = &assembly.methods()[index];
///         if method.is_pinvoke() {
///             println!("{}", assembly.method_descriptor(index)?);
///         }
///     }
/// }
/// # Ok::<(), pinvokegen::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct AssemblyMetadata {
    identity: String,
    types: Vec<TypeInfo>,
    methods: Vec<MethodInfo>,
    type_refs: Vec<TypeName>,
    type_specs: Vec<Vec<u8>>,
}

impl AssemblyMetadata {
    /// Load the module at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its metadata is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_view(&CilAssemblyView::from_file(path)?)
    }

    /// Load a module held in memory.
    ///
    /// # Errors
    /// Returns an error if the image or its metadata is malformed.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::from_view(&CilAssemblyView::from_mem(data)?)
    }

    /// Build the model from an already parsed view.
    ///
    /// # Errors
    /// Returns an error if a required stream is missing or a table references rows that do
    /// not exist.
    pub fn from_view(view: &CilAssemblyView) -> Result<Self> {
        view.with_view(Self::from_data)
    }

    fn from_data(data: &CilAssemblyViewData<'_>) -> Result<Self> {
        let Some(tables) = data.metadata_tables.as_ref() else {
            return Err(malformed_error!("Metadata has no tables stream"));
        };
        let Some(strings) = data.strings.as_ref() else {
            return Err(malformed_error!("Metadata has no #Strings heap"));
        };
        let empty_blob = Blob::from(&[0])?;
        let blobs = data.blobs.as_ref().unwrap_or(&empty_blob);

        let identity = read_identity(tables, strings)?;
        let type_refs = read_type_refs(tables, strings)?;
        let type_specs = read_type_specs(tables, blobs)?;

        let mut assembly = AssemblyMetadata {
            identity,
            types: read_types(tables, strings)?,
            methods: read_methods(tables, strings, blobs)?,
            type_refs,
            type_specs,
        };

        assembly.assign_methods(tables)?;
        assembly.load_imports(tables, strings)?;
        assembly.load_attributes(tables, strings);

        log::debug!(
            "Loaded {}: {} types, {} methods",
            assembly.identity,
            assembly.types.len(),
            assembly.methods.len()
        );

        Ok(assembly)
    }

    /// Name of the assembly, or of the module when there is no assembly manifest
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Types defined in the module, without the `<Module>` pseudo type
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter().filter(|ty| ty.token.row() != 1)
    }

    /// All methods, indexed by `MethodDef` row minus one
    #[must_use]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// The type defined in `TypeDef` row `rid`
    #[must_use]
    pub fn type_by_rid(&self, rid: u32) -> Option<&TypeInfo> {
        self.types.get((rid as usize).checked_sub(1)?)
    }

    /// Decode the signature of `methods()[index]` into a [`MethodDescriptor`].
    ///
    /// # Errors
    /// Returns an error if the method has no declaring type, its signature is malformed or
    /// references a type token that does not exist.
    pub fn method_descriptor(&self, index: usize) -> Result<MethodDescriptor> {
        let Some(method) = self.methods.get(index) else {
            return Err(malformed_error!("Method index out of range - {}", index));
        };
        let Some(declaring) = method.declaring_type.and_then(|ty| self.types.get(ty)) else {
            return Err(malformed_error!(
                "Method {} has no declaring type",
                method.token
            ));
        };

        let signature = SignatureParser::new(&method.signature).parse_method_signature()?;
        let return_type = self.describe_parameter(&signature.return_type)?;
        let parameters = signature
            .params
            .iter()
            .chain(signature.varargs.iter())
            .map(|parameter| self.describe_parameter(parameter))
            .collect::<Result<Vec<_>>>()?;

        Ok(MethodDescriptor {
            declaring_type: DeclaringType {
                namespace: declaring.name.namespace.clone(),
                name: declaring.name.name.clone(),
                full_name: declaring.name.full_name.clone(),
            },
            name: method.name.clone(),
            return_type,
            parameters,
            module_identity: self.identity.clone(),
            token: method.token,
        })
    }

    fn describe_parameter(&self, parameter: &SignatureParameter) -> Result<TypeDescriptor> {
        let base = self.describe(&parameter.base, 0)?;
        Ok(if parameter.by_ref {
            base.make_by_ref()
        } else {
            base
        })
    }

    /// Name a signature type the way reflection would
    fn describe(&self, signature: &TypeSignature, depth: usize) -> Result<TypeDescriptor> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        Ok(match signature {
            TypeSignature::Void => TypeDescriptor::void(),
            TypeSignature::Boolean => TypeDescriptor::primitive("Boolean"),
            TypeSignature::Char => TypeDescriptor::primitive("Char"),
            TypeSignature::I1 => TypeDescriptor::primitive("SByte"),
            TypeSignature::U1 => TypeDescriptor::primitive("Byte"),
            TypeSignature::I2 => TypeDescriptor::primitive("Int16"),
            TypeSignature::U2 => TypeDescriptor::primitive("UInt16"),
            TypeSignature::I4 => TypeDescriptor::primitive("Int32"),
            TypeSignature::U4 => TypeDescriptor::primitive("UInt32"),
            TypeSignature::I8 => TypeDescriptor::primitive("Int64"),
            TypeSignature::U8 => TypeDescriptor::primitive("UInt64"),
            TypeSignature::R4 => TypeDescriptor::primitive("Single"),
            TypeSignature::R8 => TypeDescriptor::primitive("Double"),
            TypeSignature::I => TypeDescriptor::primitive("IntPtr"),
            TypeSignature::U => TypeDescriptor::primitive("UIntPtr"),
            TypeSignature::String => system_type("String", false),
            TypeSignature::Object => system_type("Object", false),
            TypeSignature::TypedByRef => system_type("TypedReference", true),
            TypeSignature::Ptr(inner) => self.describe(inner, depth + 1)?.make_pointer(),
            TypeSignature::ByRef(inner) => self.describe(inner, depth + 1)?.make_by_ref(),
            TypeSignature::Pinned(inner) => self.describe(inner, depth + 1)?,
            TypeSignature::ValueType(token) => self.describe_token(*token, true, depth)?,
            TypeSignature::Class(token) => self.describe_token(*token, false, depth)?,
            TypeSignature::GenericParamType(index) => {
                TypeDescriptor::generic_parameter(*index, false)
            }
            TypeSignature::GenericParamMethod(index) => {
                TypeDescriptor::generic_parameter(*index, true)
            }
            TypeSignature::Array(array) => {
                // A rank 0 general array is not valid, treat it as rank 1
                self.describe(&array.base, depth + 1)?
                    .make_array(array.rank.max(1))
            }
            TypeSignature::SzArray(inner) => self.describe(inner, depth + 1)?.make_array(0),
            TypeSignature::GenericInst(base, arguments) => {
                let mut generic = self.describe(base, depth + 1)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| {
                        self.describe(argument, depth + 1)
                            .map(|argument| format!("[{}]", argument.full_name))
                    })
                    .collect::<Result<Vec<_>>>()?;
                generic.full_name = format!("{}[{}]", generic.full_name, arguments.join(","));
                generic
            }
            TypeSignature::FnPtr(_) => TypeDescriptor::function_pointer(),
        })
    }

    fn describe_token(
        &self,
        token: Token,
        is_value_type: bool,
        depth: usize,
    ) -> Result<TypeDescriptor> {
        let index = (token.row() as usize).checked_sub(1);
        let name = match token.table() {
            0x02 => index.and_then(|index| self.types.get(index)).map(|ty| &ty.name),
            0x01 => index.and_then(|index| self.type_refs.get(index)),
            0x1B => {
                let Some(blob) = index.and_then(|index| self.type_specs.get(index)) else {
                    return Err(malformed_error!("Invalid TypeSpec token - {}", token));
                };
                let spec = SignatureParser::new(blob).parse_type_spec_signature()?;
                return self.describe(&spec.base, depth + 1);
            }
            _ => None,
        };

        let Some(name) = name else {
            return Err(malformed_error!("Invalid type token - {}", token));
        };

        Ok(TypeDescriptor::named(
            &name.namespace,
            &name.name,
            name.full_name.clone(),
            is_value_type,
        ))
    }

    /// Attach each type's run of methods, following `MethodPtr` indirection when present
    fn assign_methods(&mut self, tables: &TablesHeader<'_>) -> Result<()> {
        let Some(typedefs) = tables.table::<TypeDefRaw>() else {
            return Ok(());
        };
        let method_ptrs = tables.table::<MethodPtrRaw>();
        let list_len = match &method_ptrs {
            Some(ptrs) => ptrs.row_count(),
            None => tables.rows(TableId::MethodDef),
        };

        let starts = typedefs
            .iter()
            .map(|row| row.map(|row| row.method_list))
            .collect::<Result<Vec<_>>>()?;

        for (type_index, &start) in starts.iter().enumerate() {
            let end = starts.get(type_index + 1).copied().unwrap_or(list_len + 1);
            if start == 0 || start > list_len || end <= start {
                continue;
            }

            for list_index in start..end.min(list_len + 1) {
                let rid = match &method_ptrs {
                    Some(ptrs) => ptrs.get(list_index)?.method,
                    None => list_index,
                };

                let Some(method) = (rid as usize)
                    .checked_sub(1)
                    .and_then(|index| self.methods.get_mut(index))
                else {
                    return Err(malformed_error!(
                        "Type {} lists a method that does not exist - {}",
                        type_index + 1,
                        rid
                    ));
                };

                method.declaring_type = Some(type_index);
                self.types[type_index].methods.push(rid as usize - 1);
            }
        }

        Ok(())
    }

    fn load_imports(&mut self, tables: &TablesHeader<'_>, strings: &Strings<'_>) -> Result<()> {
        let Some(impl_maps) = tables.table::<ImplMapRaw>() else {
            return Ok(());
        };
        let module_refs = tables.table::<ModuleRefRaw>();

        for row in &impl_maps {
            let row = row?;
            if row.member_forwarded.tag != TableId::MethodDef {
                continue;
            }

            let Some(method) = (row.member_forwarded.row as usize)
                .checked_sub(1)
                .and_then(|index| self.methods.get_mut(index))
            else {
                return Err(malformed_error!(
                    "ImplMap row {} forwards a method that does not exist - {}",
                    row.rid,
                    row.member_forwarded.token
                ));
            };

            let Some(module_ref) = module_refs
                .as_ref()
                .and_then(|module_refs| module_refs.get(row.import_scope).ok())
            else {
                return Err(malformed_error!(
                    "ImplMap row {} has an invalid import scope - {}",
                    row.rid,
                    row.import_scope
                ));
            };

            method.import = Some(ImportInfo {
                module: strings.get(module_ref.name as usize)?.to_string(),
                entry_point: strings.get(row.import_name as usize)?.to_string(),
                flags: row.mapping_flags,
            });
        }

        Ok(())
    }

    fn load_attributes(&mut self, tables: &TablesHeader<'_>, strings: &Strings<'_>) {
        let Some(custom_attributes) = tables.table::<CustomAttributeRaw>() else {
            return;
        };
        let member_refs = tables.table::<MemberRefRaw>();

        for row in &custom_attributes {
            let row = match row {
                Ok(row) => row,
                Err(error) => {
                    log::debug!("Skipping unreadable custom attribute row: {error}");
                    continue;
                }
            };
            if row.parent.tag != TableId::MethodDef {
                continue;
            }

            let Some(method_index) = (row.parent.row as usize)
                .checked_sub(1)
                .filter(|&index| index < self.methods.len())
            else {
                log::debug!(
                    "Custom attribute {} is applied to a missing method {}",
                    row.token,
                    row.parent.token
                );
                continue;
            };

            let lookup = self.resolve_attribute(row.constructor, member_refs.as_ref(), strings);
            self.methods[method_index].attributes.push(lookup);
        }
    }

    /// Find the type that declares an attribute constructor
    fn resolve_attribute(
        &self,
        constructor: CodedIndex,
        member_refs: Option<&MetadataTable<'_, MemberRefRaw>>,
        strings: &Strings<'_>,
    ) -> AttributeLookup {
        let unresolved = |reason: String| AttributeLookup::Unresolved { reason };

        match constructor.tag {
            TableId::MethodDef => {
                let declaring = (constructor.row as usize)
                    .checked_sub(1)
                    .and_then(|index| self.methods.get(index))
                    .and_then(|method| method.declaring_type)
                    .and_then(|ty| self.types.get(ty));
                match declaring {
                    Some(ty) => AttributeLookup::Resolved {
                        namespace: ty.name.namespace.clone(),
                        name: ty.name.name.clone(),
                    },
                    None => unresolved(format!(
                        "constructor {} has no declaring type",
                        constructor.token
                    )),
                }
            }
            TableId::MemberRef => {
                let Some(member_ref) =
                    member_refs.and_then(|member_refs| member_refs.get(constructor.row).ok())
                else {
                    return unresolved(format!(
                        "constructor {} does not exist",
                        constructor.token
                    ));
                };

                match member_ref.class.tag {
                    TableId::TypeDef | TableId::TypeRef | TableId::TypeSpec => {
                        match self.describe_token(member_ref.class.token, false, 0) {
                            Ok(ty) => AttributeLookup::Resolved {
                                namespace: ty.namespace,
                                name: ty.name,
                            },
                            Err(error) => unresolved(error.to_string()),
                        }
                    }
                    _ => {
                        let name = strings.get(member_ref.name as usize).unwrap_or_default();
                        unresolved(format!(
                            "constructor {name} is declared on {}, which is not a type",
                            member_ref.class.token
                        ))
                    }
                }
            }
            _ => unresolved(format!(
                "constructor token {} is not a method",
                constructor.token
            )),
        }
    }
}

fn system_type(name: &str, is_value_type: bool) -> TypeDescriptor {
    TypeDescriptor::named(
        SYSTEM_NAMESPACE,
        name,
        join_name(SYSTEM_NAMESPACE, name),
        is_value_type,
    )
}

/// Assembly name, falling back to the module name without its extension
fn read_identity(tables: &TablesHeader<'_>, strings: &Strings<'_>) -> Result<String> {
    if let Some(assembly) = tables.table::<AssemblyRaw>() {
        if assembly.row_count() > 0 {
            let row = assembly.get(1)?;
            return Ok(strings.get(row.name as usize)?.to_string());
        }
    }

    let Some(module) = tables.table::<ModuleRaw>() else {
        return Err(malformed_error!("Metadata has no Module table"));
    };
    let name = strings.get(module.get(1)?.name as usize)?;

    Ok(match Path::new(name).file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => stem.to_string(),
        None => name.to_string(),
    })
}

fn read_type_refs(tables: &TablesHeader<'_>, strings: &Strings<'_>) -> Result<Vec<TypeName>> {
    let Some(type_refs) = tables.table::<TypeRefRaw>() else {
        return Ok(Vec::new());
    };

    let rows = type_refs.iter().collect::<Result<Vec<_>>>()?;
    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        names.push(type_ref_name(&rows, row, strings, 0)?);
    }

    Ok(names)
}

/// Name of a `TypeRef`, nesting it under its resolution scope when that is another `TypeRef`
fn type_ref_name(
    rows: &[TypeRefRaw],
    row: &TypeRefRaw,
    strings: &Strings<'_>,
    depth: usize,
) -> Result<TypeName> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(RecursionLimit(MAX_NESTING_DEPTH));
    }

    let name = strings.get(row.type_name as usize)?;
    let namespace = strings.get(row.type_namespace as usize)?;

    if row.resolution_scope.tag == TableId::TypeRef && row.resolution_scope.row != 0 {
        let Some(enclosing) = rows.get(row.resolution_scope.row as usize - 1) else {
            return Err(malformed_error!(
                "TypeRef {} is nested in a missing type - {}",
                row.token,
                row.resolution_scope.token
            ));
        };
        let enclosing = type_ref_name(rows, enclosing, strings, depth + 1)?;

        return Ok(TypeName {
            namespace: enclosing.namespace,
            name: name.to_string(),
            full_name: format!("{}+{name}", enclosing.full_name),
        });
    }

    Ok(TypeName {
        namespace: namespace.to_string(),
        name: name.to_string(),
        full_name: join_name(namespace, name),
    })
}

fn read_type_specs(tables: &TablesHeader<'_>, blobs: &Blob<'_>) -> Result<Vec<Vec<u8>>> {
    let Some(type_specs) = tables.table::<TypeSpecRaw>() else {
        return Ok(Vec::new());
    };

    type_specs
        .iter()
        .map(|row| Ok(blobs.get(row?.signature as usize)?.to_vec()))
        .collect()
}

fn read_types(tables: &TablesHeader<'_>, strings: &Strings<'_>) -> Result<Vec<TypeInfo>> {
    let Some(typedefs) = tables.table::<TypeDefRaw>() else {
        return Ok(Vec::new());
    };

    let mut enclosing = HashMap::new();
    if let Some(nested) = tables.table::<NestedClassRaw>() {
        for row in &nested {
            let row = row?;
            enclosing.insert(row.nested_class, row.enclosing_class);
        }
    }

    let rows = typedefs.iter().collect::<Result<Vec<_>>>()?;
    let mut types = Vec::with_capacity(rows.len());
    for row in &rows {
        types.push(TypeInfo {
            token: row.token,
            name: type_def_name(&rows, row, &enclosing, strings, 0)?,
            flags: row.flags,
            methods: Vec::new(),
        });
    }

    Ok(types)
}

fn type_def_name(
    rows: &[TypeDefRaw],
    row: &TypeDefRaw,
    enclosing: &HashMap<u32, u32>,
    strings: &Strings<'_>,
    depth: usize,
) -> Result<TypeName> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(RecursionLimit(MAX_NESTING_DEPTH));
    }

    let name = strings.get(row.type_name as usize)?;

    if let Some(&parent) = enclosing.get(&row.rid) {
        let Some(parent_row) = (parent as usize).checked_sub(1).and_then(|index| rows.get(index))
        else {
            return Err(malformed_error!(
                "TypeDef {} is nested in a missing type - {}",
                row.token,
                parent
            ));
        };
        let parent = type_def_name(rows, parent_row, enclosing, strings, depth + 1)?;

        return Ok(TypeName {
            namespace: parent.namespace,
            name: name.to_string(),
            full_name: format!("{}+{name}", parent.full_name),
        });
    }

    let namespace = strings.get(row.type_namespace as usize)?;
    Ok(TypeName {
        namespace: namespace.to_string(),
        name: name.to_string(),
        full_name: join_name(namespace, name),
    })
}

fn read_methods(
    tables: &TablesHeader<'_>,
    strings: &Strings<'_>,
    blobs: &Blob<'_>,
) -> Result<Vec<MethodInfo>> {
    let Some(methods) = tables.table::<MethodDefRaw>() else {
        return Ok(Vec::new());
    };

    methods
        .iter()
        .map(|row| {
            let row = row?;
            Ok(MethodInfo {
                token: row.token,
                name: strings.get(row.name as usize)?.to_string(),
                flags: MethodAttributes::from_method_flags(row.flags),
                impl_flags: row.impl_flags,
                declaring_type: None,
                signature: blobs.get(row.signature as usize)?.to_vec(),
                import: None,
                attributes: Vec::new(),
            })
        })
        .collect()
}

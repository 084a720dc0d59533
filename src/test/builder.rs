//! Builds PE32 images with just enough metadata for the reader and the scanner.
//!
//! Layout: headers in the first 0x200 bytes, one `.text` section at RVA 0x2000 holding the
//! CLI header, immediately followed by the metadata root and the `#~`, `#Strings` and `#Blob`
//! streams. Every heap and table index is 2 bytes wide.

use std::collections::HashMap;

const PE_OFFSET: usize = 0x80;
const OPTIONAL_HEADER_OFFSET: usize = PE_OFFSET + 4 + 20;
const SECTION_TABLE_OFFSET: usize = OPTIONAL_HEADER_OFFSET + 0xE0;
const TEXT_RVA: u32 = 0x2000;
const TEXT_OFFSET: usize = 0x200;
const CLI_HEADER_SIZE: u32 = 72;
// data directory 14 of a PE32 optional header
const CLR_DIRECTORY_OFFSET: usize = OPTIONAL_HEADER_OFFSET + 96 + 14 * 8;

const PINVOKE_METHOD_FLAGS: u16 = 0x2096;
const STATIC_METHOD_FLAGS: u16 = 0x0096;
const IMPLMAP_WINAPI: u16 = 0x0100;

/// Appends rows and heap entries, then lays out the image with [`ImageBuilder::build`].
///
/// Row 1 of `TypeDef` is always `<Module>`. Methods belong to the type added last.
pub struct ImageBuilder {
    name: String,
    with_assembly: bool,
    strings: Vec<u8>,
    string_index: HashMap<String, u16>,
    blobs: Vec<u8>,
    type_refs: Vec<[u16; 3]>,
    type_defs: Vec<(u32, [u16; 5])>,
    methods: Vec<(u16, u16, [u16; 3])>,
    member_refs: Vec<[u16; 3]>,
    custom_attributes: Vec<[u16; 3]>,
    module_refs: Vec<u16>,
    type_specs: Vec<u16>,
    impl_maps: Vec<[u16; 4]>,
    nested: Vec<[u16; 2]>,
}

impl ImageBuilder {
    /// An image for assembly `name`, whose module is `{name}.dll`
    pub fn new(name: &str) -> Self {
        let mut builder = ImageBuilder {
            name: name.to_string(),
            with_assembly: true,
            strings: vec![0],
            string_index: HashMap::new(),
            blobs: vec![0],
            type_refs: Vec::new(),
            type_defs: Vec::new(),
            methods: Vec::new(),
            member_refs: Vec::new(),
            custom_attributes: Vec::new(),
            module_refs: Vec::new(),
            type_specs: Vec::new(),
            impl_maps: Vec::new(),
            nested: Vec::new(),
        };

        let module_type = builder.string("<Module>");
        builder.type_defs.push((0, [module_type, 0, 0, 1, 1]));
        builder
    }

    /// Leave out the `Assembly` row, as in a netmodule
    pub fn without_assembly_row(&mut self) {
        self.with_assembly = false;
    }

    /// Add a class, returning its `TypeDef` row
    pub fn add_type(&mut self, namespace: &str, name: &str) -> u32 {
        let name = self.string(name);
        let namespace = self.string(namespace);
        let method_list = self.methods.len() as u16 + 1;

        self.type_defs
            .push((0x0010_0001, [name, namespace, 0, 1, method_list]));
        self.type_defs.len() as u32
    }

    /// Add a class nested in `enclosing`, returning its `TypeDef` row
    pub fn add_nested_type(&mut self, name: &str, enclosing: u32) -> u32 {
        let rid = self.add_type("", name);
        self.type_defs[rid as usize - 1].0 = 0x0010_0002;
        self.nested.push([rid as u16, enclosing as u16]);
        rid
    }

    /// Add a `TypeRef` (deduplicated), returning its row
    pub fn add_type_ref(&mut self, namespace: &str, name: &str) -> u32 {
        let name = self.string(name);
        let namespace = self.string(namespace);

        if let Some(position) = self
            .type_refs
            .iter()
            .position(|row| row[1] == name && row[2] == namespace)
        {
            return position as u32 + 1;
        }

        self.type_refs.push([0, name, namespace]);
        self.type_refs.len() as u32
    }

    /// Add a `TypeSpec` with the given signature, returning its row
    pub fn add_type_spec(&mut self, signature: &[u8]) -> u32 {
        let blob = self.blob(signature);
        self.type_specs.push(blob);
        self.type_specs.len() as u32
    }

    /// Add a public static method to the last type, returning its `MethodDef` row
    pub fn add_method(&mut self, name: &str, signature: &[u8]) -> u32 {
        self.add_method_with_flags(name, signature, STATIC_METHOD_FLAGS)
    }

    /// Add a method with explicit `MethodAttributes`, returning its `MethodDef` row
    pub fn add_method_with_flags(&mut self, name: &str, signature: &[u8], flags: u16) -> u32 {
        let name = self.string(name);
        let signature = self.blob(signature);

        self.methods.push((0, flags, [name, signature, 1]));
        self.methods.len() as u32
    }

    /// Add a P/Invoke method importing `entry_point` from `module`, returning its row
    pub fn add_pinvoke(
        &mut self,
        name: &str,
        signature: &[u8],
        module: &str,
        entry_point: &str,
    ) -> u32 {
        let rid = self.add_method_with_flags(name, signature, PINVOKE_METHOD_FLAGS);
        self.methods[rid as usize - 1].0 = 0x0080;

        let scope = self.module_ref(module);
        let entry_point = self.string(entry_point);
        // MemberForwarded: tag 1 is MethodDef
        self.impl_maps
            .push([IMPLMAP_WINAPI, (rid as u16) << 1 | 1, entry_point, scope]);
        rid
    }

    /// Apply the attribute `namespace.name`, referenced through a `TypeRef`, to `method`
    pub fn add_attribute(&mut self, method: u32, namespace: &str, name: &str) {
        let type_ref = self.add_type_ref(namespace, name) as u16;
        // MemberRefParent: tag 1 is TypeRef
        let ctor = self.member_ref_ctor(type_ref << 3 | 1);
        self.attribute(method, ctor << 3 | 3);
    }

    /// Apply an attribute whose constructor is the local method `ctor` to `method`
    pub fn add_method_attribute(&mut self, method: u32, ctor: u32) {
        // CustomAttributeType: tag 2 is MethodDef
        self.attribute(method, (ctor as u16) << 3 | 2);
    }

    /// Apply an attribute whose constructor is declared on the `TypeSpec` row `type_spec`
    pub fn add_type_spec_attribute(&mut self, method: u32, type_spec: u32) {
        // MemberRefParent: tag 4 is TypeSpec
        let ctor = self.member_ref_ctor((type_spec as u16) << 3 | 4);
        self.attribute(method, ctor << 3 | 3);
    }

    /// Apply an attribute whose constructor lives on a module reference, which names no type
    pub fn add_unresolvable_attribute(&mut self, method: u32) {
        let scope = self.module_ref("unmanaged");
        // MemberRefParent: tag 2 is ModuleRef
        let ctor = self.member_ref_ctor(scope << 3 | 2);
        self.attribute(method, ctor << 3 | 3);
    }

    fn member_ref_ctor(&mut self, class: u16) -> u16 {
        let name = self.string(".ctor");
        let signature = self.blob(&[0x20, 0x00, 0x01]);

        self.member_refs.push([class, name, signature]);
        self.member_refs.len() as u16
    }

    fn attribute(&mut self, method: u32, ctor: u16) {
        let value = self.blob(&[0x01, 0x00, 0x00, 0x00]);
        // HasCustomAttribute: tag 0 is MethodDef
        self.custom_attributes
            .push([(method as u16) << 5, ctor, value]);
    }

    fn module_ref(&mut self, name: &str) -> u16 {
        let name = self.string(name);
        if let Some(position) = self.module_refs.iter().position(|&row| row == name) {
            return position as u16 + 1;
        }

        self.module_refs.push(name);
        self.module_refs.len() as u16
    }

    fn string(&mut self, value: &str) -> u16 {
        if value.is_empty() {
            return 0;
        }
        if let Some(&index) = self.string_index.get(value) {
            return index;
        }

        let index = self.strings.len() as u16;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_index.insert(value.to_string(), index);
        index
    }

    fn blob(&mut self, value: &[u8]) -> u16 {
        let index = self.blobs.len() as u16;
        self.blobs.push(value.len() as u8);
        self.blobs.extend_from_slice(value);
        index
    }

    /// Lay out the image with an empty CLR runtime header directory, as a native PE has
    pub fn build_native(self) -> Vec<u8> {
        let mut image = self.build();
        image[CLR_DIRECTORY_OFFSET..CLR_DIRECTORY_OFFSET + 8].fill(0);
        image
    }

    /// Lay out the complete image
    pub fn build(mut self) -> Vec<u8> {
        let module_name = self.string(&format!("{}.dll", self.name));
        let assembly_name = self.string(&self.name.clone());

        let tables = self.tables_stream(module_name, assembly_name);
        let metadata = metadata_root(&[
            ("#~", tables),
            ("#Strings", pad4(self.strings.clone())),
            ("#Blob", pad4(self.blobs.clone())),
        ]);

        let mut text = Vec::new();
        put_u32(&mut text, CLI_HEADER_SIZE);
        put_u16(&mut text, 2);
        put_u16(&mut text, 5);
        put_u32(&mut text, TEXT_RVA + CLI_HEADER_SIZE);
        put_u32(&mut text, metadata.len() as u32);
        put_u32(&mut text, 1);
        put_u32(&mut text, 0);
        text.resize(CLI_HEADER_SIZE as usize, 0);
        text.extend_from_slice(&metadata);

        let virtual_size = text.len() as u32;
        let raw_size = (virtual_size + 0x1FF) & !0x1FF;
        text.resize(raw_size as usize, 0);

        let mut image = pe_headers(virtual_size, raw_size);
        image.extend_from_slice(&text);
        image
    }

    fn tables_stream(&self, module_name: u16, assembly_name: u16) -> Vec<u8> {
        let mut tables: Vec<(u8, u32, Vec<u8>)> = Vec::new();

        // Module: generation, name, mvid, encid, encbaseid
        tables.push((0x00, 1, words(&[0, module_name, 0, 0, 0])));

        if !self.type_refs.is_empty() {
            let rows = self.type_refs.iter().flat_map(|row| words(row)).collect();
            tables.push((0x01, self.type_refs.len() as u32, rows));
        }

        let mut rows = Vec::new();
        for (flags, columns) in &self.type_defs {
            put_u32(&mut rows, *flags);
            rows.extend(words(columns));
        }
        tables.push((0x02, self.type_defs.len() as u32, rows));

        if !self.methods.is_empty() {
            let mut rows = Vec::new();
            for (impl_flags, flags, columns) in &self.methods {
                put_u32(&mut rows, 0);
                put_u16(&mut rows, *impl_flags);
                put_u16(&mut rows, *flags);
                rows.extend(words(columns));
            }
            tables.push((0x06, self.methods.len() as u32, rows));
        }

        let simple: [(u8, Vec<Vec<u16>>); 6] = [
            (0x0A, self.member_refs.iter().map(|row| row.to_vec()).collect()),
            (0x0C, self.custom_attributes.iter().map(|row| row.to_vec()).collect()),
            (0x1A, self.module_refs.iter().map(|&row| vec![row]).collect()),
            (0x1B, self.type_specs.iter().map(|&row| vec![row]).collect()),
            (0x1C, self.impl_maps.iter().map(|row| row.to_vec()).collect()),
            (0x29, self.nested.iter().map(|row| row.to_vec()).collect()),
        ];
        for (id, rows) in simple {
            if !rows.is_empty() {
                let count = rows.len() as u32;
                tables.push((id, count, rows.iter().flat_map(|row| words(row)).collect()));
            }
        }

        if self.with_assembly {
            let mut row = Vec::new();
            put_u32(&mut row, 0x8004);
            row.extend(words(&[1, 0, 0, 0]));
            put_u32(&mut row, 0);
            row.extend(words(&[0, assembly_name, 0]));
            tables.push((0x20, 1, row));
        }

        tables.sort_by_key(|(id, _, _)| *id);

        let valid = tables.iter().fold(0_u64, |valid, (id, _, _)| valid | 1 << id);
        let mut stream = vec![0, 0, 0, 0, 2, 0, 0, 1];
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0_u64.to_le_bytes());
        for (_, count, _) in &tables {
            put_u32(&mut stream, *count);
        }
        for (_, _, rows) in &tables {
            stream.extend_from_slice(rows);
        }

        pad4(stream)
    }
}

fn metadata_root(streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let version = pad4(b"v4.0.30319\0".to_vec());

    let mut directory = Vec::new();
    for (name, _) in streams {
        directory.extend_from_slice(&[0; 8]);
        directory.extend_from_slice(&pad4(format!("{name}\0").into_bytes()));
    }
    let header_len = 16 + version.len() + 4 + directory.len();

    let mut root = Vec::new();
    put_u32(&mut root, 0x424A_5342);
    put_u16(&mut root, 1);
    put_u16(&mut root, 1);
    put_u32(&mut root, 0);
    put_u32(&mut root, version.len() as u32);
    root.extend_from_slice(&version);
    put_u16(&mut root, 0);
    put_u16(&mut root, streams.len() as u16);

    let mut offset = header_len;
    let mut body = Vec::new();
    for (name, data) in streams {
        put_u32(&mut root, offset as u32);
        put_u32(&mut root, data.len() as u32);
        root.extend_from_slice(&pad4(format!("{name}\0").into_bytes()));
        body.extend_from_slice(data);
        offset += data.len();
    }

    root.extend_from_slice(&body);
    root
}

fn pe_headers(virtual_size: u32, raw_size: u32) -> Vec<u8> {
    let mut image = vec![0_u8; TEXT_OFFSET];

    image[0..2].copy_from_slice(b"MZ");
    image[0x3C..0x40].copy_from_slice(&(PE_OFFSET as u32).to_le_bytes());
    image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");

    let mut coff = Vec::new();
    put_u16(&mut coff, 0x014C);
    put_u16(&mut coff, 1);
    put_u32(&mut coff, 0);
    put_u32(&mut coff, 0);
    put_u32(&mut coff, 0);
    put_u16(&mut coff, 0xE0);
    put_u16(&mut coff, 0x2102);
    image[PE_OFFSET + 4..OPTIONAL_HEADER_OFFSET].copy_from_slice(&coff);

    let mut optional = Vec::new();
    put_u16(&mut optional, 0x010B);
    optional.extend_from_slice(&[8, 0]);
    put_u32(&mut optional, raw_size);
    put_u32(&mut optional, 0);
    put_u32(&mut optional, 0);
    put_u32(&mut optional, 0);
    put_u32(&mut optional, TEXT_RVA);
    put_u32(&mut optional, 0);
    put_u32(&mut optional, 0x0040_0000);
    put_u32(&mut optional, 0x2000);
    put_u32(&mut optional, 0x200);
    for version in [4, 0, 0, 0, 4, 0] {
        put_u16(&mut optional, version);
    }
    put_u32(&mut optional, 0);
    put_u32(&mut optional, TEXT_RVA + ((virtual_size + 0x1FFF) & !0x1FFF));
    put_u32(&mut optional, TEXT_OFFSET as u32);
    put_u32(&mut optional, 0);
    put_u16(&mut optional, 3);
    put_u16(&mut optional, 0x8540);
    for size in [0x10_0000, 0x1000, 0x10_0000, 0x1000] {
        put_u32(&mut optional, size);
    }
    put_u32(&mut optional, 0);
    put_u32(&mut optional, 16);
    for directory in 0..16 {
        if directory == 14 {
            put_u32(&mut optional, TEXT_RVA);
            put_u32(&mut optional, CLI_HEADER_SIZE);
        } else {
            put_u32(&mut optional, 0);
            put_u32(&mut optional, 0);
        }
    }
    image[OPTIONAL_HEADER_OFFSET..SECTION_TABLE_OFFSET].copy_from_slice(&optional);

    let mut section = b".text\0\0\0".to_vec();
    put_u32(&mut section, virtual_size);
    put_u32(&mut section, TEXT_RVA);
    put_u32(&mut section, raw_size);
    put_u32(&mut section, TEXT_OFFSET as u32);
    put_u32(&mut section, 0);
    put_u32(&mut section, 0);
    put_u16(&mut section, 0);
    put_u16(&mut section, 0);
    put_u32(&mut section, 0x6000_0020);
    image[SECTION_TABLE_OFFSET..SECTION_TABLE_OFFSET + 40].copy_from_slice(&section);

    image
}

fn words(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn pad4(mut data: Vec<u8>) -> Vec<u8> {
    while data.len() % 4 != 0 {
        data.push(0);
    }
    data
}

//! Object schemas
//!
//! Unity describes the serialized layout of an object type in one of two
//! places:
//!
//! - a **type tree** stored inside the container itself (a flat, depth-first
//!   list of nodes where each node's `level` gives its depth), or
//! - a **class database** shipped separately, holding a node tree per class id
//!   with names interned in a shared string table.
//!
//! Both are exposed through [`SchemaView`] so that layout decisions are written
//! once. [`Schema`] is the handle the asset store hands out.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Meta flag: align the stream to 4 bytes after this field.
pub const FLAG_ALIGN: u32 = 0x4000;

/// Type flag: the node is an array (`size` + `data` children).
pub const TYPE_FLAG_ARRAY: u8 = 0x01;

/// One node of a runtime type tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeNode {
    pub level: u8,
    pub type_name: String,
    pub name: String,
    pub byte_size: i32,
    #[serde(default)]
    pub type_flags: u8,
    #[serde(default)]
    pub meta_flags: u32,
}

impl TypeTreeNode {
    #[must_use]
    pub fn new(level: u8, type_name: &str, name: &str, byte_size: i32) -> Self {
        Self {
            level,
            type_name: type_name.to_string(),
            name: name.to_string(),
            byte_size,
            type_flags: 0,
            meta_flags: 0,
        }
    }

    #[must_use]
    pub fn aligned(mut self) -> Self {
        self.meta_flags |= FLAG_ALIGN;
        self
    }

    #[must_use]
    pub fn array(mut self) -> Self {
        self.type_flags |= TYPE_FLAG_ARRAY;
        self
    }
}

/// A runtime type tree for one class id (or one script type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeType {
    pub class_id: i32,
    /// Script index for `MonoBehaviour` types, `0xFFFF` otherwise.
    pub script_index: u16,
    pub nodes: Vec<TypeTreeNode>,
}

/// A class database node; names are indices into the database string table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDatabaseNode {
    pub type_name: u32,
    pub field_name: u32,
    pub byte_size: i32,
    #[serde(default)]
    pub type_flags: u8,
    #[serde(default)]
    pub meta_flags: u32,
    #[serde(default)]
    pub children: Vec<ClassDatabaseNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDatabaseType {
    pub class_id: i32,
    pub name: u32,
    pub root: ClassDatabaseNode,
}

/// A separately loaded table of class layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDatabase {
    strings: Vec<String>,
    types: Vec<ClassDatabaseType>,
}

impl ClassDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its index.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(idx) = self.strings.iter().position(|existing| existing == s) {
            return idx as u32;
        }
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u32
    }

    pub fn get_string(&self, idx: u32) -> &str {
        self.strings.get(idx as usize).map_or("", String::as_str)
    }

    pub fn add_type(&mut self, ty: ClassDatabaseType) {
        self.types.push(ty);
    }

    pub fn find_type_index(&self, class_id: i32) -> Option<usize> {
        self.types.iter().position(|t| t.class_id == class_id)
    }

    pub fn types(&self) -> &[ClassDatabaseType] {
        &self.types
    }
}

/// A field as seen by layout logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
}

/// Template of one field, used to parse values out of object bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    pub name: String,
    pub type_name: String,
    pub byte_size: i32,
    pub align: bool,
    pub is_array: bool,
    pub children: Vec<TemplateField>,
}

impl TemplateField {
    /// Index of a direct child by name.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name)
    }

    /// Drop every direct child after the one named `name`.
    /// Returns `false` when no such child exists.
    pub fn truncate_after(&mut self, name: &str) -> bool {
        match self.child_index(name) {
            Some(idx) => {
                self.children.truncate(idx + 1);
                true
            }
            None => false,
        }
    }
}

/// Common view over both schema providers.
pub trait SchemaView {
    /// Name of the object's type (e.g. `GameObject`).
    fn type_name(&self) -> &str;

    /// Top-level fields in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor<'_>>;

    /// Full field template rooted at the type node.
    fn template(&self) -> Result<TemplateField>;

    /// Whether the object starts with a length-prefixed `m_Name` string.
    fn begins_with_name(&self) -> bool {
        self.fields().first().is_some_and(|f| f.name == "m_Name")
    }
}

impl SchemaView for TypeTreeType {
    fn type_name(&self) -> &str {
        self.nodes.first().map_or("", |n| n.type_name.as_str())
    }

    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        let Some(root) = self.nodes.first() else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .skip(1)
            .filter(|n| n.level == root.level + 1)
            .map(|n| FieldDescriptor {
                name: &n.name,
                type_name: &n.type_name,
            })
            .collect()
    }

    fn template(&self) -> Result<TemplateField> {
        if self.nodes.is_empty() {
            return Err(Error::MalformedSchema(format!(
                "type tree for class {} has no nodes",
                self.class_id
            )));
        }
        let mut pos = 0;
        Ok(build_from_flat(&self.nodes, &mut pos))
    }
}

fn build_from_flat(nodes: &[TypeTreeNode], pos: &mut usize) -> TemplateField {
    let node = &nodes[*pos];
    *pos += 1;

    let mut children = Vec::new();
    while *pos < nodes.len() && nodes[*pos].level > node.level {
        children.push(build_from_flat(nodes, pos));
    }

    TemplateField {
        name: node.name.clone(),
        type_name: node.type_name.clone(),
        byte_size: node.byte_size,
        align: node.meta_flags & FLAG_ALIGN != 0,
        is_array: node.type_flags & TYPE_FLAG_ARRAY != 0,
        children,
    }
}

/// A class database entry together with its string table.
#[derive(Debug, Clone)]
pub struct ClassDatabaseSchema {
    database: Arc<ClassDatabase>,
    index: usize,
}

impl ClassDatabaseSchema {
    pub fn new(database: Arc<ClassDatabase>, class_id: i32) -> Option<Self> {
        let index = database.find_type_index(class_id)?;
        Some(Self { database, index })
    }

    fn entry(&self) -> &ClassDatabaseType {
        &self.database.types[self.index]
    }

    fn convert(&self, node: &ClassDatabaseNode) -> TemplateField {
        TemplateField {
            name: self.database.get_string(node.field_name).to_string(),
            type_name: self.database.get_string(node.type_name).to_string(),
            byte_size: node.byte_size,
            align: node.meta_flags & FLAG_ALIGN != 0,
            is_array: node.type_flags & TYPE_FLAG_ARRAY != 0,
            children: node.children.iter().map(|c| self.convert(c)).collect(),
        }
    }
}

impl SchemaView for ClassDatabaseSchema {
    fn type_name(&self) -> &str {
        self.database.get_string(self.entry().name)
    }

    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        self.entry()
            .root
            .children
            .iter()
            .map(|c| FieldDescriptor {
                name: self.database.get_string(c.field_name),
                type_name: self.database.get_string(c.type_name),
            })
            .collect()
    }

    fn template(&self) -> Result<TemplateField> {
        Ok(self.convert(&self.entry().root))
    }
}

/// Schema handle returned by an asset store.
#[derive(Debug, Clone)]
pub enum Schema {
    TypeTree(Arc<TypeTreeType>),
    ClassDatabase(ClassDatabaseSchema),
}

impl Schema {
    /// Whether the schema describes at least the root type node.
    pub fn has_nodes(&self) -> bool {
        match self {
            Schema::TypeTree(tree) => !tree.nodes.is_empty(),
            Schema::ClassDatabase(_) => true,
        }
    }
}

impl SchemaView for Schema {
    fn type_name(&self) -> &str {
        match self {
            Schema::TypeTree(tt) => tt.type_name(),
            Schema::ClassDatabase(cldb) => cldb.type_name(),
        }
    }

    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        match self {
            Schema::TypeTree(tt) => tt.fields(),
            Schema::ClassDatabase(cldb) => cldb.fields(),
        }
    }

    fn template(&self) -> Result<TemplateField> {
        match self {
            Schema::TypeTree(tt) => tt.template(),
            Schema::ClassDatabase(cldb) => cldb.template(),
        }
    }
}

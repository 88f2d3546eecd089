//! Asset container access
//!
//! The narrow interface this crate uses to reach into Unity asset containers:
//!
//! - [`AssetReference`] - a `(file id, path id)` pair with a lazily cached name
//! - [`Schema`] / [`SchemaView`] - type tree or class database layouts
//! - [`AssetStore`] - reference resolution, schema lookup and locked reads
//! - [`MemoryAssetStore`] - an in-memory store built from raw object bytes
//! - [`detect_file_type`] - bundle / assets file sniffing

mod detect;
mod pptr;
mod reader;
mod schema;
mod store;
mod value;

pub use detect::{DetectedFileType, detect_file_type, detect_file_type_path};
pub use pptr::{AssetReference, FileLabel};
pub use reader::{AssetReadExt, align4, skip};
pub use schema::{
    ClassDatabase, ClassDatabaseNode, ClassDatabaseSchema, ClassDatabaseType, FLAG_ALIGN,
    FieldDescriptor, Schema, SchemaView, TYPE_FLAG_ARRAY, TemplateField, TypeTreeNode, TypeTreeType,
};
pub use store::{
    AssetContainer, AssetStore, CLASS_MONO_BEHAVIOUR, ContainerId, ContainerInfo, MemoryAssetStore,
    NO_SCRIPT_INDEX, ObjectInfo, ResolvedAsset, TypeKey,
};
pub use value::{ValueData, ValueField, read_value};

//! Reference name resolution
//!
//! Derives a display name for an arbitrary referenced object from nothing but
//! its byte offset and its schema. The schema picks one of four layouts:
//!
//! | Layout          | Where the name lives                                        |
//! |-----------------|-------------------------------------------------------------|
//! | named object    | `m_Name` string at the object's base offset                 |
//! | `GameObject`    | after the component list and the 4-byte layer               |
//! | `MonoBehaviour` | at `+0x1C`, else the script's `m_ClassName`                 |
//! | anything else   | no name                                                     |

use super::{NameResolver, NamerOptions};
use crate::assets::{
    AssetReadExt, AssetReference, AssetStore, CLASS_MONO_BEHAVIOUR, ContainerId, FileLabel, ResolvedAsset,
    Schema, SchemaView, TypeKey, read_value, skip,
};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{Seek, SeekFrom};
use std::sync::{Mutex, PoisonError};

/// Composite object whose name follows its component list.
pub const GAME_OBJECT_TYPE: &str = "GameObject";
/// Script component type.
pub const MONO_BEHAVIOUR_TYPE: &str = "MonoBehaviour";

/// Format versions above this store 12-byte component entries.
const COMPACT_COMPONENT_VERSION: u32 = 0x10;
const COMPONENT_STRIDE_COMPACT: u64 = 0x0C;
const COMPONENT_STRIDE_WIDE: u64 = 0x10;
/// Bytes between the component list and the name (`m_Layer`).
const GAME_OBJECT_LAYER_SIZE: u64 = 0x04;
/// `m_GameObject` + `m_Enabled` (aligned) + `m_Script`.
const MONO_BEHAVIOUR_HEADER_SIZE: u64 = 0x1C;

const SCRIPT_FIELD: &str = "m_Script";
const CLASS_NAME_FIELD: &str = "m_ClassName";

/// How a type's name is laid out; decided once per schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLayout {
    NamedObject,
    GameObject,
    MonoBehaviour,
    Unnamed,
}

impl NameLayout {
    pub fn of(schema: &impl SchemaView) -> Self {
        if schema.begins_with_name() {
            NameLayout::NamedObject
        } else {
            match schema.type_name() {
                GAME_OBJECT_TYPE => NameLayout::GameObject,
                MONO_BEHAVIOUR_TYPE => NameLayout::MonoBehaviour,
                _ => NameLayout::Unnamed,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LayoutKey {
    Runtime(ContainerId, TypeKey),
    ClassDatabase(i32),
}

/// Resolves object names for references made from one owning container.
pub struct AssetNamer<'a, S: AssetStore> {
    store: &'a S,
    owner: ContainerId,
    options: NamerOptions,
    layouts: Mutex<HashMap<LayoutKey, NameLayout>>,
}

impl<'a, S: AssetStore> AssetNamer<'a, S> {
    pub fn new(store: &'a S, owner: ContainerId) -> Self {
        Self::with_options(store, owner, NamerOptions::default())
    }

    pub fn with_options(store: &'a S, owner: ContainerId, options: NamerOptions) -> Self {
        Self {
            store,
            owner,
            options,
            layouts: Mutex::new(HashMap::new()),
        }
    }

    pub fn owner(&self) -> ContainerId {
        self.owner
    }

    /// Name of the object at `(file_id, path_id)`, or `None` when no name can
    /// be derived.
    pub fn name(&self, file_id: i32, path_id: i64) -> Option<String> {
        if file_id == 0 && path_id == 0 {
            return None;
        }

        let asset = self.store.resolve_reference(self.owner, file_id, path_id)?;
        let (key, schema) = self.schema_for(&asset)?;
        let layout = self.layout(key, &schema);

        let result = match layout {
            NameLayout::NamedObject => self.read_named_object(&asset),
            NameLayout::GameObject => self.read_game_object(&asset),
            NameLayout::MonoBehaviour => self.read_mono_behaviour(&asset, &schema),
            NameLayout::Unnamed => return None,
        };

        match result {
            Ok(name) => name.filter(|n| !n.is_empty()),
            Err(e) => {
                tracing::debug!("Failed to read name of ({}, {}): {}", file_id, path_id, e);
                None
            }
        }
    }

    /// Fill in the reference's container path and bundle label.
    /// Returns whether a path was found.
    pub fn resolve_file_label(&self, reference: &AssetReference) -> bool {
        if let Some(label) = reference.file_label() {
            return !label.path.is_empty();
        }

        let Some(info) = self
            .store
            .dependency(self.owner, reference.file_id)
            .and_then(|c| self.store.container_info(c))
        else {
            return false;
        };

        reference.set_file_label(FileLabel {
            path: info.path.clone(),
            bundle_name: info.bundle_name.clone(),
        });
        !info.path.is_empty()
    }

    fn schema_for(&self, asset: &ResolvedAsset) -> Option<(LayoutKey, Schema)> {
        if self.options.prefer_type_tree {
            let key = runtime_key(asset);
            if let Some(schema) = self.store.runtime_schema(asset.container, key)
                && schema.has_nodes()
            {
                return Some((LayoutKey::Runtime(asset.container, key), schema));
            }
        }

        let schema = self.store.class_database_schema(asset.class_id)?;
        if schema.fields().is_empty() {
            return None;
        }
        Some((LayoutKey::ClassDatabase(asset.class_id), schema))
    }

    fn layout(&self, key: LayoutKey, schema: &Schema) -> NameLayout {
        let mut layouts = self.layouts.lock().unwrap_or_else(PoisonError::into_inner);
        *layouts.entry(key).or_insert_with(|| NameLayout::of(schema))
    }

    fn read_named_object(&self, asset: &ResolvedAsset) -> Result<Option<String>> {
        self.store.with_reader(asset.container, |r| {
            r.seek(SeekFrom::Start(asset.byte_offset))?;
            Ok(Some(r.read_count_string()?))
        })
    }

    fn read_game_object(&self, asset: &ResolvedAsset) -> Result<Option<String>> {
        let stride = self.component_stride(asset.container);
        self.store.with_reader(asset.container, |r| {
            r.seek(SeekFrom::Start(asset.byte_offset))?;
            let count = r.read_i32_le()?;
            let count = u64::try_from(count).map_err(|_| Error::InvalidCount(i64::from(count)))?;
            skip(r, count * stride)?;
            skip(r, GAME_OBJECT_LAYER_SIZE)?;
            Ok(Some(r.read_count_string()?))
        })
    }

    fn read_mono_behaviour(&self, asset: &ResolvedAsset, schema: &Schema) -> Result<Option<String>> {
        let name = self.store.with_reader(asset.container, |r| {
            r.seek(SeekFrom::Start(asset.byte_offset + MONO_BEHAVIOUR_HEADER_SIZE))?;
            r.read_count_string()
        })?;

        if !name.is_empty() {
            return Ok(Some(name));
        }

        // the reader lock is released here; the script lookup takes it again
        Ok(self.script_class_name(asset, schema))
    }

    /// Name of the script class backing a `MonoBehaviour` with an empty
    /// `m_Name`. Any failure yields `None`.
    fn script_class_name(&self, asset: &ResolvedAsset, schema: &Schema) -> Option<String> {
        if asset.class_id != CLASS_MONO_BEHAVIOUR && asset.class_id >= 0 {
            return None;
        }

        match self.try_script_class_name(asset, schema) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("Script class lookup failed: {}", e);
                None
            }
        }
    }

    fn try_script_class_name(&self, asset: &ResolvedAsset, schema: &Schema) -> Result<Option<String>> {
        let mut template = schema.template()?;
        if !template.truncate_after(SCRIPT_FIELD) {
            return Err(Error::FieldNotFound(SCRIPT_FIELD.to_string()));
        }

        let prefix = self.store.with_reader(asset.container, |r| {
            r.seek(SeekFrom::Start(asset.byte_offset))?;
            read_value(r, &template)
        })?;

        let script = prefix.field(SCRIPT_FIELD)?;
        let file_id = script
            .field("m_FileID")?
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| Error::MalformedSchema("m_FileID is not an int".to_string()))?;
        let path_id = script
            .field("m_PathID")?
            .as_i64()
            .ok_or_else(|| Error::MalformedSchema("m_PathID is not an int".to_string()))?;

        // script references are relative to the behaviour's own container
        let script_asset = self
            .store
            .resolve_reference(asset.container, file_id, path_id)
            .ok_or(Error::AssetNotFound { file_id, path_id })?;
        let (_, script_schema) = self
            .schema_for(&script_asset)
            .ok_or(Error::SchemaNotFound { class_id: script_asset.class_id })?;
        let script_template = script_schema.template()?;

        let value = self.store.with_reader(script_asset.container, |r| {
            r.seek(SeekFrom::Start(script_asset.byte_offset))?;
            read_value(r, &script_template)
        })?;

        Ok(value.field(CLASS_NAME_FIELD)?.as_str().map(str::to_string))
    }

    fn component_stride(&self, container: ContainerId) -> u64 {
        let version = self
            .store
            .container_info(container)
            .map_or(0, |info| info.format_version);
        if version > COMPACT_COMPONENT_VERSION {
            COMPONENT_STRIDE_COMPACT
        } else {
            COMPONENT_STRIDE_WIDE
        }
    }
}

fn runtime_key(asset: &ResolvedAsset) -> TypeKey {
    if asset.class_id == CLASS_MONO_BEHAVIOUR || asset.class_id < 0 {
        TypeKey::Script(asset.script_index)
    } else {
        TypeKey::Class(asset.class_id)
    }
}

impl<S: AssetStore> NameResolver for AssetNamer<'_, S> {
    fn name_reference(&self, reference: &AssetReference) -> Option<String> {
        self.resolve_file_label(reference);
        reference
            .name_or_resolve(|| self.name(reference.file_id, reference.path_id))
            .map(str::to_string)
    }
}

//! Asset store seam
//!
//! The container/bundle reader lives outside this crate. Everything the
//! namer and decoder need from it goes through [`AssetStore`]: resolving a
//! reference to a byte offset, looking up schemas, and reading bytes under the
//! container's reader lock.
//!
//! [`MemoryAssetStore`] is a complete in-memory implementation, used by the
//! CLI and the tests.

use super::schema::{ClassDatabase, ClassDatabaseSchema, Schema, TypeTreeType};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle of a loaded container.
pub type ContainerId = usize;

/// Unity class id of `MonoBehaviour`.
pub const CLASS_MONO_BEHAVIOUR: i32 = 0x72;

/// Script index used by non-script types.
pub const NO_SCRIPT_INDEX: u16 = 0xFFFF;

/// Where a referenced object lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub container: ContainerId,
    pub class_id: i32,
    pub script_index: u16,
    /// Absolute offset of the object's data in the container reader.
    pub byte_offset: u64,
}

/// Descriptive data about a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerInfo {
    pub path: String,
    pub bundle_name: Option<String>,
    /// Serialized file format version from the container header.
    pub format_version: u32,
    pub type_tree_enabled: bool,
}

impl ContainerInfo {
    /// A loose (non-bundled) container with type trees enabled.
    pub fn new(path: impl Into<String>, format_version: u32) -> Self {
        Self {
            path: path.into(),
            bundle_name: None,
            format_version,
            type_tree_enabled: true,
        }
    }

    #[must_use]
    pub fn with_bundle(mut self, bundle_name: impl Into<String>) -> Self {
        self.bundle_name = Some(bundle_name.into());
        self
    }

    #[must_use]
    pub fn without_type_trees(mut self) -> Self {
        self.type_tree_enabled = false;
        self
    }
}

/// Key for runtime type-tree lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Class(i32),
    Script(u16),
}

/// Collaborator interface to an asset container reader.
pub trait AssetStore {
    type Reader: Read + Seek;

    /// Resolve `(file_id, path_id)` relative to `owner`.
    fn resolve_reference(&self, owner: ContainerId, file_id: i32, path_id: i64) -> Option<ResolvedAsset>;

    /// Container that `file_id` refers to from `owner` (0 = `owner` itself).
    fn dependency(&self, owner: ContainerId, file_id: i32) -> Option<ContainerId>;

    fn container_info(&self, container: ContainerId) -> Option<&ContainerInfo>;

    /// Type tree stored in the container, if it has one for `key`.
    fn runtime_schema(&self, container: ContainerId, key: TypeKey) -> Option<Schema>;

    /// Layout from the separately loaded class database.
    fn class_database_schema(&self, class_id: i32) -> Option<Schema>;

    /// Run `f` with exclusive access to the container's reader.
    ///
    /// Seek-then-read sequences must happen inside one call so they are not
    /// interleaved with other users of the same container.
    fn with_reader<T>(
        &self,
        container: ContainerId,
        f: impl FnOnce(&mut Self::Reader) -> Result<T>,
    ) -> Result<T>;
}

/// Location and type of one object inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    pub path_id: i64,
    pub class_id: i32,
    pub script_index: u16,
    pub byte_offset: u64,
}

/// An in-memory container: object table, type trees, dependency list and a
/// single shared reader.
#[derive(Debug)]
pub struct AssetContainer {
    info: ContainerInfo,
    objects: HashMap<i64, ObjectInfo>,
    type_trees: HashMap<TypeKey, Arc<TypeTreeType>>,
    dependencies: Vec<ContainerId>,
    reader: Mutex<Cursor<Vec<u8>>>,
}

impl AssetContainer {
    #[must_use]
    pub fn new(info: ContainerInfo, data: Vec<u8>) -> Self {
        Self {
            info,
            objects: HashMap::new(),
            type_trees: HashMap::new(),
            dependencies: Vec::new(),
            reader: Mutex::new(Cursor::new(data)),
        }
    }

    pub fn add_object(&mut self, object: ObjectInfo) {
        self.objects.insert(object.path_id, object);
    }

    /// Register a type tree under its class id, or its script index for
    /// script types.
    pub fn add_type_tree(&mut self, tree: TypeTreeType) {
        let key = if tree.class_id == CLASS_MONO_BEHAVIOUR || tree.class_id < 0 {
            TypeKey::Script(tree.script_index)
        } else {
            TypeKey::Class(tree.class_id)
        };
        self.type_trees.insert(key, Arc::new(tree));
    }

    /// Append a dependency; the first one is reachable as file id 1.
    pub fn add_dependency(&mut self, container: ContainerId) {
        self.dependencies.push(container);
    }

    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn object(&self, path_id: i64) -> Option<&ObjectInfo> {
        self.objects.get(&path_id)
    }
}

/// A set of in-memory containers plus an optional class database.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    containers: Vec<AssetContainer>,
    class_database: Option<Arc<ClassDatabase>>,
}

impl MemoryAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&mut self, container: AssetContainer) -> ContainerId {
        self.containers.push(container);
        self.containers.len() - 1
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut AssetContainer> {
        self.containers.get_mut(id)
    }

    pub fn set_class_database(&mut self, database: ClassDatabase) {
        self.class_database = Some(Arc::new(database));
    }

    fn container(&self, id: ContainerId) -> Result<&AssetContainer> {
        self.containers
            .get(id)
            .ok_or(Error::ContainerNotFound { container: id })
    }
}

impl AssetStore for MemoryAssetStore {
    type Reader = Cursor<Vec<u8>>;

    fn resolve_reference(&self, owner: ContainerId, file_id: i32, path_id: i64) -> Option<ResolvedAsset> {
        let container = self.dependency(owner, file_id)?;
        let object = self.containers.get(container)?.object(path_id)?;
        Some(ResolvedAsset {
            container,
            class_id: object.class_id,
            script_index: object.script_index,
            byte_offset: object.byte_offset,
        })
    }

    fn dependency(&self, owner: ContainerId, file_id: i32) -> Option<ContainerId> {
        let owner_container = self.containers.get(owner)?;
        if file_id == 0 {
            return Some(owner);
        }
        let index = usize::try_from(file_id).ok()?.checked_sub(1)?;
        let dep = *owner_container.dependencies.get(index)?;
        (dep < self.containers.len()).then_some(dep)
    }

    fn container_info(&self, container: ContainerId) -> Option<&ContainerInfo> {
        self.containers.get(container).map(AssetContainer::info)
    }

    fn runtime_schema(&self, container: ContainerId, key: TypeKey) -> Option<Schema> {
        let container = self.containers.get(container)?;
        if !container.info.type_tree_enabled {
            return None;
        }
        container
            .type_trees
            .get(&key)
            .map(|tree| Schema::TypeTree(Arc::clone(tree)))
    }

    fn class_database_schema(&self, class_id: i32) -> Option<Schema> {
        let database = self.class_database.as_ref()?;
        ClassDatabaseSchema::new(Arc::clone(database), class_id).map(Schema::ClassDatabase)
    }

    fn with_reader<T>(
        &self,
        container: ContainerId,
        f: impl FnOnce(&mut Self::Reader) -> Result<T>,
    ) -> Result<T> {
        let container = self.container(container)?;
        // every caller seeks before reading, so a poisoned cursor is still usable
        let mut guard = container
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::schema::TypeTreeNode;
    use std::io::SeekFrom;

    fn container(path: &str) -> AssetContainer {
        AssetContainer::new(
            ContainerInfo {
                path: path.to_string(),
                bundle_name: None,
                format_version: 22,
                type_tree_enabled: true,
            },
            vec![1, 2, 3, 4],
        )
    }

    #[test]
    fn test_resolve_same_and_dependency() {
        let mut store = MemoryAssetStore::new();
        let main = store.add_container(container("main.assets"));
        let mut shared = container("shared.assets");
        shared.add_object(ObjectInfo { path_id: 9, class_id: 1, script_index: NO_SCRIPT_INDEX, byte_offset: 2 });
        let shared = store.add_container(shared);
        store.container_mut(main).unwrap().add_dependency(shared);

        let resolved = store.resolve_reference(main, 1, 9).unwrap();
        assert_eq!(resolved.container, shared);
        assert_eq!(resolved.byte_offset, 2);
        assert!(store.resolve_reference(main, 0, 9).is_none());
        assert!(store.resolve_reference(main, 2, 9).is_none());
        assert!(store.resolve_reference(main, -1, 9).is_none());
    }

    #[test]
    fn test_script_types_keyed_by_script_index() {
        let mut store = MemoryAssetStore::new();
        let mut c = container("a");
        c.add_type_tree(TypeTreeType {
            class_id: CLASS_MONO_BEHAVIOUR,
            script_index: 3,
            nodes: vec![TypeTreeNode::new(0, "MonoBehaviour", "Base", -1)],
        });
        let id = store.add_container(c);
        assert!(store.runtime_schema(id, TypeKey::Script(3)).is_some());
        assert!(store.runtime_schema(id, TypeKey::Class(CLASS_MONO_BEHAVIOUR)).is_none());
    }

    #[test]
    fn test_type_tree_disabled_hides_schemas() {
        let mut store = MemoryAssetStore::new();
        let mut c = container("a");
        c.info.type_tree_enabled = false;
        c.add_type_tree(TypeTreeType {
            class_id: 1,
            script_index: NO_SCRIPT_INDEX,
            nodes: vec![TypeTreeNode::new(0, "GameObject", "Base", -1)],
        });
        let id = store.add_container(c);
        assert!(store.runtime_schema(id, TypeKey::Class(1)).is_none());
    }

    #[test]
    fn test_with_reader_missing_container() {
        let store = MemoryAssetStore::new();
        let result = store.with_reader(3, |r| Ok(r.position()));
        assert!(matches!(result, Err(Error::ContainerNotFound { container: 3 })));
    }

    #[test]
    fn test_reader_lock_serializes_threads() {
        let mut store = MemoryAssetStore::new();
        let id = store.add_container(AssetContainer::new(ContainerInfo::default(), (0u8..=255).collect()));
        let store = Arc::new(store);

        let handles: Vec<_> = (0u8..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .with_reader(id, |r| {
                            r.seek(SeekFrom::Start(u64::from(i) * 10))?;
                            std::thread::yield_now();
                            let mut byte = [0u8; 1];
                            r.read_exact(&mut byte)?;
                            Ok(byte[0])
                        })
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), (i as u8) * 10);
        }
    }
}

//! Reference naming against synthetic containers

use byteorder::{LittleEndian, WriteBytesExt};
use fsmlens::assets::{
    AssetContainer, AssetReference, ClassDatabase, ClassDatabaseNode, ClassDatabaseType, ContainerInfo,
    MemoryAssetStore, NO_SCRIPT_INDEX, ObjectInfo, TypeTreeNode, TypeTreeType,
};
use fsmlens::naming::{AssetNamer, NameResolver, NamerOptions};

const CLASS_GAME_OBJECT: i32 = 1;
const CLASS_TRANSFORM: i32 = 4;
const CLASS_MATERIAL: i32 = 21;
const CLASS_MONO_BEHAVIOUR: i32 = 114;
const CLASS_MONO_SCRIPT: i32 = 115;

/// Object bytes laid out back to back, with their offsets.
#[derive(Default)]
struct Blob {
    data: Vec<u8>,
}

impl Blob {
    fn begin(&mut self) -> u64 {
        // keep every object away from offset 0 so offsets are really used
        self.data.extend_from_slice(&[0xEE; 8]);
        self.data.len() as u64
    }

    fn i32(&mut self, v: i32) {
        self.data.write_i32::<LittleEndian>(v).unwrap();
    }

    fn i64(&mut self, v: i64) {
        self.data.write_i64::<LittleEndian>(v).unwrap();
    }

    fn string(&mut self, s: &str) {
        self.i32(s.len() as i32);
        self.data.extend_from_slice(s.as_bytes());
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
    }

    fn filler(&mut self, len: usize) {
        self.data.extend(std::iter::repeat_n(0xAB, len));
    }
}

fn object(path_id: i64, class_id: i32, byte_offset: u64) -> ObjectInfo {
    ObjectInfo {
        path_id,
        class_id,
        script_index: NO_SCRIPT_INDEX,
        byte_offset,
    }
}

fn material_tree() -> TypeTreeType {
    TypeTreeType {
        class_id: CLASS_MATERIAL,
        script_index: NO_SCRIPT_INDEX,
        nodes: vec![
            TypeTreeNode::new(0, "Material", "Base", -1),
            TypeTreeNode::new(1, "string", "m_Name", -1),
            TypeTreeNode::new(1, "PPtr<Shader>", "m_Shader", 12),
        ],
    }
}

fn game_object_tree() -> TypeTreeType {
    TypeTreeType {
        class_id: CLASS_GAME_OBJECT,
        script_index: NO_SCRIPT_INDEX,
        nodes: vec![
            TypeTreeNode::new(0, "GameObject", "Base", -1),
            TypeTreeNode::new(1, "vector", "m_Component", -1),
            TypeTreeNode::new(1, "unsigned int", "m_Layer", 4),
            TypeTreeNode::new(1, "string", "m_Name", -1),
        ],
    }
}

fn transform_tree() -> TypeTreeType {
    TypeTreeType {
        class_id: CLASS_TRANSFORM,
        script_index: NO_SCRIPT_INDEX,
        nodes: vec![
            TypeTreeNode::new(0, "Transform", "Base", -1),
            TypeTreeNode::new(1, "PPtr<GameObject>", "m_GameObject", 12),
        ],
    }
}

fn mono_behaviour_tree(script_index: u16) -> TypeTreeType {
    TypeTreeType {
        class_id: CLASS_MONO_BEHAVIOUR,
        script_index,
        nodes: vec![
            TypeTreeNode::new(0, "MonoBehaviour", "Base", -1),
            TypeTreeNode::new(1, "PPtr<GameObject>", "m_GameObject", 12),
            TypeTreeNode::new(2, "int", "m_FileID", 4),
            TypeTreeNode::new(2, "SInt64", "m_PathID", 8),
            TypeTreeNode::new(1, "UInt8", "m_Enabled", 1).aligned(),
            TypeTreeNode::new(1, "PPtr<MonoScript>", "m_Script", 12),
            TypeTreeNode::new(2, "int", "m_FileID", 4),
            TypeTreeNode::new(2, "SInt64", "m_PathID", 8),
            TypeTreeNode::new(1, "string", "m_Name", -1),
            TypeTreeNode::new(1, "PlayMakerFSM", "fsm", -1),
        ],
    }
}

fn mono_script_tree() -> TypeTreeType {
    TypeTreeType {
        class_id: CLASS_MONO_SCRIPT,
        script_index: NO_SCRIPT_INDEX,
        nodes: vec![
            TypeTreeNode::new(0, "MonoScript", "Base", -1),
            TypeTreeNode::new(1, "string", "m_Name", -1),
            TypeTreeNode::new(1, "int", "m_ExecutionOrder", 4),
            TypeTreeNode::new(1, "string", "m_ClassName", -1),
            TypeTreeNode::new(1, "string", "m_Namespace", -1),
        ],
    }
}

/// Game object with `components` 12- or 16-byte entries and a trailing name.
fn write_game_object(blob: &mut Blob, components: usize, stride: usize, name: &str) -> u64 {
    let base = blob.begin();
    blob.i32(components as i32);
    blob.filler(components * stride);
    blob.i32(0); // m_Layer
    blob.string(name);
    base
}

fn write_mono_behaviour(blob: &mut Blob, name: &str, script_path_id: i64) -> u64 {
    let base = blob.begin();
    blob.i32(0);
    blob.i64(1); // m_GameObject
    blob.i32(1); // m_Enabled + padding
    blob.i32(0);
    blob.i64(script_path_id); // m_Script
    blob.string(name);
    base
}

#[test]
fn test_null_reference_has_no_name() {
    let store = MemoryAssetStore::new();
    let namer = AssetNamer::new(&store, 0);
    assert_eq!(namer.name(0, 0), None);
}

#[test]
fn test_named_object_reads_stored_name() {
    let mut blob = Blob::default();
    let lamp = blob.begin();
    blob.string("LampMaterial");
    let blank = blob.begin();
    blob.string("");

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(material_tree());
    container.add_object(object(10, CLASS_MATERIAL, lamp));
    container.add_object(object(11, CLASS_MATERIAL, blank));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    let namer = AssetNamer::new(&store, id);

    assert_eq!(namer.name(0, 10).as_deref(), Some("LampMaterial"));
    assert_eq!(namer.name(0, 11), None);
    assert_eq!(namer.name(0, 12), None);
}

#[test]
fn test_game_object_name_after_compact_components() {
    let mut blob = Blob::default();
    let base = write_game_object(&mut blob, 3, 0x0C, "Player");
    // name length sits at base + 4 + 3 * 0x0C + 4
    let name_at = (base + 4 + 3 * 0x0C + 4) as usize;
    assert_eq!(&blob.data[name_at..name_at + 4], &6i32.to_le_bytes());

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 0x16), blob.data);
    container.add_type_tree(game_object_tree());
    container.add_object(object(1, CLASS_GAME_OBJECT, base));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    assert_eq!(AssetNamer::new(&store, id).name(0, 1).as_deref(), Some("Player"));
}

#[test]
fn test_game_object_name_after_wide_components() {
    let mut blob = Blob::default();
    let base = write_game_object(&mut blob, 2, 0x10, "OldPlayer");

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 0x10), blob.data);
    container.add_type_tree(game_object_tree());
    container.add_object(object(1, CLASS_GAME_OBJECT, base));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    assert_eq!(AssetNamer::new(&store, id).name(0, 1).as_deref(), Some("OldPlayer"));
}

#[test]
fn test_mono_behaviour_name_and_script_fallback() {
    let mut blob = Blob::default();
    let named = write_mono_behaviour(&mut blob, "Door FSM", 50);
    let unnamed = write_mono_behaviour(&mut blob, "", 50);
    let script = blob.begin();
    blob.string("PlayMakerFSM");
    blob.i32(0);
    blob.string("PlayMakerFSM");
    blob.string("");

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(mono_behaviour_tree(0));
    container.add_type_tree(mono_script_tree());
    for (path_id, offset) in [(20, named), (21, unnamed)] {
        container.add_object(ObjectInfo {
            path_id,
            class_id: CLASS_MONO_BEHAVIOUR,
            script_index: 0,
            byte_offset: offset,
        });
    }
    container.add_object(object(50, CLASS_MONO_SCRIPT, script));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    let namer = AssetNamer::new(&store, id);

    assert_eq!(namer.name(0, 20).as_deref(), Some("Door FSM"));
    assert_eq!(namer.name(0, 21).as_deref(), Some("PlayMakerFSM"));
}

#[test]
fn test_mono_behaviour_fallback_failure_is_none() {
    let mut blob = Blob::default();
    // script reference points at an object that does not exist
    let base = write_mono_behaviour(&mut blob, "", 999);

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(mono_behaviour_tree(0));
    container.add_object(ObjectInfo {
        path_id: 20,
        class_id: CLASS_MONO_BEHAVIOUR,
        script_index: 0,
        byte_offset: base,
    });

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    assert_eq!(AssetNamer::new(&store, id).name(0, 20), None);
}

#[test]
fn test_unnamed_type_has_no_name() {
    let mut blob = Blob::default();
    let base = blob.begin();
    blob.filler(12);

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(transform_tree());
    container.add_object(object(4, CLASS_TRANSFORM, base));
    // no schema anywhere for this one
    container.add_object(object(5, 999, base));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    let namer = AssetNamer::new(&store, id);
    assert_eq!(namer.name(0, 4), None);
    assert_eq!(namer.name(0, 5), None);
}

fn game_object_class_database() -> ClassDatabase {
    let mut db = ClassDatabase::new();
    let leaf = |db: &mut ClassDatabase, ty: &str, name: &str, size: i32| ClassDatabaseNode {
        type_name: db.intern(ty),
        field_name: db.intern(name),
        byte_size: size,
        type_flags: 0,
        meta_flags: 0,
        children: Vec::new(),
    };
    let children = vec![
        leaf(&mut db, "vector", "m_Component", -1),
        leaf(&mut db, "unsigned int", "m_Layer", 4),
        leaf(&mut db, "string", "m_Name", -1),
    ];
    let root = ClassDatabaseNode {
        children,
        ..leaf(&mut db, "GameObject", "Base", -1)
    };
    let name = db.intern("GameObject");
    db.add_type(ClassDatabaseType {
        class_id: CLASS_GAME_OBJECT,
        name,
        root,
    });
    db
}

#[test]
fn test_class_database_used_without_type_trees() {
    let mut blob = Blob::default();
    let base = write_game_object(&mut blob, 1, 0x0C, "Crate");

    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22).without_type_trees(), blob.data);
    container.add_type_tree(material_tree());
    container.add_object(object(1, CLASS_GAME_OBJECT, base));

    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    assert_eq!(AssetNamer::new(&store, id).name(0, 1), None);

    store.set_class_database(game_object_class_database());
    assert_eq!(AssetNamer::new(&store, id).name(0, 1).as_deref(), Some("Crate"));
}

#[test]
fn test_prefer_class_database_option() {
    let mut blob = Blob::default();
    let base = write_game_object(&mut blob, 0, 0x0C, "Empty");

    // the type tree claims a plain named object, which would read garbage here
    let mut bogus = material_tree();
    bogus.class_id = CLASS_GAME_OBJECT;
    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(bogus);
    container.add_object(object(1, CLASS_GAME_OBJECT, base));

    let mut store = MemoryAssetStore::new();
    store.set_class_database(game_object_class_database());
    let id = store.add_container(container);

    let options = NamerOptions::new().with_prefer_type_tree(false);
    let namer = AssetNamer::with_options(&store, id, options);
    assert_eq!(namer.name(0, 1).as_deref(), Some("Empty"));
}

#[test]
fn test_name_reference_labels_and_caches() {
    let mut blob = Blob::default();
    let base = blob.begin();
    blob.string("CrateMaterial");

    let mut store = MemoryAssetStore::new();
    let main = store.add_container(AssetContainer::new(ContainerInfo::new("/data/level0", 22), Vec::new()));
    let mut shared = AssetContainer::new(
        ContainerInfo::new("/data/cache/shared.assets", 22).with_bundle("props.bundle"),
        blob.data,
    );
    shared.add_type_tree(material_tree());
    shared.add_object(object(7, CLASS_MATERIAL, base));
    let shared = store.add_container(shared);
    store.container_mut(main).unwrap().add_dependency(shared);

    let namer = AssetNamer::new(&store, main);
    let reference = AssetReference::new(1, 7);
    assert_eq!(namer.name_reference(&reference).as_deref(), Some("CrateMaterial"));
    assert!(reference.is_name_resolved());
    assert_eq!(reference.to_string(), "CrateMaterial/PPtr(props.bundle:shared.assets,7)");

    let missing = AssetReference::new(3, 7);
    assert!(!namer.resolve_file_label(&missing));
    assert_eq!(namer.name_reference(&missing), None);
    assert_eq!(missing.to_string(), "PPtr(3,7)");
}

#[test]
fn test_concurrent_names_from_one_container() {
    let mut blob = Blob::default();
    let mut container_objects = Vec::new();
    for i in 0..16 {
        let base = blob.begin();
        blob.string(&format!("Material{i}"));
        container_objects.push(object(100 + i, CLASS_MATERIAL, base));
    }
    let mut container = AssetContainer::new(ContainerInfo::new("level0", 22), blob.data);
    container.add_type_tree(material_tree());
    for o in container_objects {
        container.add_object(o);
    }
    let mut store = MemoryAssetStore::new();
    let id = store.add_container(container);
    let namer = AssetNamer::new(&store, id);

    std::thread::scope(|scope| {
        for i in 0..16i64 {
            let namer = &namer;
            scope.spawn(move || {
                for _ in 0..20 {
                    assert_eq!(namer.name(0, 100 + i), Some(format!("Material{i}")));
                }
            });
        }
    });
}

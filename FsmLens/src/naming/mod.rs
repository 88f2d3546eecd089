//! Display names for referenced objects
//!
//! [`AssetNamer`] reads names straight out of container bytes using whichever
//! schema is available. Consumers that only need names depend on
//! [`NameResolver`], so documents can also be built without any container
//! loaded (see [`NoNames`]).
//!
//! # Usage
//!
//! ```no_run
//! use fsmlens::assets::MemoryAssetStore;
//! use fsmlens::naming::AssetNamer;
//!
//! let store = MemoryAssetStore::new();
//! let namer = AssetNamer::new(&store, 0);
//! let name = namer.name(0, 42).unwrap_or_else(|| "<Unknown GO>".to_string());
//! ```

mod namer;

pub use namer::{AssetNamer, GAME_OBJECT_TYPE, MONO_BEHAVIOUR_TYPE, NameLayout};

use crate::assets::AssetReference;

/// Anything that can put a name on an [`AssetReference`].
pub trait NameResolver {
    /// Resolve (and cache on the reference) its display name.
    fn name_reference(&self, reference: &AssetReference) -> Option<String>;
}

/// Resolver used when no containers are loaded; only names already cached on
/// a reference are returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn name_reference(&self, reference: &AssetReference) -> Option<String> {
        reference.name().map(str::to_string)
    }
}

/// Options for [`AssetNamer`].
#[derive(Debug, Clone, Copy)]
pub struct NamerOptions {
    /// Prefer the container's runtime type tree over the class database.
    /// Default: true
    pub prefer_type_tree: bool,
}

impl Default for NamerOptions {
    fn default() -> Self {
        Self {
            prefer_type_tree: true,
        }
    }
}

impl NamerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefer_type_tree(mut self, prefer: bool) -> Self {
        self.prefer_type_tree = prefer;
        self
    }
}

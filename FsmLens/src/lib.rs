#![allow(non_snake_case)]
//! # FsmLens
//!
//! A read-only inspector for `PlayMaker` state machines stored in Unity asset
//! containers.
//!
//! ## Components
//!
//! - **Reference naming** - display names for referenced objects, read from raw
//!   container bytes through a type tree or a class database
//! - **Action decoding** - typed values from the tagged parameter blob of each
//!   action, across both parameter encoding generations
//! - **Documents** - a node/field graph of one state machine, ready for display
//!   or export as text and JSON
//!
//! ## Quick Start
//!
//! ### Building a Document
//!
//! ```no_run
//! use fsmlens::prelude::*;
//!
//! let fsm = StateMachine::from_json_file("door.fsm.json")?;
//! let doc = build_document(&fsm, &NoNames);
//! println!("{} nodes", doc.nodes.len());
//! print!("{}", to_text(&doc));
//! # Ok::<(), fsmlens::Error>(())
//! ```
//!
//! ### Naming References from a Container
//!
//! ```no_run
//! use fsmlens::prelude::*;
//!
//! let mut store = MemoryAssetStore::new();
//! let info = ContainerInfo::new("level1.assets", 22);
//! let container = store.add_container(AssetContainer::new(info, std::fs::read("level1.objects")?));
//!
//! let namer = AssetNamer::new(&store, container);
//! let name = namer.name(0, 42);
//! # Ok::<(), fsmlens::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `fsmlens` command-line binary

pub mod assets;
pub mod document;
pub mod error;
pub mod naming;
pub mod playmaker;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::assets::{
        AssetContainer, AssetReference, AssetStore, ContainerInfo, DetectedFileType, MemoryAssetStore,
        ObjectInfo, detect_file_type, detect_file_type_path,
    };
    pub use crate::naming::{AssetNamer, NameResolver, NamerOptions, NoNames};
    pub use crate::playmaker::{
        ActionDecoder, DecodedParameter, DecodedValue, FsmActionData, ParamDataType, StateMachine,
        VariableType, decode_action,
    };
    pub use crate::document::{
        Document, DocumentBuilder, DocumentOptions, Field, FieldValue, Node, build_document, to_json, to_text,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

//! Display documents
//!
//! A [`Document`] is a snapshot of one state machine laid out for display:
//! one [`Node`] per state plus one per global transition, the event list and
//! the variable list. Values are reduced to [`FieldValue`]s; structured values
//! go through [`ValuePreview`].
//!
//! # Usage
//!
//! ```no_run
//! use fsmlens::document::{DocumentBuilder, DocumentOptions, to_text};
//! use fsmlens::naming::NoNames;
//! use fsmlens::playmaker::StateMachine;
//!
//! let fsm = StateMachine::from_json_file("door.fsm.json")?;
//! let doc = DocumentBuilder::with_options(&NoNames, DocumentOptions::new().with_variables(false)).build(&fsm);
//! println!("{}", to_text(&doc));
//! # Ok::<(), fsmlens::Error>(())
//! ```

mod builder;
mod export;
mod model;
mod preview;

pub use builder::{DocumentBuilder, DocumentOptions, UNKNOWN_GAME_OBJECT, build_document};
pub use export::{to_json, to_text};
pub use model::{
    Bounds, Document, DocumentEvent, Field, FieldValue, Node, NodeId, NodeTransition, Rgb, STATE_COLORS,
    TRANSITION_COLORS, TypeReference, ValueKind, palette_index,
};
pub use preview::ValuePreview;

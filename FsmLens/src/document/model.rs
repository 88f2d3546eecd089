//! Display document produced from one state machine

use serde::Serialize;
use std::fmt;

/// Index of a node in [`Document::nodes`].
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const STATE_COLORS: [Rgb; 8] = [
    Rgb::new(128, 128, 128),
    Rgb::new(116, 143, 201),
    Rgb::new(58, 182, 166),
    Rgb::new(93, 164, 53),
    Rgb::new(225, 254, 50),
    Rgb::new(235, 131, 46),
    Rgb::new(187, 75, 75),
    Rgb::new(117, 53, 164),
];

pub const TRANSITION_COLORS: [Rgb; 8] = [
    Rgb::new(222, 222, 222),
    Rgb::new(197, 213, 248),
    Rgb::new(159, 225, 216),
    Rgb::new(183, 225, 159),
    Rgb::new(225, 254, 102),
    Rgb::new(255, 198, 152),
    Rgb::new(225, 159, 160),
    Rgb::new(197, 159, 225),
];

/// Palette slot for a declared color index; indices past the palette use the last entry.
pub fn palette_index(color_index: u8) -> usize {
    usize::from(color_index).min(STATE_COLORS.len() - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// Outgoing edge. `to` is `None` when no state carries the target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTransition {
    pub event: String,
    pub to: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub is_start: bool,
    pub is_global: bool,
    pub bounds: Bounds,
    pub node_color: Rgb,
    pub transition_color: Rgb,
    pub transitions: Vec<NodeTransition>,
    pub fields: Vec<Field>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_start: false,
            is_global: false,
            bounds: Bounds::default(),
            node_color: STATE_COLORS[0],
            transition_color: TRANSITION_COLORS[0],
            transitions: Vec::new(),
            fields: Vec::new(),
        }
    }
}

/// A class as named in the scripting runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub class_name: String,
    pub namespace: String,
    pub assembly_name: String,
}

impl TypeReference {
    pub fn new(class_name: impl Into<String>, namespace: impl Into<String>, assembly_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            namespace: namespace.into(),
            assembly_name: assembly_name.into(),
        }
    }
}

/// Category of a previewed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Vector,
    Color,
    Rect,
    Enum,
    Event,
    Variable,
    Object,
    Call,
}

/// Display form of a field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldValue {
    Integer { value: i32 },
    Float { value: f32 },
    Boolean { value: bool },
    String { value: String },
    /// Array summary; the elements are separate fields.
    Array { type_name: String, len: usize },
    Reference { value_kind: ValueKind, preview: String },
    Fallback { text: String },
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer { value } => write!(f, "{value}"),
            FieldValue::Float { value } => write!(f, "{value}"),
            FieldValue::Boolean { value } => write!(f, "{value}"),
            FieldValue::String { value } => write!(f, "\"{value}\""),
            FieldValue::Array { type_name, len } => write!(f, "{type_name}[{len}]"),
            FieldValue::Reference { preview, .. } => write!(f, "{preview}"),
            FieldValue::Fallback { text } => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Field {
    /// Marks the start of an action or a group of variables.
    Class { class: TypeReference, enabled: bool },
    #[serde(rename_all = "camelCase")]
    Data {
        name: String,
        value: FieldValue,
        /// Variable name bound to the value, empty for literals.
        value_name: String,
        indent: u8,
    },
}

impl Field {
    pub fn class(class: TypeReference, enabled: bool) -> Self {
        Field::Class { class, enabled }
    }

    pub fn data(name: impl Into<String>, value: FieldValue) -> Self {
        Field::Data {
            name: name.into(),
            value,
            value_name: String::new(),
            indent: 0,
        }
    }

    #[must_use]
    pub fn with_value_name(mut self, new_name: impl Into<String>) -> Self {
        if let Field::Data { value_name, .. } = &mut self {
            *value_name = new_name.into();
        }
        self
    }

    #[must_use]
    pub fn indented(mut self, level: u8) -> Self {
        if let Field::Data { indent, .. } = &mut self {
            *indent = level;
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Field::Class { class, .. } => &class.class_name,
            Field::Data { name, .. } => name,
        }
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            Field::Class { .. } => None,
            Field::Data { value, .. } => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEvent {
    pub name: String,
    pub is_system: bool,
    pub is_global: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub fsm_name: String,
    pub game_object_name: String,
    pub nodes: Vec<Node>,
    pub events: Vec<DocumentEvent>,
    pub variables: Vec<Field>,
}

impl Document {
    pub fn new(fsm_name: impl Into<String>, game_object_name: impl Into<String>) -> Self {
        Self {
            fsm_name: fsm_name.into(),
            game_object_name: game_object_name.into(),
            nodes: Vec::new(),
            events: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// First node with the given name.
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_start)
    }

    /// Destination node of a transition, if it was resolved.
    pub fn target(&self, transition: &NodeTransition) -> Option<&Node> {
        transition.to.and_then(|id| self.nodes.get(id))
    }
}

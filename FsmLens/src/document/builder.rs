//! State machine to display document conversion

use super::model::{
    Bounds, Document, DocumentEvent, Field, FieldValue, Node, NodeId, NodeTransition, STATE_COLORS, TRANSITION_COLORS,
    TypeReference, ValueKind, palette_index,
};
use super::preview::{ValuePreview, object_preview};
use crate::naming::NameResolver;
use crate::playmaker::{
    ActionDecoder, DecodedValue, FsmArray, FsmEnum, FsmObject, FsmState, FsmVariable, FsmVariables, StateMachine,
    VariableType, trim_class_name,
};
use std::collections::HashMap;

/// Label used when the owning game object has no resolvable name.
pub const UNKNOWN_GAME_OBJECT: &str = "<Unknown GO>";

const PLAYMAKER_NAMESPACE: &str = "HutongGames.PlayMaker";
const PLAYMAKER_ASSEMBLY: &str = "PlayMaker.dll";
// action class markers carry placeholders; the serialized data has no namespace
const ACTION_NAMESPACE: &str = "Namespace";
const ACTION_ASSEMBLY: &str = "AssemblyName";

/// Options for [`DocumentBuilder`].
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Emit action class markers and decoded parameters on state nodes.
    /// Default: true
    pub include_actions: bool,
    /// Emit the variable list.
    /// Default: true
    pub include_variables: bool,
    /// Distance between a global transition node and its target's top edge.
    /// Default: 50.0
    pub global_node_offset: f32,
    /// Height of global transition nodes.
    /// Default: 18.0
    pub global_node_height: f32,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            include_actions: true,
            include_variables: true,
            global_node_offset: 50.0,
            global_node_height: 18.0,
        }
    }
}

impl DocumentOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only nodes, transitions and events.
    #[must_use]
    pub fn graph_only() -> Self {
        Self {
            include_actions: false,
            include_variables: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_actions(mut self, enabled: bool) -> Self {
        self.include_actions = enabled;
        self
    }

    #[must_use]
    pub fn with_variables(mut self, enabled: bool) -> Self {
        self.include_variables = enabled;
        self
    }

    #[must_use]
    pub fn with_global_node_geometry(mut self, offset: f32, height: f32) -> Self {
        self.global_node_offset = offset;
        self.global_node_height = height;
        self
    }
}

/// Builds a [`Document`] from a [`StateMachine`].
pub struct DocumentBuilder<'a> {
    names: &'a dyn NameResolver,
    options: DocumentOptions,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(names: &'a dyn NameResolver) -> Self {
        Self::with_options(names, DocumentOptions::default())
    }

    pub fn with_options(names: &'a dyn NameResolver, options: DocumentOptions) -> Self {
        Self { names, options }
    }

    pub fn build(&self, fsm: &StateMachine) -> Document {
        let game_object_name = self
            .names
            .name_reference(&fsm.game_object)
            .unwrap_or_else(|| UNKNOWN_GAME_OBJECT.to_string());
        let mut doc = Document::new(fsm.name.clone(), game_object_name);

        // later states with a duplicate name win the lookup
        let mut lookup: HashMap<&str, NodeId> = HashMap::new();
        for (id, state) in fsm.states.iter().enumerate() {
            doc.nodes.push(Node::new(state.name.clone()));
            lookup.insert(state.name.as_str(), id);
        }

        let start = fsm.find_start_state();
        for (id, state) in fsm.states.iter().enumerate() {
            let node = &mut doc.nodes[id];
            node.is_start = start == Some(id);
            self.fill_state_node(node, state, &lookup, fsm.data_version);
        }

        self.add_global_transitions(&mut doc, fsm, &lookup);

        doc.events = fsm
            .events
            .iter()
            .map(|e| DocumentEvent {
                name: e.name.clone(),
                is_system: e.is_system_event,
                is_global: e.is_global,
            })
            .collect();

        if self.options.include_variables {
            doc.variables = self.variable_fields(&fsm.variables);
        }

        tracing::info!(
            "Built document for '{}': {} nodes, {} events, {} variable fields",
            doc.fsm_name,
            doc.nodes.len(),
            doc.events.len(),
            doc.variables.len()
        );
        doc
    }

    fn fill_state_node(&self, node: &mut Node, state: &FsmState, lookup: &HashMap<&str, NodeId>, generation: i32) {
        let pos = state.position;
        node.bounds = Bounds {
            x: pos.x,
            y: pos.y,
            width: pos.width,
            height: pos.height,
        };

        let color = palette_index(state.color_index);
        node.node_color = STATE_COLORS[color];
        node.transition_color = TRANSITION_COLORS[color];

        for transition in &state.transitions {
            let to = lookup.get(transition.to_state.as_str()).copied();
            if to.is_none() {
                tracing::debug!(
                    "State '{}': transition '{}' targets missing state '{}'",
                    state.name,
                    transition.fsm_event.name,
                    transition.to_state
                );
            }
            node.transitions.push(NodeTransition {
                event: transition.fsm_event.name.clone(),
                to,
            });
        }

        if self.options.include_actions {
            self.add_action_fields(&mut node.fields, state, generation);
        }
    }

    fn add_action_fields(&self, fields: &mut Vec<Field>, state: &FsmState, generation: i32) {
        let data = &state.action_data;
        let decoder = ActionDecoder::new(data, generation);

        for index in 0..data.action_count() {
            let class_name = trim_class_name(data.action_name(index).unwrap_or_default());
            fields.push(Field::class(
                TypeReference::new(class_name, ACTION_NAMESPACE, ACTION_ASSEMBLY),
                data.action_enabled(index),
            ));

            match decoder.decode_action(index) {
                Ok(params) => {
                    for param in params {
                        let indent = param.depth;
                        fields.push(self.field(param.name, &param.value).indented(indent));
                    }
                }
                Err(e) => {
                    tracing::debug!("State '{}': action {} not decoded: {}", state.name, index, e);
                }
            }
        }
    }

    fn add_global_transitions(&self, doc: &mut Document, fsm: &StateMachine, lookup: &HashMap<&str, NodeId>) {
        for transition in &fsm.global_transitions {
            let event = &transition.fsm_event.name;
            let to = lookup.get(transition.to_state.as_str()).copied();
            let target_bounds = to.map(|id| doc.nodes[id].bounds).unwrap_or_default();
            if to.is_none() {
                tracing::debug!(
                    "Global transition '{}' targets missing state '{}'",
                    event,
                    transition.to_state
                );
            }

            let mut node = Node::new(event.clone());
            node.is_global = true;
            node.bounds = Bounds {
                x: target_bounds.x,
                y: target_bounds.y - self.options.global_node_offset,
                width: target_bounds.width,
                height: self.options.global_node_height,
            };
            node.transitions.push(NodeTransition {
                event: event.clone(),
                to,
            });
            doc.nodes.push(node);
        }
    }

    /// A data field for a decoded value; a variable wrapper's name becomes
    /// the field's value name.
    fn field(&self, name: String, value: &DecodedValue) -> Field {
        Field::data(name, self.classify(value)).with_value_name(value.variable_name())
    }

    /// Map any decoded value to its display form.
    pub fn classify(&self, value: &DecodedValue) -> FieldValue {
        let names = self.names;
        let reference = |value_kind, preview| FieldValue::Reference { value_kind, preview };

        match value {
            DecodedValue::Int(v) => FieldValue::Integer { value: *v },
            DecodedValue::Float(v) => FieldValue::Float { value: *v },
            DecodedValue::Bool(v) => FieldValue::Boolean { value: *v },
            DecodedValue::String(v) => FieldValue::String { value: v.clone() },
            DecodedValue::Array { type_name, elements } => FieldValue::Array {
                type_name: type_name.clone(),
                len: elements.len(),
            },
            DecodedValue::Variable {
                name,
                use_variable: true,
                ..
            } => reference(ValueKind::Variable, name.clone()),
            DecodedValue::Variable { value, .. } => self.classify(value),
            DecodedValue::Vector2(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Vector3(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Vector4(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Quaternion(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Color(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Rect(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Enum { enum_name, value } => {
                reference(ValueKind::Enum, format!("{} ({value})", trim_class_name(enum_name)))
            }
            DecodedValue::Event(name) => reference(ValueKind::Event, name.clone()),
            DecodedValue::Reference(r) => reference(r.value_kind(), r.preview(names)),
            DecodedValue::Object { type_name, reference: r } => {
                reference(ValueKind::Object, object_preview(type_name, r, names))
            }
            DecodedValue::OwnerDefault(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Var(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::EventTarget(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::FsmArray(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::FunctionCall(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Property(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::TemplateControl(v) => reference(v.value_kind(), v.preview(names)),
            DecodedValue::Fallback { message, .. } => FieldValue::Fallback { text: message.clone() },
        }
    }

    fn variable_fields(&self, vars: &FsmVariables) -> Vec<Field> {
        let mut fields = Vec::new();

        push_group(&mut fields, "FsmFloat", &vars.float_variables, |v| FieldValue::Float {
            value: v.value,
        });
        push_group(&mut fields, "FsmInt", &vars.int_variables, |v| FieldValue::Integer {
            value: v.value,
        });
        push_group(&mut fields, "FsmBool", &vars.bool_variables, |v| FieldValue::Boolean {
            value: v.value,
        });
        push_group(&mut fields, "FsmString", &vars.string_variables, |v| FieldValue::String {
            value: v.value.clone(),
        });
        self.push_previews(&mut fields, "FsmVector2", &vars.vector2_variables);
        self.push_previews(&mut fields, "FsmVector3", &vars.vector3_variables);
        self.push_previews(&mut fields, "FsmColor", &vars.color_variables);
        self.push_previews(&mut fields, "FsmRect", &vars.rect_variables);
        self.push_previews(&mut fields, "FsmQuaternion", &vars.quaternion_variables);
        self.push_previews(&mut fields, "FsmGameObject", &vars.game_object_variables);
        self.push_objects(&mut fields, "FsmObject", &vars.object_variables);
        self.push_objects(&mut fields, "FsmMaterial", &vars.material_variables);
        self.push_objects(&mut fields, "FsmTexture", &vars.texture_variables);
        self.push_arrays(&mut fields, &vars.array_variables);
        push_group(&mut fields, "FsmEnum", &vars.enum_variables, |v| FieldValue::Reference {
            value_kind: ValueKind::Enum,
            preview: format!("{} ({})", trim_class_name(&v.enum_name), v.int_value),
        });

        fields
    }

    fn push_previews<T: ValuePreview>(&self, fields: &mut Vec<Field>, class_name: &str, vars: &[FsmVariable<T>]) {
        push_group(fields, class_name, vars, |v| FieldValue::Reference {
            value_kind: v.value.value_kind(),
            preview: v.value.preview(self.names),
        });
    }

    fn push_objects(&self, fields: &mut Vec<Field>, class_name: &str, vars: &[FsmObject]) {
        push_group(fields, class_name, vars, |v| FieldValue::Reference {
            value_kind: v.value_kind(),
            preview: v.preview(self.names),
        });
    }

    fn push_arrays(&self, fields: &mut Vec<Field>, arrays: &[FsmArray]) {
        if arrays.is_empty() {
            return;
        }
        fields.push(playmaker_class("FsmArray"));

        for array in arrays {
            fields.push(Field::data(
                array.name.clone(),
                FieldValue::Array {
                    type_name: array.element_type_name().to_string(),
                    len: array.len(),
                },
            ));

            for (i, value) in self.array_elements(array).into_iter().enumerate() {
                fields.push(Field::data(format!("{}[{i}]", array.name), value).indented(1));
            }
        }
    }

    /// Display values of an array variable's elements, read from the
    /// collection its element kind is stored in.
    fn array_elements(&self, array: &FsmArray) -> Vec<FieldValue> {
        let preview = |value: &dyn ValuePreview| FieldValue::Reference {
            value_kind: value.value_kind(),
            preview: value.preview(self.names),
        };
        let vectors = array.vector4_values.iter();

        match array.var_type {
            VariableType::Float => array
                .float_values
                .iter()
                .map(|&value| FieldValue::Float { value })
                .collect(),
            VariableType::Int | VariableType::Enum => array
                .int_values
                .iter()
                .map(|&value| FieldValue::Integer { value })
                .collect(),
            VariableType::Bool => array
                .bool_values
                .iter()
                .map(|&value| FieldValue::Boolean { value })
                .collect(),
            VariableType::String => array
                .string_values
                .iter()
                .map(|value| FieldValue::String { value: value.clone() })
                .collect(),
            VariableType::Vector2 => vectors.map(|v| preview(&v.to_vector2())).collect(),
            VariableType::Vector3 => vectors.map(|v| preview(&v.to_vector3())).collect(),
            VariableType::Color => vectors.map(|v| preview(&v.to_color())).collect(),
            VariableType::Rect => vectors.map(|v| preview(&v.to_rect())).collect(),
            VariableType::Quaternion => vectors.map(|v| preview(&v.to_quaternion())).collect(),
            VariableType::GameObject | VariableType::Material | VariableType::Texture | VariableType::Object => {
                array.object_references.iter().map(|r| preview(r)).collect()
            }
            VariableType::Unknown | VariableType::Array => Vec::new(),
        }
    }
}

fn playmaker_class(class_name: &str) -> Field {
    Field::class(
        TypeReference::new(class_name, PLAYMAKER_NAMESPACE, PLAYMAKER_ASSEMBLY),
        true,
    )
}

/// A state machine variable that shows up under its own name.
trait NamedVariable {
    fn variable_name(&self) -> &str;
}

impl<T> NamedVariable for FsmVariable<T> {
    fn variable_name(&self) -> &str {
        &self.name
    }
}

impl NamedVariable for FsmEnum {
    fn variable_name(&self) -> &str {
        &self.name
    }
}

impl NamedVariable for FsmObject {
    fn variable_name(&self) -> &str {
        &self.name
    }
}

/// Class marker plus one field per variable; nothing for an empty list.
fn push_group<V: NamedVariable>(
    fields: &mut Vec<Field>,
    class_name: &str,
    vars: &[V],
    value: impl Fn(&V) -> FieldValue,
) {
    if vars.is_empty() {
        return;
    }
    fields.push(playmaker_class(class_name));
    for var in vars {
        fields.push(Field::data(var.variable_name(), value(var)));
    }
}

/// Build a document with default options.
pub fn build_document(fsm: &StateMachine, names: &dyn NameResolver) -> Document {
    DocumentBuilder::new(names).build(fsm)
}

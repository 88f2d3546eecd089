//! Engine value types and `PlayMaker` variable wrappers as they appear in
//! serialized state machines.

use super::types::VariableType;
use crate::assets::AssetReference;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Vector4 {
    pub fn to_vector2(self) -> Vector2 {
        Vector2 { x: self.x, y: self.y }
    }

    pub fn to_vector3(self) -> Vector3 {
        Vector3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    pub fn to_color(self) -> Color {
        Color {
            r: self.x,
            g: self.y,
            b: self.z,
            a: self.w,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.z,
            height: self.w,
        }
    }

    pub fn to_quaternion(self) -> Quaternion {
        Quaternion {
            x: self.x,
            y: self.y,
            z: self.z,
            w: self.w,
        }
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width:{}, height:{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A `PlayMaker` named variable: either a literal value or a reference to a
/// state machine variable by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmVariable<T> {
    pub use_variable: bool,
    pub name: String,
    pub value: T,
}

pub type FsmFloat = FsmVariable<f32>;
pub type FsmInt = FsmVariable<i32>;
pub type FsmBool = FsmVariable<bool>;
pub type FsmString = FsmVariable<String>;
pub type FsmVector2 = FsmVariable<Vector2>;
pub type FsmVector3 = FsmVariable<Vector3>;
pub type FsmColor = FsmVariable<Color>;
pub type FsmRect = FsmVariable<Rect>;
pub type FsmQuaternion = FsmVariable<Quaternion>;
pub type FsmGameObject = FsmVariable<AssetReference>;

/// Object-typed variable; also the storage for material and texture variables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmObject {
    pub use_variable: bool,
    pub name: String,
    pub type_name: String,
    pub value: AssetReference,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmEnum {
    pub use_variable: bool,
    pub name: String,
    pub enum_name: String,
    pub int_value: i32,
}

/// Either the owning game object or an explicit one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmOwnerDefault {
    pub owner_option: i32,
    pub game_object: FsmGameObject,
}

impl FsmOwnerDefault {
    pub fn uses_owner(&self) -> bool {
        self.owner_option == 0
    }
}

/// A variable of any kind, with one storage slot per kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmVar {
    pub variable_name: String,
    pub object_type: String,
    pub use_variable: bool,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub float_value: f32,
    pub int_value: i32,
    pub bool_value: bool,
    pub string_value: String,
    pub vector4_value: Vector4,
    pub object_reference: AssetReference,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmEventTarget {
    pub target: i32,
    pub exclude_self: FsmBool,
    pub game_object: FsmOwnerDefault,
    pub fsm_name: FsmString,
    pub send_to_children: FsmBool,
    pub fsm_component: AssetReference,
}

impl FsmEventTarget {
    pub fn target_name(&self) -> &'static str {
        match self.target {
            0 => "Self",
            1 => "GameObject",
            2 => "GameObjectFSM",
            3 => "FSMComponent",
            4 => "BroadcastAll",
            5 => "HostFSM",
            6 => "SubFSMs",
            _ => "Unknown",
        }
    }
}

/// Typed array variable. Only the collection matching `var_type` is populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmArray {
    pub use_variable: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub object_type_name: String,
    pub float_values: Vec<f32>,
    pub int_values: Vec<i32>,
    pub bool_values: Vec<bool>,
    pub string_values: Vec<String>,
    pub vector4_values: Vec<Vector4>,
    pub object_references: Vec<AssetReference>,
}

impl FsmArray {
    /// Declared element type name, `Unsupported` for kinds arrays cannot hold.
    pub fn element_type_name(&self) -> &str {
        match self.var_type {
            VariableType::Object | VariableType::Enum => &self.object_type_name,
            other => other.element_type_name().unwrap_or("Unsupported"),
        }
    }

    /// Number of elements in the collection selected by `var_type`.
    pub fn len(&self) -> usize {
        match self.var_type {
            VariableType::Float => self.float_values.len(),
            VariableType::Int | VariableType::Enum => self.int_values.len(),
            VariableType::Bool => self.bool_values.len(),
            VariableType::String => self.string_values.len(),
            VariableType::Vector2
            | VariableType::Vector3
            | VariableType::Color
            | VariableType::Rect
            | VariableType::Quaternion => self.vector4_values.len(),
            VariableType::GameObject
            | VariableType::Material
            | VariableType::Texture
            | VariableType::Object => self.object_references.len(),
            VariableType::Unknown | VariableType::Array => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A method invocation parameter (`SendMessage` style).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionCall {
    #[serde(rename = "FunctionName")]
    pub function_name: String,
    #[serde(rename = "parameterType")]
    pub parameter_type: String,
    #[serde(rename = "BoolParameter")]
    pub bool_parameter: FsmBool,
    #[serde(rename = "FloatParameter")]
    pub float_parameter: FsmFloat,
    #[serde(rename = "IntParameter")]
    pub int_parameter: FsmInt,
    #[serde(rename = "StringParameter")]
    pub string_parameter: FsmString,
    #[serde(rename = "GameObjectParameter")]
    pub game_object_parameter: FsmGameObject,
    #[serde(rename = "ObjectParameter")]
    pub object_parameter: FsmObject,
}

/// Reflection target for get/set property actions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmProperty {
    #[serde(rename = "TargetObject")]
    pub target_object: FsmObject,
    #[serde(rename = "TargetTypeName")]
    pub target_type_name: String,
    #[serde(rename = "PropertyName")]
    pub property_name: String,
    #[serde(rename = "setProperty")]
    pub set_property: bool,
}

/// Named variable targeted by a template override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideTarget {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmVarOverride {
    pub variable: OverrideTarget,
    pub fsm_var: FsmVar,
    pub is_edited: bool,
}

/// Reference to an FSM template plus per-variable overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmTemplateControl {
    pub fsm_template: AssetReference,
    pub fsm_var_overrides: Vec<FsmVarOverride>,
}

//! Parameter type tags and variable kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of one serialized action parameter.
///
/// Tags are stored as plain integers in the action data; values outside this
/// table are kept as raw numbers by the decoder and reported as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ParamDataType {
    Integer = 0,
    Boolean = 1,
    Float = 2,
    String = 3,
    Color = 4,
    ObjectReference = 5,
    LayerMask = 6,
    Enum = 7,
    Vector2 = 8,
    Vector3 = 9,
    Vector4 = 10,
    Rect = 11,
    Array = 12,
    Character = 13,
    AnimationCurve = 14,
    FsmFloat = 15,
    FsmInt = 16,
    FsmBool = 17,
    FsmString = 18,
    FsmGameObject = 19,
    FsmOwnerDefault = 20,
    FunctionCall = 21,
    FsmAnimationCurve = 22,
    FsmEvent = 23,
    FsmObject = 24,
    FsmColor = 25,
    Unsupported = 26,
    GameObject = 27,
    FsmVector3 = 28,
    LayoutOption = 29,
    FsmRect = 30,
    FsmEventTarget = 31,
    FsmMaterial = 32,
    FsmTexture = 33,
    Quaternion = 34,
    FsmQuaternion = 35,
    FsmProperty = 36,
    FsmVector2 = 37,
    FsmTemplateControl = 38,
    FsmVar = 39,
    CustomClass = 40,
    FsmArray = 41,
    FsmEnum = 42,
}

const PARAM_DATA_TYPES: [ParamDataType; 43] = [
    ParamDataType::Integer,
    ParamDataType::Boolean,
    ParamDataType::Float,
    ParamDataType::String,
    ParamDataType::Color,
    ParamDataType::ObjectReference,
    ParamDataType::LayerMask,
    ParamDataType::Enum,
    ParamDataType::Vector2,
    ParamDataType::Vector3,
    ParamDataType::Vector4,
    ParamDataType::Rect,
    ParamDataType::Array,
    ParamDataType::Character,
    ParamDataType::AnimationCurve,
    ParamDataType::FsmFloat,
    ParamDataType::FsmInt,
    ParamDataType::FsmBool,
    ParamDataType::FsmString,
    ParamDataType::FsmGameObject,
    ParamDataType::FsmOwnerDefault,
    ParamDataType::FunctionCall,
    ParamDataType::FsmAnimationCurve,
    ParamDataType::FsmEvent,
    ParamDataType::FsmObject,
    ParamDataType::FsmColor,
    ParamDataType::Unsupported,
    ParamDataType::GameObject,
    ParamDataType::FsmVector3,
    ParamDataType::LayoutOption,
    ParamDataType::FsmRect,
    ParamDataType::FsmEventTarget,
    ParamDataType::FsmMaterial,
    ParamDataType::FsmTexture,
    ParamDataType::Quaternion,
    ParamDataType::FsmQuaternion,
    ParamDataType::FsmProperty,
    ParamDataType::FsmVector2,
    ParamDataType::FsmTemplateControl,
    ParamDataType::FsmVar,
    ParamDataType::CustomClass,
    ParamDataType::FsmArray,
    ParamDataType::FsmEnum,
];

impl ParamDataType {
    pub fn from_i32(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| PARAM_DATA_TYPES.get(i))
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamDataType::Integer => "Integer",
            ParamDataType::Boolean => "Boolean",
            ParamDataType::Float => "Float",
            ParamDataType::String => "String",
            ParamDataType::Color => "Color",
            ParamDataType::ObjectReference => "ObjectReference",
            ParamDataType::LayerMask => "LayerMask",
            ParamDataType::Enum => "Enum",
            ParamDataType::Vector2 => "Vector2",
            ParamDataType::Vector3 => "Vector3",
            ParamDataType::Vector4 => "Vector4",
            ParamDataType::Rect => "Rect",
            ParamDataType::Array => "Array",
            ParamDataType::Character => "Character",
            ParamDataType::AnimationCurve => "AnimationCurve",
            ParamDataType::FsmFloat => "FsmFloat",
            ParamDataType::FsmInt => "FsmInt",
            ParamDataType::FsmBool => "FsmBool",
            ParamDataType::FsmString => "FsmString",
            ParamDataType::FsmGameObject => "FsmGameObject",
            ParamDataType::FsmOwnerDefault => "FsmOwnerDefault",
            ParamDataType::FunctionCall => "FunctionCall",
            ParamDataType::FsmAnimationCurve => "FsmAnimationCurve",
            ParamDataType::FsmEvent => "FsmEvent",
            ParamDataType::FsmObject => "FsmObject",
            ParamDataType::FsmColor => "FsmColor",
            ParamDataType::Unsupported => "Unsupported",
            ParamDataType::GameObject => "GameObject",
            ParamDataType::FsmVector3 => "FsmVector3",
            ParamDataType::LayoutOption => "LayoutOption",
            ParamDataType::FsmRect => "FsmRect",
            ParamDataType::FsmEventTarget => "FsmEventTarget",
            ParamDataType::FsmMaterial => "FsmMaterial",
            ParamDataType::FsmTexture => "FsmTexture",
            ParamDataType::Quaternion => "Quaternion",
            ParamDataType::FsmQuaternion => "FsmQuaternion",
            ParamDataType::FsmProperty => "FsmProperty",
            ParamDataType::FsmVector2 => "FsmVector2",
            ParamDataType::FsmTemplateControl => "FsmTemplateControl",
            ParamDataType::FsmVar => "FsmVar",
            ParamDataType::CustomClass => "CustomClass",
            ParamDataType::FsmArray => "FsmArray",
            ParamDataType::FsmEnum => "FsmEnum",
        }
    }

    /// Wrapper tags whose generation-1 encoding is an inline payload followed
    /// by a use-variable flag and an override name.
    pub fn is_inline_wrapper(self) -> bool {
        matches!(
            self,
            ParamDataType::FsmInt
                | ParamDataType::FsmBool
                | ParamDataType::FsmFloat
                | ParamDataType::FsmVector2
                | ParamDataType::FsmVector3
                | ParamDataType::FsmQuaternion
                | ParamDataType::FsmColor
                | ParamDataType::FsmRect
        )
    }

    /// Whether decoding this tag reads from the raw byte buffer under `generation`.
    pub fn reads_byte_data(self, generation: i32) -> bool {
        match self {
            ParamDataType::Integer
            | ParamDataType::Enum
            | ParamDataType::Boolean
            | ParamDataType::Float
            | ParamDataType::String
            | ParamDataType::Vector2
            | ParamDataType::Vector3
            | ParamDataType::Vector4
            | ParamDataType::Quaternion
            | ParamDataType::Color
            | ParamDataType::Rect => true,
            ParamDataType::FsmEvent => generation == 1,
            tag => generation == 1 && tag.is_inline_wrapper(),
        }
    }
}

impl fmt::Display for ParamDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a raw tag, falling back to the number itself.
pub fn param_type_name(raw: i32) -> String {
    ParamDataType::from_i32(raw).map_or_else(|| raw.to_string(), |t| t.name().to_string())
}

/// Kind of a state machine variable (and of array elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum VariableType {
    #[default]
    Unknown,
    Float,
    Int,
    Bool,
    GameObject,
    String,
    Vector2,
    Vector3,
    Color,
    Rect,
    Material,
    Texture,
    Quaternion,
    Object,
    Array,
    Enum,
}

impl From<i32> for VariableType {
    fn from(value: i32) -> Self {
        match value {
            0 => VariableType::Float,
            1 => VariableType::Int,
            2 => VariableType::Bool,
            3 => VariableType::GameObject,
            4 => VariableType::String,
            5 => VariableType::Vector2,
            6 => VariableType::Vector3,
            7 => VariableType::Color,
            8 => VariableType::Rect,
            9 => VariableType::Material,
            10 => VariableType::Texture,
            11 => VariableType::Quaternion,
            12 => VariableType::Object,
            13 => VariableType::Array,
            14 => VariableType::Enum,
            _ => VariableType::Unknown,
        }
    }
}

impl From<VariableType> for i32 {
    fn from(value: VariableType) -> Self {
        match value {
            VariableType::Unknown => -1,
            VariableType::Float => 0,
            VariableType::Int => 1,
            VariableType::Bool => 2,
            VariableType::GameObject => 3,
            VariableType::String => 4,
            VariableType::Vector2 => 5,
            VariableType::Vector3 => 6,
            VariableType::Color => 7,
            VariableType::Rect => 8,
            VariableType::Material => 9,
            VariableType::Texture => 10,
            VariableType::Quaternion => 11,
            VariableType::Object => 12,
            VariableType::Array => 13,
            VariableType::Enum => 14,
        }
    }
}

impl VariableType {
    /// Element type name used when summarizing an array of this kind.
    /// Object and enum arrays are named by their declared object type instead.
    pub fn element_type_name(self) -> Option<&'static str> {
        match self {
            VariableType::Float => Some("float"),
            VariableType::Int => Some("int"),
            VariableType::Bool => Some("bool"),
            VariableType::GameObject => Some("GameObject"),
            VariableType::String => Some("string"),
            VariableType::Vector2 => Some("Vector2"),
            VariableType::Vector3 => Some("Vector3"),
            VariableType::Color => Some("Color"),
            VariableType::Rect => Some("Rect"),
            VariableType::Material => Some("Material"),
            VariableType::Texture => Some("Texture"),
            VariableType::Quaternion => Some("Quaternion"),
            VariableType::Unknown | VariableType::Object | VariableType::Array | VariableType::Enum => None,
        }
    }
}

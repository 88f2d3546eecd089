//! Action parameter decoding
//!
//! Every parameter of an action is decoded independently. Tags holding plain
//! values read a fixed layout from the parameter's slice of `byte_data`;
//! variable wrappers do the same under generation 1 and come from the typed
//! side-tables from generation 2 on. A parameter that cannot be decoded turns
//! into [`DecodedValue::Fallback`] and decoding carries on with the next one.

use super::action_data::{FsmActionData, side_table};
use super::types::{ParamDataType, param_type_name};
use super::values::{
    Color, FsmArray, FsmEventTarget, FsmObject, FsmOwnerDefault, FsmProperty, FsmTemplateControl, FsmVar,
    FsmVariable, FunctionCall, Quaternion, Rect, Vector2, Vector3, Vector4,
};
use crate::assets::AssetReference;
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt;

/// Field name used when a parameter index has no entry in the name table.
pub const INVALID_FIELD_NAME: &str = "invalid";
const OUT_OF_BOUNDS_FIELD: &str = "[out of bounds field]";

/// A decoded parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DecodedValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Color(Color),
    Rect(Rect),
    Quaternion(Quaternion),
    /// Named variable wrapper: a literal value or a reference to an FSM variable.
    Variable {
        name: String,
        use_variable: bool,
        value: Box<DecodedValue>,
    },
    Enum {
        enum_name: String,
        value: i32,
    },
    Event(String),
    Reference(AssetReference),
    Object {
        type_name: String,
        reference: AssetReference,
    },
    OwnerDefault(FsmOwnerDefault),
    Var(FsmVar),
    EventTarget(FsmEventTarget),
    FsmArray(FsmArray),
    FunctionCall(FunctionCall),
    Property(FsmProperty),
    TemplateControl(FsmTemplateControl),
    Array {
        type_name: String,
        elements: Vec<DecodedValue>,
    },
    /// Placeholder for a parameter that could not be decoded.
    Fallback {
        tag: String,
        message: String,
    },
}

impl DecodedValue {
    fn not_implemented(tag: i32) -> Self {
        let tag = param_type_name(tag);
        DecodedValue::Fallback {
            message: format!("[{tag} not implemented]"),
            tag,
        }
    }

    fn invalid(tag: i32) -> Self {
        let tag = param_type_name(tag);
        DecodedValue::Fallback {
            message: format!("[invalid {tag} variable]"),
            tag,
        }
    }

    fn wrap<T>(variable: &FsmVariable<T>, value: DecodedValue) -> Self {
        DecodedValue::Variable {
            name: variable.name.clone(),
            use_variable: variable.use_variable,
            value: Box::new(value),
        }
    }

    fn object(object: &FsmObject) -> Self {
        DecodedValue::Variable {
            name: object.name.clone(),
            use_variable: object.use_variable,
            value: Box::new(DecodedValue::Object {
                type_name: object.type_name.clone(),
                reference: object.value.clone(),
            }),
        }
    }

    /// Override name of a variable wrapper, empty for everything else.
    pub fn variable_name(&self) -> &str {
        match self {
            DecodedValue::Variable { name, .. } => name,
            _ => "",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DecodedValue::Fallback { .. })
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Int(v) => write!(f, "{v}"),
            DecodedValue::Float(v) => write!(f, "{v}"),
            DecodedValue::Bool(v) => write!(f, "{v}"),
            DecodedValue::String(v) | DecodedValue::Event(v) => write!(f, "{v}"),
            DecodedValue::Vector2(v) => write!(f, "{v}"),
            DecodedValue::Vector3(v) => write!(f, "{v}"),
            DecodedValue::Vector4(v) => write!(f, "{v}"),
            DecodedValue::Color(v) => write!(f, "{v}"),
            DecodedValue::Rect(v) => write!(f, "{v}"),
            DecodedValue::Quaternion(v) => write!(f, "{v}"),
            DecodedValue::Variable {
                name,
                use_variable: true,
                ..
            } => write!(f, "{name}"),
            DecodedValue::Variable { value, .. } => write!(f, "{value}"),
            DecodedValue::Enum { enum_name, value } => write!(f, "{}({value})", trim_class_name(enum_name)),
            DecodedValue::Reference(r) | DecodedValue::Object { reference: r, .. } => write!(f, "{r}"),
            DecodedValue::OwnerDefault(_) => write!(f, "FsmOwnerDefault"),
            DecodedValue::Var(v) => write!(f, "FsmVar({})", v.variable_name),
            DecodedValue::EventTarget(t) => write!(f, "{}", t.target_name()),
            DecodedValue::FsmArray(a) => write!(f, "{}[{}]", a.element_type_name(), a.len()),
            DecodedValue::FunctionCall(c) => write!(f, "{}()", c.function_name),
            DecodedValue::Property(p) => write!(f, "{}", p.property_name),
            DecodedValue::TemplateControl(t) => write!(f, "{}", t.fsm_template),
            DecodedValue::Array { type_name, elements } => write!(f, "{type_name}[{}]", elements.len()),
            DecodedValue::Fallback { message, .. } => write!(f, "{message}"),
        }
    }
}

/// One decoded field, in declaration order. Array elements follow their
/// parent as separate entries named `parent[index]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedParameter {
    pub name: String,
    /// Raw type tag.
    pub tag: i32,
    pub value: DecodedValue,
    pub in_array: bool,
    /// Array nesting level, 0 for the action's own parameters.
    pub depth: u8,
    /// Bytes consumed from the raw buffer.
    pub bytes_read: usize,
}

/// Reads inside one parameter's declared slice of the byte buffer.
struct ParamReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParamReader<'a> {
    fn new(byte_data: &'a [u8], offset: i32, declared: i32) -> Result<Self> {
        let (Ok(start), Ok(len)) = (usize::try_from(offset), usize::try_from(declared)) else {
            return Err(Error::ParamOutOfBounds {
                start: 0,
                end: 0,
                len: byte_data.len(),
            });
        };
        let end = start.saturating_add(len);
        let data = byte_data.get(start..end).ok_or(Error::ParamOutOfBounds {
            start,
            end,
            len: byte_data.len(),
        })?;
        Ok(Self { data, pos: 0 })
    }

    fn declared(&self) -> usize {
        self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or(Error::ParamOverrun {
                offset: self.pos,
                len,
                declared: self.data.len(),
            })?;
        self.pos += len;
        Ok(bytes)
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    fn f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    fn bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    fn utf8(&mut self, len: usize) -> Result<String> {
        Ok(String::from_utf8(self.take(len)?.to_vec())?)
    }

    fn rest_utf8(&mut self) -> Result<String> {
        let len = override_name_len(self.declared(), self.pos)?;
        self.utf8(len)
    }

    fn vector2(&mut self) -> Result<Vector2> {
        Ok(Vector2 {
            x: self.f32()?,
            y: self.f32()?,
        })
    }

    fn vector3(&mut self) -> Result<Vector3> {
        Ok(Vector3 {
            x: self.f32()?,
            y: self.f32()?,
            z: self.f32()?,
        })
    }

    fn vector4(&mut self) -> Result<Vector4> {
        Ok(Vector4 {
            x: self.f32()?,
            y: self.f32()?,
            z: self.f32()?,
            w: self.f32()?,
        })
    }

    fn quaternion(&mut self) -> Result<Quaternion> {
        Ok(self.vector4()?.to_quaternion())
    }

    fn color(&mut self) -> Result<Color> {
        Ok(self.vector4()?.to_color())
    }

    fn rect(&mut self) -> Result<Rect> {
        Ok(self.vector4()?.to_rect())
    }
}

/// Length of the generation-1 override name that fills the rest of a
/// wrapper's declared range.
fn override_name_len(declared: usize, consumed: usize) -> Result<usize> {
    declared
        .checked_sub(consumed)
        .ok_or(Error::NegativeNameLength { declared, consumed })
}

/// Decodes the parameters of actions in one [`FsmActionData`].
pub struct ActionDecoder<'a> {
    data: &'a FsmActionData,
    generation: i32,
}

impl<'a> ActionDecoder<'a> {
    /// `generation` is the state machine's data version.
    pub fn new(data: &'a FsmActionData, generation: i32) -> Self {
        Self { data, generation }
    }

    /// Decode every parameter of the action at `action_index`.
    ///
    /// Only an out-of-range action index or a broken start index table is an
    /// error; individual parameters degrade to fallback values.
    pub fn decode_action(&self, action_index: usize) -> Result<Vec<DecodedParameter>> {
        let range = self.data.action_range(action_index)?;
        let mut params = Vec::with_capacity(range.len());

        let mut idx = range.start;
        while idx < range.end {
            let Some(name) = self.data.param_name.get(idx) else {
                tracing::debug!("Parameter {} has no name entry", idx);
                params.push(DecodedParameter {
                    name: INVALID_FIELD_NAME.to_string(),
                    tag: self.raw_tag(idx),
                    value: DecodedValue::Fallback {
                        tag: param_type_name(self.raw_tag(idx)),
                        message: OUT_OF_BOUNDS_FIELD.to_string(),
                    },
                    in_array: false,
                    depth: 0,
                    bytes_read: 0,
                });
                idx += 1;
                continue;
            };

            let tag = self.raw_tag(idx);
            let start = idx;
            let (value, bytes_read) = self.decode_at(&mut idx, range.end);

            params.push(DecodedParameter {
                name: name.clone(),
                tag,
                value,
                in_array: false,
                depth: 0,
                bytes_read,
            });
            self.push_elements(&mut params, start, 1);

            idx += 1;
        }

        Ok(params)
    }

    /// Append the elements of the array parameter last pushed (raw index
    /// `parent`) as `name[i]` entries, nested arrays included. Returns the
    /// number of parameter slots the elements occupy.
    fn push_elements(&self, params: &mut Vec<DecodedParameter>, parent: usize, depth: u8) -> usize {
        let Some(last) = params.last() else {
            return 0;
        };
        let DecodedValue::Array { elements, .. } = &last.value else {
            return 0;
        };
        let elements = elements.clone();
        let name = last.name.clone();

        let mut slot = parent + 1;
        for (i, element) in elements.into_iter().enumerate() {
            params.push(DecodedParameter {
                name: format!("{name}[{i}]"),
                tag: self.raw_tag(slot),
                value: element,
                in_array: true,
                depth,
                bytes_read: 0,
            });
            slot += 1 + self.push_elements(params, slot, depth.saturating_add(1));
        }
        slot - parent - 1
    }

    fn raw_tag(&self, idx: usize) -> i32 {
        self.data.param_data_type.get(idx).copied().unwrap_or(-1)
    }

    /// Decode the parameter at `*idx`, converting failures to a fallback.
    /// Arrays advance `*idx` past their elements.
    fn decode_at(&self, idx: &mut usize, end: usize) -> (DecodedValue, usize) {
        let tag = self.raw_tag(*idx);
        match self.try_decode(idx, end) {
            Ok(decoded) => decoded,
            Err(Error::UnsupportedParamType(_)) => (DecodedValue::not_implemented(tag), 0),
            Err(e) => {
                tracing::debug!("Parameter {} ({}) failed to decode: {}", idx, param_type_name(tag), e);
                (DecodedValue::invalid(tag), 0)
            }
        }
    }

    fn try_decode(&self, idx: &mut usize, end: usize) -> Result<(DecodedValue, usize)> {
        let raw = *self.data.param_data_type.get(*idx).ok_or(Error::ParamIndex(*idx))?;
        let pos = *self.data.param_data_pos.get(*idx).ok_or(Error::ParamIndex(*idx))?;
        let tag = ParamDataType::from_i32(raw).ok_or_else(|| Error::UnsupportedParamType(raw.to_string()))?;

        if tag.reads_byte_data(self.generation) {
            let declared = *self.data.param_byte_data_size.get(*idx).ok_or(Error::ParamIndex(*idx))?;
            let mut reader = ParamReader::new(&self.data.byte_data, pos, declared)?;
            let value = self.decode_inline(tag, &mut reader)?;
            return Ok((value, reader.pos));
        }

        let value = match tag {
            ParamDataType::Array => self.decode_array(idx, pos, end)?,
            _ => self.decode_side_table(tag, pos)?,
        };
        Ok((value, 0))
    }

    fn decode_inline(&self, tag: ParamDataType, r: &mut ParamReader<'_>) -> Result<DecodedValue> {
        let value = match tag {
            ParamDataType::Integer | ParamDataType::Enum => DecodedValue::Int(r.i32()?),
            ParamDataType::Boolean => DecodedValue::Bool(r.bool()?),
            ParamDataType::Float => DecodedValue::Float(r.f32()?),
            ParamDataType::String => {
                let len = r.declared();
                DecodedValue::String(r.utf8(len)?)
            }
            ParamDataType::Vector2 => DecodedValue::Vector2(r.vector2()?),
            ParamDataType::Vector3 => DecodedValue::Vector3(r.vector3()?),
            ParamDataType::Vector4 => DecodedValue::Vector4(r.vector4()?),
            ParamDataType::Quaternion => DecodedValue::Quaternion(r.quaternion()?),
            ParamDataType::Color => DecodedValue::Color(r.color()?),
            ParamDataType::Rect => DecodedValue::Rect(r.rect()?),
            ParamDataType::FsmEvent => {
                let len = r.declared();
                DecodedValue::Event(r.utf8(len)?)
            }
            wrapper => {
                let value = match wrapper {
                    ParamDataType::FsmInt => DecodedValue::Int(r.i32()?),
                    ParamDataType::FsmBool => DecodedValue::Bool(r.bool()?),
                    ParamDataType::FsmFloat => DecodedValue::Float(r.f32()?),
                    ParamDataType::FsmVector2 => DecodedValue::Vector2(r.vector2()?),
                    ParamDataType::FsmVector3 => DecodedValue::Vector3(r.vector3()?),
                    ParamDataType::FsmQuaternion => DecodedValue::Quaternion(r.quaternion()?),
                    ParamDataType::FsmColor => DecodedValue::Color(r.color()?),
                    ParamDataType::FsmRect => DecodedValue::Rect(r.rect()?),
                    other => return Err(Error::UnsupportedParamType(other.to_string())),
                };
                let use_variable = r.bool()?;
                let name = r.rest_utf8()?;
                DecodedValue::Variable {
                    name,
                    use_variable,
                    value: Box::new(value),
                }
            }
        };
        Ok(value)
    }

    fn decode_side_table(&self, tag: ParamDataType, pos: i32) -> Result<DecodedValue> {
        let d = self.data;
        let side_tables = self.generation > 1;

        let value = match tag {
            ParamDataType::FsmBool if side_tables => {
                let v = side_table("fsmBoolParams", &d.fsm_bool_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Bool(v.value))
            }
            ParamDataType::FsmInt if side_tables => {
                let v = side_table("fsmIntParams", &d.fsm_int_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Int(v.value))
            }
            ParamDataType::FsmFloat if side_tables => {
                let v = side_table("fsmFloatParams", &d.fsm_float_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Float(v.value))
            }
            ParamDataType::FsmVector2 if side_tables => {
                let v = side_table("fsmVector2Params", &d.fsm_vector2_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Vector2(v.value))
            }
            ParamDataType::FsmVector3 if side_tables => {
                let v = side_table("fsmVector3Params", &d.fsm_vector3_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Vector3(v.value))
            }
            ParamDataType::FsmQuaternion if side_tables => {
                let v = side_table("fsmQuaternionParams", &d.fsm_quaternion_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Quaternion(v.value))
            }
            ParamDataType::FsmColor if side_tables => {
                let v = side_table("fsmColorParams", &d.fsm_color_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Color(v.value))
            }
            ParamDataType::FsmRect if side_tables => {
                let v = side_table("fsmRectParams", &d.fsm_rect_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Rect(v.value))
            }
            ParamDataType::FsmEnum => {
                let v = side_table("fsmEnumParams", &d.fsm_enum_params, pos)?;
                DecodedValue::Variable {
                    name: v.name.clone(),
                    use_variable: v.use_variable,
                    value: Box::new(DecodedValue::Enum {
                        enum_name: v.enum_name.clone(),
                        value: v.int_value,
                    }),
                }
            }
            ParamDataType::FsmGameObject => {
                let v = side_table("fsmGameObjectParams", &d.fsm_game_object_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::Reference(v.value.clone()))
            }
            ParamDataType::FsmOwnerDefault => {
                DecodedValue::OwnerDefault(side_table("fsmOwnerDefaultParams", &d.fsm_owner_default_params, pos)?.clone())
            }
            ParamDataType::FsmObject | ParamDataType::FsmMaterial | ParamDataType::FsmTexture => {
                DecodedValue::object(side_table("fsmObjectParams", &d.fsm_object_params, pos)?)
            }
            ParamDataType::FsmVar => DecodedValue::Var(side_table("fsmVarParams", &d.fsm_var_params, pos)?.clone()),
            ParamDataType::FsmString => {
                let v = side_table("fsmStringParams", &d.fsm_string_params, pos)?;
                DecodedValue::wrap(v, DecodedValue::String(v.value.clone()))
            }
            ParamDataType::FsmEvent => DecodedValue::Event(side_table("stringParams", &d.string_params, pos)?.clone()),
            ParamDataType::FsmEventTarget => {
                DecodedValue::EventTarget(side_table("fsmEventTargetParams", &d.fsm_event_target_params, pos)?.clone())
            }
            ParamDataType::FsmArray => {
                DecodedValue::FsmArray(side_table("fsmArrayParams", &d.fsm_array_params, pos)?.clone())
            }
            ParamDataType::ObjectReference => {
                DecodedValue::Reference(side_table("unityObjectParams", &d.unity_object_params, pos)?.clone())
            }
            ParamDataType::FunctionCall => {
                DecodedValue::FunctionCall(side_table("functionCallParams", &d.function_call_params, pos)?.clone())
            }
            ParamDataType::FsmProperty => {
                DecodedValue::Property(side_table("fsmPropertyParams", &d.fsm_property_params, pos)?.clone())
            }
            ParamDataType::FsmTemplateControl => DecodedValue::TemplateControl(
                side_table("fsmTemplateControlParams", &d.fsm_template_control_params, pos)?.clone(),
            ),
            other => return Err(Error::UnsupportedParamType(other.to_string())),
        };
        Ok(value)
    }

    /// Elements of an array are the parameters that directly follow it, up
    /// to the end of the current action.
    fn decode_array(&self, idx: &mut usize, pos: i32, end: usize) -> Result<DecodedValue> {
        let type_name = side_table("arrayParamTypes", &self.data.array_param_types, pos)?;
        let size = *side_table("arrayParamSizes", &self.data.array_param_sizes, pos)?;
        let size = usize::try_from(size).map_err(|_| Error::InvalidCount(i64::from(size)))?;

        let remaining = end.min(self.data.param_count()).saturating_sub(*idx + 1);
        if size > remaining {
            return Err(Error::InvalidCount(size as i64));
        }

        let mut elements = Vec::with_capacity(size);
        for _ in 0..size {
            *idx += 1;
            elements.push(self.decode_at(idx, end).0);
        }

        Ok(DecodedValue::Array {
            type_name: trim_class_name(type_name).to_string(),
            elements,
        })
    }
}

/// Decode the parameters of one action; see [`ActionDecoder::decode_action`].
pub fn decode_action(data: &FsmActionData, action_index: usize, generation: i32) -> Result<Vec<DecodedParameter>> {
    ActionDecoder::new(data, generation).decode_action(action_index)
}

/// `Namespace.ClassName` -> `ClassName`.
pub fn trim_class_name(full_name: &str) -> &str {
    full_name.rsplit_once('.').map_or(full_name, |(_, class)| class)
}

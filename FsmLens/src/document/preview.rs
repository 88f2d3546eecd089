//! One-line previews of structured values

use super::model::ValueKind;
use crate::assets::AssetReference;
use crate::naming::NameResolver;
use crate::playmaker::{
    Color, FsmArray, FsmEventTarget, FsmObject, FsmOwnerDefault, FsmProperty, FsmTemplateControl, FsmVar,
    FunctionCall, Quaternion, Rect, Vector2, Vector3, Vector4, VariableType, trim_class_name,
};

/// A value that can summarize itself for a field row. References inside the
/// value are named through `names`.
pub trait ValuePreview {
    fn value_kind(&self) -> ValueKind;
    fn preview(&self, names: &dyn NameResolver) -> String;
}

macro_rules! display_preview {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl ValuePreview for $ty {
                fn value_kind(&self) -> ValueKind {
                    $kind
                }

                fn preview(&self, _names: &dyn NameResolver) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_preview! {
    Vector2 => ValueKind::Vector,
    Vector3 => ValueKind::Vector,
    Vector4 => ValueKind::Vector,
    Quaternion => ValueKind::Vector,
    Color => ValueKind::Color,
    Rect => ValueKind::Rect,
}

impl ValuePreview for AssetReference {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Object
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        if self.is_null() {
            return "None".to_string();
        }
        let name = names.name_reference(self);
        self.display_with_name(name.as_deref().or_else(|| self.name()))
    }
}

impl ValuePreview for FsmObject {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Object
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        object_preview(&self.type_name, &self.value, names)
    }
}

/// `reference (TypeName)`, or just the reference when no type is declared.
pub(crate) fn object_preview(type_name: &str, reference: &AssetReference, names: &dyn NameResolver) -> String {
    let target = reference.preview(names);
    if type_name.is_empty() {
        target
    } else {
        format!("{target} ({})", trim_class_name(type_name))
    }
}

impl ValuePreview for FsmOwnerDefault {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Object
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        if self.uses_owner() {
            "Use Owner".to_string()
        } else if self.game_object.use_variable {
            self.game_object.name.clone()
        } else {
            self.game_object.value.preview(names)
        }
    }
}

impl ValuePreview for FsmVar {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Variable
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        if self.use_variable {
            return self.variable_name.clone();
        }
        match self.var_type {
            VariableType::Float => self.float_value.to_string(),
            VariableType::Int | VariableType::Enum => self.int_value.to_string(),
            VariableType::Bool => self.bool_value.to_string(),
            VariableType::String => format!("\"{}\"", self.string_value),
            VariableType::Vector2 => self.vector4_value.to_vector2().to_string(),
            VariableType::Vector3 => self.vector4_value.to_vector3().to_string(),
            VariableType::Color => self.vector4_value.to_color().to_string(),
            VariableType::Rect => self.vector4_value.to_rect().to_string(),
            VariableType::Quaternion => self.vector4_value.to_quaternion().to_string(),
            VariableType::GameObject | VariableType::Material | VariableType::Texture | VariableType::Object => {
                object_preview(&self.object_type, &self.object_reference, names)
            }
            VariableType::Unknown | VariableType::Array => "None".to_string(),
        }
    }
}

impl ValuePreview for FsmEventTarget {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Event
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        match self.target {
            1 => format!("GameObject: {}", self.game_object.preview(names)),
            2 => format!("{} on {}", self.fsm_name.value, self.game_object.preview(names)),
            3 => format!("FSMComponent: {}", self.fsm_component.preview(names)),
            _ => self.target_name().to_string(),
        }
    }
}

impl ValuePreview for FsmArray {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Variable
    }

    fn preview(&self, _names: &dyn NameResolver) -> String {
        if self.use_variable {
            self.name.clone()
        } else {
            format!("{}[{}]", trim_class_name(self.element_type_name()), self.len())
        }
    }
}

impl ValuePreview for FunctionCall {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Call
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        let argument = match self.parameter_type.as_str() {
            "bool" => self.bool_parameter.value.to_string(),
            "float" => self.float_parameter.value.to_string(),
            "int" => self.int_parameter.value.to_string(),
            "string" => format!("\"{}\"", self.string_parameter.value),
            "GameObject" => self.game_object_parameter.value.preview(names),
            "Object" => self.object_parameter.preview(names),
            _ => String::new(),
        };
        format!("{}({argument})", self.function_name)
    }
}

impl ValuePreview for FsmProperty {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Call
    }

    fn preview(&self, _names: &dyn NameResolver) -> String {
        let verb = if self.set_property { "set" } else { "get" };
        format!(
            "{verb} {}.{}",
            trim_class_name(&self.target_type_name),
            self.property_name
        )
    }
}

impl ValuePreview for FsmTemplateControl {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Object
    }

    fn preview(&self, names: &dyn NameResolver) -> String {
        let template = self.fsm_template.preview(names);
        match self.fsm_var_overrides.len() {
            0 => template,
            n => format!("{template} ({n} overrides)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NoNames;
    use crate::playmaker::FsmVariable;

    #[test]
    fn test_reference_preview() {
        assert_eq!(AssetReference::new(0, 0).preview(&NoNames), "None");
        assert_eq!(AssetReference::new(1, 5).preview(&NoNames), "PPtr(1,5)");
        let named = AssetReference::with_name(0, 5, Some("Lamp".to_string()));
        assert_eq!(named.preview(&NoNames), "Lamp/PPtr(0,5)");
    }

    /// Answers with a fixed name and leaves the reference untouched.
    struct Uncached;

    impl NameResolver for Uncached {
        fn name_reference(&self, _reference: &AssetReference) -> Option<String> {
            Some("Hero".to_string())
        }
    }

    #[test]
    fn test_reference_preview_uses_resolved_name() {
        let reference = AssetReference::new(0, 5);
        assert_eq!(reference.preview(&Uncached), "Hero/PPtr(0,5)");
        assert!(!reference.is_name_resolved());
    }

    #[test]
    fn test_object_preview_trims_type() {
        let object = FsmObject {
            type_name: "UnityEngine.AudioClip".to_string(),
            value: AssetReference::new(0, 9),
            ..FsmObject::default()
        };
        assert_eq!(object.preview(&NoNames), "PPtr(0,9) (AudioClip)");
    }

    #[test]
    fn test_owner_default_preview() {
        assert_eq!(FsmOwnerDefault::default().preview(&NoNames), "Use Owner");
        let specified = FsmOwnerDefault {
            owner_option: 1,
            game_object: FsmVariable {
                use_variable: true,
                name: "target".to_string(),
                value: AssetReference::default(),
            },
        };
        assert_eq!(specified.preview(&NoNames), "target");
    }

    #[test]
    fn test_function_call_preview() {
        let call = FunctionCall {
            function_name: "SetSpeed".to_string(),
            parameter_type: "float".to_string(),
            float_parameter: FsmVariable {
                value: 2.0,
                ..FsmVariable::default()
            },
            ..FunctionCall::default()
        };
        assert_eq!(call.preview(&NoNames), "SetSpeed(2)");
        assert_eq!(call.value_kind(), ValueKind::Call);
    }

    #[test]
    fn test_var_preview_by_type() {
        let var = FsmVar {
            var_type: VariableType::Vector2,
            vector4_value: Vector4 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                w: 4.0,
            },
            ..FsmVar::default()
        };
        assert_eq!(var.preview(&NoNames), "(1, 2)");
    }
}

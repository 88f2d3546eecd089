//! State machine definition as serialized by `PlayMaker`

use super::action_data::FsmActionData;
use super::values::{
    FsmArray, FsmBool, FsmColor, FsmEnum, FsmFloat, FsmGameObject, FsmInt, FsmObject, FsmQuaternion, FsmRect,
    FsmString, FsmVector2, FsmVector3, Rect,
};
use crate::assets::AssetReference;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateMachine {
    /// Parameter encoding generation.
    pub data_version: i32,
    pub name: String,
    pub start_state: String,
    pub states: Vec<FsmState>,
    pub events: Vec<FsmEvent>,
    pub global_transitions: Vec<FsmTransition>,
    pub variables: FsmVariables,
    /// Game object owning the `PlayMakerFSM` component.
    #[serde(alias = "m_GameObject")]
    pub game_object: AssetReference,
}

impl StateMachine {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// First state whose name matches the declared start state.
    pub fn find_start_state(&self) -> Option<usize> {
        self.states.iter().position(|s| s.name == self.start_state)
    }

    pub fn state(&self, name: &str) -> Option<&FsmState> {
        self.states.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmState {
    pub name: String,
    pub description: String,
    pub color_index: u8,
    pub position: Rect,
    pub is_breakpoint: bool,
    pub is_sequence: bool,
    pub transitions: Vec<FsmTransition>,
    pub action_data: FsmActionData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmTransition {
    #[serde(alias = "event")]
    pub fsm_event: FsmEvent,
    pub to_state: String,
    pub link_style: u8,
    pub link_constraint: u8,
    pub color_index: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmEvent {
    pub name: String,
    pub is_system_event: bool,
    pub is_global: bool,
}

/// Variables declared on the state machine, one list per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmVariables {
    pub float_variables: Vec<FsmFloat>,
    pub int_variables: Vec<FsmInt>,
    pub bool_variables: Vec<FsmBool>,
    pub string_variables: Vec<FsmString>,
    pub vector2_variables: Vec<FsmVector2>,
    pub vector3_variables: Vec<FsmVector3>,
    pub color_variables: Vec<FsmColor>,
    pub rect_variables: Vec<FsmRect>,
    pub quaternion_variables: Vec<FsmQuaternion>,
    pub game_object_variables: Vec<FsmGameObject>,
    pub object_variables: Vec<FsmObject>,
    pub material_variables: Vec<FsmObject>,
    pub texture_variables: Vec<FsmObject>,
    pub array_variables: Vec<FsmArray>,
    pub enum_variables: Vec<FsmEnum>,
}

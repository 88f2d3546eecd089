//! Serialized action list of one state
//!
//! Parameters are stored as parallel arrays indexed by a global parameter
//! index. `param_data_pos` is either a byte offset into `byte_data` (inline
//! tags) or a position into one of the typed side-tables.

use super::values::{
    FsmArray, FsmBool, FsmColor, FsmEnum, FsmEventTarget, FsmFloat, FsmGameObject, FsmInt, FsmObject,
    FsmOwnerDefault, FsmProperty, FsmQuaternion, FsmRect, FsmString, FsmTemplateControl, FsmVar,
    FsmVector2, FsmVector3, FunctionCall,
};
use crate::assets::AssetReference;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsmActionData {
    pub action_names: Vec<String>,
    pub custom_names: Vec<String>,
    pub action_enabled: Vec<u8>,
    pub action_is_open: Vec<u8>,
    pub action_start_index: Vec<i32>,
    pub action_hash_codes: Vec<i32>,

    pub unity_object_params: Vec<AssetReference>,
    pub fsm_game_object_params: Vec<FsmGameObject>,
    pub fsm_owner_default_params: Vec<FsmOwnerDefault>,
    pub function_call_params: Vec<FunctionCall>,
    pub fsm_template_control_params: Vec<FsmTemplateControl>,
    pub fsm_event_target_params: Vec<FsmEventTarget>,
    pub fsm_property_params: Vec<FsmProperty>,
    pub fsm_string_params: Vec<FsmString>,
    pub fsm_object_params: Vec<FsmObject>,
    pub fsm_var_params: Vec<FsmVar>,
    pub fsm_array_params: Vec<FsmArray>,
    pub fsm_enum_params: Vec<FsmEnum>,
    pub fsm_float_params: Vec<FsmFloat>,
    pub fsm_int_params: Vec<FsmInt>,
    pub fsm_bool_params: Vec<FsmBool>,
    pub fsm_vector2_params: Vec<FsmVector2>,
    pub fsm_vector3_params: Vec<FsmVector3>,
    pub fsm_color_params: Vec<FsmColor>,
    pub fsm_rect_params: Vec<FsmRect>,
    pub fsm_quaternion_params: Vec<FsmQuaternion>,
    pub string_params: Vec<String>,

    #[serde(with = "super::byte_data")]
    pub byte_data: Vec<u8>,
    pub array_param_sizes: Vec<i32>,
    pub array_param_types: Vec<String>,

    pub param_data_type: Vec<i32>,
    pub param_name: Vec<String>,
    pub param_data_pos: Vec<i32>,
    pub param_byte_data_size: Vec<i32>,
}

impl FsmActionData {
    pub fn action_count(&self) -> usize {
        self.action_names.len()
    }

    pub fn param_count(&self) -> usize {
        self.param_data_type.len()
    }

    /// Full type name of the action at `index`.
    pub fn action_name(&self, index: usize) -> Option<&str> {
        self.action_names.get(index).map(String::as_str)
    }

    /// Missing flags count as enabled.
    pub fn action_enabled(&self, index: usize) -> bool {
        self.action_enabled.get(index).is_none_or(|&flag| flag != 0)
    }

    /// Parameter index range of the action at `index`. The last action runs
    /// to the end of the parameter arrays.
    pub fn action_range(&self, index: usize) -> Result<Range<usize>> {
        let count = self.action_count();
        if index >= count {
            return Err(Error::InvalidFormat(format!(
                "action index {index} out of range ({count} actions)"
            )));
        }

        let start = self.start_index(index)?;
        let end = if index + 1 == count {
            self.param_count()
        } else {
            self.start_index(index + 1)?
        };

        // a decreasing start index yields an empty action rather than an error
        Ok(start..end.max(start))
    }

    fn start_index(&self, index: usize) -> Result<usize> {
        let raw = *self
            .action_start_index
            .get(index)
            .ok_or_else(|| Error::InvalidFormat(format!("missing start index for action {index}")))?;
        usize::try_from(raw).map_err(|_| Error::InvalidCount(i64::from(raw)))
    }
}

/// Look up a side-table entry by the (signed) position stored in `param_data_pos`.
pub(crate) fn side_table<'a, T>(table: &'static str, items: &'a [T], pos: i32) -> Result<&'a T> {
    usize::try_from(pos)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or(Error::SideTableIndex {
            table,
            index: i64::from(pos),
            len: items.len(),
        })
}

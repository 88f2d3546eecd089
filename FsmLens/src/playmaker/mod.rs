//! `PlayMaker` state machine data
//!
//! - [`StateMachine`] - states, transitions, events and variables
//! - [`FsmActionData`] - an action list with its parameter side-tables
//! - [`ActionDecoder`] - turns action parameters into [`DecodedValue`]s
//!
//! # Usage
//!
//! ```no_run
//! use fsmlens::playmaker::{StateMachine, decode_action};
//!
//! let fsm = StateMachine::from_json_file("door.fsm.json")?;
//! let state = &fsm.states[0];
//! for param in decode_action(&state.action_data, 0, fsm.data_version)? {
//!     println!("{} = {}", param.name, param.value);
//! }
//! # Ok::<(), fsmlens::Error>(())
//! ```

mod action_data;
mod byte_data;
mod decode;
mod fsm;
mod types;
mod values;

pub use action_data::FsmActionData;
pub use decode::{
    ActionDecoder, DecodedParameter, DecodedValue, INVALID_FIELD_NAME, decode_action, trim_class_name,
};
pub use fsm::{FsmEvent, FsmState, FsmTransition, FsmVariables, StateMachine};
pub use types::{ParamDataType, VariableType, param_type_name};
pub use values::{
    Color, FsmArray, FsmBool, FsmColor, FsmEnum, FsmEventTarget, FsmFloat, FsmGameObject, FsmInt, FsmObject,
    FsmOwnerDefault, FsmProperty, FsmQuaternion, FsmRect, FsmString, FsmTemplateControl, FsmVar, FsmVarOverride,
    FsmVariable, FsmVector2, FsmVector3, FunctionCall, OverrideTarget, Quaternion, Rect, Vector2, Vector3,
    Vector4,
};

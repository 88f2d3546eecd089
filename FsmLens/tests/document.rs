//! State machine dumps rendered into documents

use fsmlens::assets::AssetReference;
use fsmlens::document::{
    Bounds, DocumentBuilder, DocumentOptions, Field, FieldValue, STATE_COLORS, TRANSITION_COLORS,
    UNKNOWN_GAME_OBJECT, ValueKind, build_document, to_json, to_text,
};
use fsmlens::naming::{NameResolver, NoNames};
use fsmlens::playmaker::StateMachine;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

/// Names references from a fixed table.
struct FixedNames(HashMap<i64, &'static str>);

impl NameResolver for FixedNames {
    fn name_reference(&self, reference: &AssetReference) -> Option<String> {
        reference
            .name_or_resolve(|| self.0.get(&reference.path_id).map(|n| (*n).to_string()))
            .map(str::to_string)
    }
}

/// Idle waits 1.5 seconds, then runs; any state can die.
const PATROL: &str = r#"{
    "dataVersion": 2,
    "name": "Patrol",
    "startState": "Idle",
    "gameObject": {"m_FileID": 0, "m_PathID": 77},
    "states": [
        {
            "name": "Idle",
            "colorIndex": 1,
            "position": {"x": 100, "y": 200, "width": 120, "height": 32},
            "transitions": [
                {"fsmEvent": {"name": "FINISHED"}, "toState": "Run"}
            ],
            "actionData": {
                "actionNames": ["HutongGames.PlayMaker.Actions.Wait"],
                "actionEnabled": [1],
                "actionStartIndex": [0],
                "fsmFloatParams": [{"useVariable": false, "name": "", "value": 1.5}],
                "fsmBoolParams": [{"useVariable": true, "name": "useRealTime", "value": false}],
                "stringParams": ["FINISHED"],
                "paramDataType": [15, 17, 23],
                "paramName": ["time", "realTime", "finishEvent"],
                "paramDataPos": [0, 0, 0],
                "paramByteDataSize": [0, 0, 0]
            }
        },
        {
            "name": "Run",
            "colorIndex": 12,
            "position": {"x": 300, "y": 260, "width": 100, "height": 32},
            "transitions": [
                {"fsmEvent": {"name": "STOP"}, "toState": "Idle"},
                {"fsmEvent": {"name": "LOST"}, "toState": "Search"}
            ],
            "actionData": {
                "actionNames": ["HutongGames.PlayMaker.Actions.SetSpeed", "Translate"],
                "actionEnabled": [0, 1],
                "actionStartIndex": [0, 1],
                "byteData": "AAAgQQAAgD8AAAAAAAAAAA==",
                "paramDataType": [2, 9],
                "paramName": ["speed", "direction"],
                "paramDataPos": [0, 4],
                "paramByteDataSize": [4, 12]
            }
        }
    ],
    "events": [
        {"name": "FINISHED", "isSystemEvent": true},
        {"name": "STOP"},
        {"name": "DIE", "isGlobal": true}
    ],
    "globalTransitions": [
        {"fsmEvent": {"name": "DIE", "isGlobal": true}, "toState": "Run"},
        {"fsmEvent": {"name": "VANISH"}, "toState": "Gone"}
    ],
    "variables": {
        "floatVariables": [{"name": "walkSpeed", "value": 2.5}],
        "boolVariables": [{"name": "alert", "value": true}],
        "gameObjectVariables": [{"name": "target", "value": {"m_FileID": 0, "m_PathID": 12}}],
        "arrayVariables": [
            {"name": "waypoints", "type": 2, "boolValues": [true, false]}
        ]
    }
}"#;

fn patrol() -> StateMachine {
    StateMachine::from_json(PATROL).unwrap()
}

fn names() -> FixedNames {
    FixedNames(HashMap::from([(77, "Guard"), (12, "Player")]))
}

fn data_fields(fields: &[Field]) -> Vec<(String, String, String)> {
    fields
        .iter()
        .filter_map(|f| match f {
            Field::Data {
                name,
                value,
                value_name,
                ..
            } => Some((name.clone(), value.to_string(), value_name.clone())),
            Field::Class { .. } => None,
        })
        .collect()
}

#[test]
fn test_states_become_nodes() {
    let doc = build_document(&patrol(), &names());

    assert_eq!(doc.fsm_name, "Patrol");
    assert_eq!(doc.game_object_name, "Guard");
    assert_eq!(doc.nodes.len(), 4);

    let idle = &doc.nodes[0];
    assert!(idle.is_start);
    assert_eq!(
        idle.bounds,
        Bounds {
            x: 100.0,
            y: 200.0,
            width: 120.0,
            height: 32.0
        }
    );
    assert_eq!(idle.node_color, STATE_COLORS[1]);
    assert_eq!(idle.transition_color, TRANSITION_COLORS[1]);
    assert_eq!(doc.target(&idle.transitions[0]).map(|n| n.name.as_str()), Some("Run"));

    let run = &doc.nodes[1];
    assert!(!run.is_start);
    assert_eq!(run.node_color, STATE_COLORS[7]);
    assert_eq!(doc.target(&run.transitions[0]).map(|n| n.name.as_str()), Some("Idle"));
    assert_eq!(run.transitions[1].to, None);
    assert_eq!(doc.start_node().map(|n| n.name.as_str()), Some("Idle"));
}

#[test]
fn test_global_transitions_sit_above_target() {
    let doc = build_document(&patrol(), &NoNames);

    let die = doc.find_node("DIE").unwrap();
    assert!(die.is_global);
    assert_eq!(
        die.bounds,
        Bounds {
            x: 300.0,
            y: 210.0,
            width: 100.0,
            height: 18.0
        }
    );
    assert_eq!(die.node_color, STATE_COLORS[0]);
    assert_eq!(die.transitions.len(), 1);
    assert_eq!(doc.target(&die.transitions[0]).map(|n| n.name.as_str()), Some("Run"));

    let vanish = doc.find_node("VANISH").unwrap();
    assert_eq!(vanish.transitions[0].to, None);
    assert_eq!(vanish.bounds.y, -50.0);
    assert_eq!(vanish.bounds.height, 18.0);
}

#[test]
fn test_global_node_geometry_option() {
    let options = DocumentOptions::new().with_global_node_geometry(80.0, 24.0);
    let doc = DocumentBuilder::with_options(&NoNames, options).build(&patrol());
    let die = doc.find_node("DIE").unwrap();
    assert_eq!(die.bounds.y, 180.0);
    assert_eq!(die.bounds.height, 24.0);
}

#[test]
fn test_action_fields() {
    let doc = build_document(&patrol(), &NoNames);

    let idle = &doc.nodes[0].fields;
    match &idle[0] {
        Field::Class { class, enabled } => {
            assert_eq!(class.class_name, "Wait");
            assert!(*enabled);
        }
        other => panic!("expected class marker, got {other:?}"),
    }
    assert_eq!(
        data_fields(idle),
        vec![
            ("time".to_string(), "1.5".to_string(), String::new()),
            ("realTime".to_string(), "useRealTime".to_string(), "useRealTime".to_string()),
            ("finishEvent".to_string(), "FINISHED".to_string(), String::new()),
        ]
    );
    assert_eq!(
        idle[2].value(),
        Some(&FieldValue::Reference {
            value_kind: ValueKind::Variable,
            preview: "useRealTime".to_string(),
        })
    );

    let run = &doc.nodes[1].fields;
    let classes: Vec<_> = run
        .iter()
        .filter_map(|f| match f {
            Field::Class { class, enabled } => Some((class.class_name.as_str(), *enabled)),
            Field::Data { .. } => None,
        })
        .collect();
    assert_eq!(classes, vec![("SetSpeed", false), ("Translate", true)]);
    assert_eq!(
        data_fields(run),
        vec![
            ("speed".to_string(), "10".to_string(), String::new()),
            ("direction".to_string(), "(1, 0, 0)".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_variable_fields() {
    let doc = build_document(&patrol(), &names());

    let groups: Vec<_> = doc
        .variables
        .iter()
        .filter(|f| matches!(f, Field::Class { .. }))
        .map(Field::name)
        .collect();
    assert_eq!(groups, vec!["FsmFloat", "FsmBool", "FsmGameObject", "FsmArray"]);

    let values: Vec<_> = data_fields(&doc.variables).into_iter().map(|(n, v, _)| (n, v)).collect();
    assert_eq!(
        values,
        vec![
            ("walkSpeed".to_string(), "2.5".to_string()),
            ("alert".to_string(), "true".to_string()),
            ("target".to_string(), "Player/PPtr(0,12)".to_string()),
            ("waypoints".to_string(), "bool[2]".to_string()),
            ("waypoints[0]".to_string(), "true".to_string()),
            ("waypoints[1]".to_string(), "false".to_string()),
        ]
    );

    let indents: Vec<_> = doc
        .variables
        .iter()
        .filter_map(|f| match f {
            Field::Data { indent, .. } => Some(*indent),
            Field::Class { .. } => None,
        })
        .collect();
    assert_eq!(indents, vec![0, 0, 0, 0, 1, 1]);
}

/// Variable kinds the patrol dump leaves out.
const APPEARANCE: &str = r#"{
    "dataVersion": 2,
    "name": "Appearance",
    "variables": {
        "materialVariables": [
            {"name": "skin", "typeName": "UnityEngine.Material", "value": {"m_FileID": 0, "m_PathID": 30}}
        ],
        "textureVariables": [
            {"name": "icon", "typeName": "UnityEngine.Texture2D", "value": {"m_FileID": 0, "m_PathID": 0}}
        ],
        "arrayVariables": [
            {"name": "tints", "type": 7, "vector4Values": [
                {"x": 1, "y": 0.5, "z": 0, "w": 1},
                {"x": 0, "y": 0, "z": 0, "w": 0.25}
            ]},
            {"name": "offsets", "type": 5, "vector4Values": [{"x": 3, "y": -1.5, "z": 9, "w": 9}]}
        ],
        "enumVariables": [
            {"name": "mode", "enumName": "Game.Mode", "intValue": 2}
        ]
    }
}"#;

#[test]
fn test_object_array_and_enum_variable_fields() {
    let fsm = StateMachine::from_json(APPEARANCE).unwrap();
    let names = FixedNames(HashMap::from([(30, "Steel")]));
    let doc = build_document(&fsm, &names);

    let groups: Vec<_> = doc
        .variables
        .iter()
        .filter(|f| matches!(f, Field::Class { .. }))
        .map(Field::name)
        .collect();
    assert_eq!(groups, vec!["FsmMaterial", "FsmTexture", "FsmArray", "FsmEnum"]);

    let values: Vec<_> = data_fields(&doc.variables).into_iter().map(|(n, v, _)| (n, v)).collect();
    assert_eq!(
        values,
        vec![
            ("skin".to_string(), "Steel/PPtr(0,30) (Material)".to_string()),
            ("icon".to_string(), "None (Texture2D)".to_string()),
            ("tints".to_string(), "Color[2]".to_string()),
            ("tints[0]".to_string(), "RGBA(1, 0.5, 0, 1)".to_string()),
            ("tints[1]".to_string(), "RGBA(0, 0, 0, 0.25)".to_string()),
            ("offsets".to_string(), "Vector2[1]".to_string()),
            ("offsets[0]".to_string(), "(3, -1.5)".to_string()),
            ("mode".to_string(), "Mode (2)".to_string()),
        ]
    );

    let indents: Vec<_> = doc
        .variables
        .iter()
        .filter_map(|f| match f {
            Field::Data { indent, .. } => Some(*indent),
            Field::Class { .. } => None,
        })
        .collect();
    assert_eq!(indents, vec![0, 0, 0, 1, 1, 0, 1, 0]);

    let mode = doc.variables.iter().find(|f| f.name() == "mode").and_then(Field::value);
    assert!(matches!(
        mode,
        Some(FieldValue::Reference {
            value_kind: ValueKind::Enum,
            ..
        })
    ));
}

#[test]
fn test_graph_only_options() {
    let doc = DocumentBuilder::with_options(&NoNames, DocumentOptions::graph_only()).build(&patrol());
    assert!(doc.nodes.iter().all(|n| n.fields.is_empty()));
    assert!(doc.variables.is_empty());
    assert_eq!(doc.events.len(), 3);
    assert_eq!(doc.game_object_name, UNKNOWN_GAME_OBJECT);
}

#[test]
fn test_empty_state_machine() {
    let doc = build_document(&StateMachine::default(), &NoNames);
    assert!(doc.nodes.is_empty());
    assert!(doc.start_node().is_none());
    assert_eq!(to_text(&doc), format!("FSM:  ({UNKNOWN_GAME_OBJECT})\n"));
}

#[test]
fn test_text_export() {
    let doc = build_document(&patrol(), &names());
    let text = to_text(&doc);

    assert!(text.starts_with("FSM: Patrol (Guard)\n"));
    assert!(text.contains("\n[Idle] (start)\n  bounds: (100, 200, 120, 32)\n"));
    assert!(text.contains("  FINISHED -> Run\n"));
    assert!(text.contains("  LOST -> <none>\n"));
    assert!(text.contains("[DIE] (global)\n"));
    assert!(text.contains("  SetSpeed (disabled)\n"));
    assert!(text.contains("    realTime: useRealTime [useRealTime]\n"));
    assert!(text.contains("\nEvents:\n  FINISHED (system)\n  STOP\n  DIE (global)\n"));
    assert!(text.contains("      waypoints[1]: false\n"));
}

#[test]
fn test_json_export() {
    let doc = build_document(&patrol(), &names());
    let json: serde_json::Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();

    assert_eq!(json["fsmName"], "Patrol");
    assert_eq!(json["nodes"][0]["isStart"], true);
    assert_eq!(json["nodes"][0]["transitions"][0]["to"], "Run");
    assert!(json["nodes"][1]["transitions"][1]["to"].is_null());
    assert_eq!(json["nodes"][2]["name"], "DIE");
    assert_eq!(json["nodes"][2]["isGlobal"], true);
    assert_eq!(json["variables"].as_array().map(Vec::len), Some(doc.variables.len()));
}

#[test]
fn test_build_is_repeatable() {
    let fsm = patrol();
    let first = build_document(&fsm, &names());
    let second = build_document(&fsm, &names());
    assert_eq!(first, second);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, PATROL.as_bytes()).unwrap();

    let fsm = StateMachine::from_json_file(file.path()).unwrap();
    assert_eq!(fsm.states.len(), 2);
    assert_eq!(fsm.find_start_state(), Some(0));
    assert!(StateMachine::from_json("{\"states\": 4}").is_err());
}

#[test]
fn test_two_state_scenario() {
    let fsm = StateMachine::from_json(
        r#"{
            "name": "Mover",
            "startState": "Idle",
            "states": [
                {"name": "Idle", "transitions": [{"fsmEvent": {"name": "Go"}, "toState": "Run"}]},
                {"name": "Run"}
            ]
        }"#,
    )
    .unwrap();

    let doc = build_document(&fsm, &NoNames);
    assert_eq!(doc.nodes.len(), 2);
    assert!(doc.nodes[0].is_start);
    assert!(!doc.nodes[1].is_start);
    assert_eq!(doc.nodes[0].transitions.len(), 1);
    assert_eq!(doc.nodes[0].transitions[0].event, "Go");
    assert_eq!(doc.nodes[0].transitions[0].to, Some(1));
}

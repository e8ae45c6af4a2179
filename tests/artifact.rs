//! Tests for loading JSON definitions, the binary artifact and the listing.
mod common;
use common::*;
use nagare::model::{CompiledConstraint, Value};
use nagare::prelude::*;

const ORDER_PROCESS: &str = r#"{
    "id": "org.acme.orders",
    "name": "Orders",
    "version": "1.0",
    "variables": [
        { "name": "order", "dataType": "org.acme.Order", "tags": ["input"] }
    ],
    "nodes": [
        { "id": "1", "type": "start" },
        {
            "id": "2",
            "name": "Review",
            "type": "humanTask",
            "work": { "name": "review", "parameters": { "GroupId": "managers" } },
            "swimlane": "managers",
            "metadata": { "customAsync": true, "_layout": "x=10", "BPMN.shape": "task" }
        },
        {
            "id": "3",
            "type": "split",
            "gateway": "exclusive",
            "constraints": [
                { "connectionId": "c3", "dialect": "java", "expression": "return order.isApproved();" },
                { "connectionId": "c4", "dialect": "java", "expression": "", "default": true }
            ]
        },
        { "id": "4", "type": "end", "terminate": true },
        {
            "id": "5",
            "type": "container",
            "kind": "composite",
            "graph": {
                "nodes": [
                    { "id": "1", "type": "start" },
                    { "id": "2", "type": "end" }
                ],
                "connections": [ { "id": "i1", "from": "1", "to": "2" } ]
            }
        },
        { "id": "6", "type": "end" }
    ],
    "connections": [
        { "id": "c1", "from": "1", "to": "2" },
        { "id": "c2", "from": "2", "to": "3" },
        { "id": "c3", "from": "3", "to": "4" },
        { "id": "c4", "from": "3", "to": "5" },
        { "id": "c5", "from": "5", "to": "6" }
    ]
}"#;

fn load() -> ProcessDefinition {
    ProcessDefinition::from_json(ORDER_PROCESS).expect("Failed to parse process JSON")
}

#[test]
fn test_json_definition_compiles() {
    let artifacts = compile(&load());
    let model = &artifacts.model;

    let ids: Vec<&str> = model.node_ids().collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "1", "2", "6"]);
    assert_eq!(model.connections().count(), 6);
    assert_eq!(artifacts.metadata.extracted_process_id, "orders_1_0");
    assert!(artifacts.metadata.startable);

    let review = model.node("2").unwrap();
    assert_eq!(review[1], Instruction::Name("Review".to_string()));
    let meta: Vec<&str> = review
        .iter()
        .filter_map(|i| match i {
            Instruction::Meta { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(meta, vec!["customAsync"]);
    assert!(review.contains(&Instruction::Meta {
        key: "customAsync".to_string(),
        value: Value::Bool(true),
    }));
}

#[test]
fn test_json_constraints_point_at_their_targets() {
    let artifacts = compile(&load());
    let constraints: Vec<&CompiledConstraint> = fields(&artifacts.model, "3")
        .into_iter()
        .filter_map(|field| match field {
            NodeField::Constraint(c) => Some(c),
            _ => None,
        })
        .collect();

    assert_eq!(constraints.len(), 2);
    assert_eq!(constraints[0].connection_id, "c3");
    assert_eq!(constraints[0].to, "4");
    assert!(!constraints[0].default);
    assert_eq!(constraints[1].to, "5");
    assert!(constraints[1].default);
}

#[test]
fn test_malformed_json_is_reported() {
    let error = ProcessDefinition::from_json(
        r#"{ "id": "p", "name": "P", "nodes": [ { "id": "1", "type": "teleport" } ] }"#,
    )
    .unwrap_err();
    assert!(error.to_string().starts_with("Failed to parse process JSON"));
}

#[test]
fn test_json_round_trip_preserves_definition() {
    let process = load();
    let json = process.to_json().unwrap();
    assert_eq!(ProcessDefinition::from_json(&json).unwrap(), process);
}

#[test]
fn test_artifact_bytes_round_trip() {
    let model = compile(&load()).model;
    let bytes = model.to_bytes().unwrap();
    let restored = CompiledProcess::from_bytes(&bytes).unwrap();
    assert_eq!(restored, model);
}

#[test]
fn test_artifact_file_round_trip() {
    let model = compile(&load()).model;
    let path = std::env::temp_dir().join(format!("nagare-artifact-{}.bin", std::process::id()));
    let path = path.to_str().unwrap();

    model.save(path).unwrap();
    let restored = CompiledProcess::from_file(path).unwrap();
    std::fs::remove_file(path).unwrap();

    assert_eq!(restored, model);
}

#[test]
fn test_corrupt_artifact_is_rejected() {
    let result = CompiledProcess::from_bytes(&[0xff, 0xff, 0xff]);
    assert!(matches!(result, Err(ArtifactError::Decode(_))));

    let missing = CompiledProcess::from_file("/nonexistent/nagare/model.bin");
    assert!(matches!(missing, Err(ArtifactError::Io { .. })));
}

#[test]
fn test_listing_indents_nested_nodes() {
    let artifacts = compile(&load());
    let listing = Listing(&artifacts.model).to_string();
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(
        lines[0],
        "======== PROCESS MODEL for: org.acme.orders ========"
    );
    assert_eq!(
        *lines.last().unwrap(),
        "================ END OF MODEL ================"
    );
    assert!(lines[1].starts_with("0000: Header org.acme.orders 'Orders' v1.0"));
    assert!(listing.contains("Variable order: org.acme.Order [input]"));
    assert!(listing.contains(&format!("Connection {:<10} #3 -> #4", "c3")));

    let container = lines
        .iter()
        .position(|line| line.ends_with("-> #5"))
        .unwrap();
    assert!(lines[container].contains(": CompositeContextNode"));
    let nested_start = lines[container..]
        .iter()
        .find(|line| line.ends_with("-> #1"))
        .unwrap();
    assert!(nested_start.contains(":   StartNode"));
}

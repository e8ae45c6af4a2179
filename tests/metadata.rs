//! Tests for the process metadata record gathered during compilation.
mod common;
use common::*;
use nagare::prelude::*;
use nagare::process::{
    BoundaryEvent, Container, ContainerKind, EventKind, ParameterDefinition, StartEvent,
    SubProcess,
};

#[test]
fn test_process_identity() {
    let mut process = process_of(vec![start("1"), end("2")]);
    process.version = Some("1.0".to_string());

    let metadata = compile(&process).metadata;
    assert_eq!(metadata.process_id, "org.acme.orders");
    assert_eq!(metadata.extracted_process_id, "orders_1_0");
    assert_eq!(metadata.artifact_handle, "Orders_1_0Process");
    assert_eq!(metadata.name, "Orders");
    assert_eq!(metadata.version.as_deref(), Some("1.0"));
}

#[test]
fn test_work_items_are_collected_once() {
    let inner = graph_of(vec![], vec![human_task("t", "review")]);
    let process = process_of(vec![
        start("1"),
        human_task("3", "review"),
        human_task("4", "approve"),
        composite("5", inner),
        end("2"),
    ]);

    let metadata = compile(&process).metadata;
    let work_items: Vec<&str> = metadata.work_items.iter().map(String::as_str).collect();
    assert_eq!(work_items, vec!["approve", "review"]);
}

#[test]
fn test_service_task_is_bound_to_a_handler() {
    let process = process_of(vec![
        start("1"),
        service_task("3", "org.acme.BillingService", "charge"),
        end("2"),
    ]);

    let metadata = compile(&process).metadata;
    assert!(metadata.work_items.contains("BillingService_charge_3_Handler"));
    assert_eq!(
        metadata.work_item_bindings,
        vec![WorkItemBinding {
            work_name: "BillingService_charge_3_Handler".to_string(),
            node_id: "3".to_string(),
            interface: "org.acme.BillingService".to_string(),
            operation: "charge".to_string(),
            parameter_types: vec!["Object".to_string()],
        }]
    );
}

#[test]
fn test_nested_service_task_handler_names_its_owner() {
    let inner = graph_of(
        vec![],
        vec![service_task("3", "org.acme.BillingService", "charge")],
    );
    let process = process_of(vec![start("1"), composite("7", inner), end("2")]);

    let metadata = compile(&process).metadata;
    assert_eq!(
        metadata.work_item_bindings[0].work_name,
        "BillingService_charge_7_3_Handler"
    );
}

#[test]
fn test_service_tasks_with_punctuated_ids_get_their_own_handlers() {
    let process = process_of(vec![
        start("1"),
        service_task("t-1", "org.acme.BillingService", "charge"),
        service_task("t_1", "org.acme.BillingService", "charge"),
        end("2"),
    ]);

    let metadata = compile(&process).metadata;
    let bindings: Vec<(&str, &str)> = metadata
        .work_item_bindings
        .iter()
        .map(|b| (b.work_name.as_str(), b.node_id.as_str()))
        .collect();
    assert_eq!(
        bindings,
        vec![
            ("BillingService_charge_t__00002d1_Handler", "t-1"),
            ("BillingService_charge_t__00005f1_Handler", "t_1"),
        ]
    );
    assert_eq!(metadata.work_items.len(), 2);
}

#[test]
fn test_service_task_parameter_types() {
    let mut single = service_task("3", "org.acme.Billing", "charge");
    let mut declared = service_task("4", "org.acme.Billing", "refund");
    if let NodeKind::WorkItem(item) = &mut single.kind {
        item.work = item
            .work
            .clone()
            .with_parameter("ParameterType", "org.acme.Invoice");
    }
    if let NodeKind::WorkItem(item) = &mut declared.kind {
        item.work.parameter_definitions = vec![
            ParameterDefinition {
                name: "Interface".to_string(),
                data_type: "String".to_string(),
            },
            ParameterDefinition {
                name: "invoice".to_string(),
                data_type: "org.acme.Invoice".to_string(),
            },
            ParameterDefinition {
                name: "reason".to_string(),
                data_type: "String".to_string(),
            },
        ];
    }
    let process = process_of(vec![start("1"), single, declared, end("2")]);

    let artifacts = compile(&process);
    let types: Vec<&Vec<String>> = artifacts
        .metadata
        .work_item_bindings
        .iter()
        .map(|b| &b.parameter_types)
        .collect();
    assert_eq!(
        types,
        vec![
            &vec!["org.acme.Invoice".to_string()],
            &vec!["org.acme.Invoice".to_string(), "String".to_string()],
        ]
    );
    // A single `ParameterType` also becomes the node's parameter definition.
    assert!(fields(&artifacts.model, "3").contains(&&NodeField::ParameterDefinition {
        name: "Parameter".to_string(),
        data_type: "org.acme.Invoice".to_string(),
    }));
}

#[test]
fn test_start_events_register_their_signals() {
    let process = process_of(vec![
        start_with(
            "err",
            StartEvent::Error {
                code: "E42".to_string(),
            },
        ),
        start_with(
            "esc",
            StartEvent::Escalation {
                code: "late".to_string(),
            },
        ),
        start_with("comp", StartEvent::Compensation),
        start_with(
            "cond",
            StartEvent::Conditional {
                expression: "order.total > 100".to_string(),
            },
        ),
        end("2"),
    ]);

    let metadata = compile(&process).metadata;
    let signals: Vec<(&str, Option<&str>)> = metadata
        .signals
        .iter()
        .map(|(name, payload)| (name.as_str(), payload.as_deref()))
        .collect();
    assert_eq!(
        signals,
        vec![
            ("Compensation-comp", None),
            ("Conditional-cond", None),
            ("Error-E42", None),
            ("Escalation-late", None),
        ]
    );
    assert!(metadata.triggers.is_empty());
}

#[test]
fn test_error_start_without_code_is_rejected() {
    let process = process_of(vec![
        start_with(
            "err",
            StartEvent::Error {
                code: String::new(),
            },
        ),
        end("2"),
    ]);
    assert_eq!(
        compile_err(&process).to_string(),
        "Invalid parameters for Error Start Event \"err\": error code should not be empty"
    );
}

#[test]
fn test_only_plain_top_level_start_makes_process_startable() {
    let process = process_of(vec![signal_start("1", "go", None), end("2")]);
    assert!(!compile(&process).metadata.startable);

    let process = process_of(vec![signal_start("1", "go", None), start("3"), end("2")]);
    assert!(compile(&process).metadata.startable);
}

#[test]
fn test_sub_processes_are_registered_with_their_handle() {
    let call = NodeDefinition::new(
        "call",
        "",
        NodeKind::SubProcess(SubProcess {
            process_id: "org.acme.billing".to_string(),
            process_name: Some("Billing".to_string()),
            wait_for_completion: true,
            independent: false,
            in_mappings: vec![],
            out_mappings: vec![],
        }),
    );
    let artifacts = compile(&process_of(vec![start("1"), call, end("2")]));

    assert_eq!(
        artifacts.metadata.sub_processes.get("org.acme.billing"),
        Some(&"BillingProcess".to_string())
    );
    let call_fields = fields(&artifacts.model, "call");
    assert_eq!(
        call_fields[..4],
        [
            &NodeField::ProcessId("org.acme.billing".to_string()),
            &NodeField::ProcessName("Billing".to_string()),
            &NodeField::WaitForCompletion(true),
            &NodeField::Independent(false),
        ]
    );
}

fn boundary(kind: EventKind, event_type: &str, variable: Option<&str>) -> NodeDefinition {
    NodeDefinition::new(
        "boundary",
        "",
        NodeKind::BoundaryEvent(BoundaryEvent {
            event_type: event_type.to_string(),
            kind,
            attached_to: "3".to_string(),
            cancel_activity: false,
            scope: None,
            variable_name: variable.map(str::to_string),
        }),
    )
}

#[test]
fn test_boundary_signal_is_typed_by_its_variable() {
    let mut process = process_of(vec![
        start("1"),
        human_task("3", "review"),
        boundary(EventKind::Signal, "cancel", Some("reason")),
        end("2"),
    ]);
    process.variables.push(Variable::new("reason", "String"));

    let artifacts = compile(&process);
    assert_eq!(
        artifacts.metadata.signals.get("cancel"),
        Some(&Some("String".to_string()))
    );
    assert_eq!(
        fields(&artifacts.model, "boundary"),
        vec![
            &NodeField::EventType("cancel".to_string()),
            &NodeField::AttachedTo("3".to_string()),
            &NodeField::Scope(None),
            &NodeField::VariableName("reason".to_string()),
            &NodeField::CancelActivity(false),
        ]
    );
}

#[test]
fn test_untyped_signal_is_typed_by_a_later_registration() {
    let mut process = process_of(vec![
        signal_start("1", "cancel", None),
        human_task("3", "review"),
        boundary(EventKind::Signal, "cancel", Some("reason")),
        end("2"),
    ]);
    process.variables.push(Variable::new("reason", "String"));

    let metadata = compile(&process).metadata;
    assert_eq!(
        metadata.signals.get("cancel"),
        Some(&Some("String".to_string()))
    );
}

#[test]
fn test_timer_boundary_registers_nothing() {
    let process = process_of(vec![
        start("1"),
        human_task("3", "review"),
        boundary(EventKind::Timer, "Timer-3", None),
        end("2"),
    ]);

    let metadata = compile(&process).metadata;
    assert!(metadata.signals.is_empty());
    assert!(metadata.triggers.is_empty());
}

#[test]
fn test_event_sub_process_lists_sorted_distinct_events() {
    let graph = graph_of(
        vec![],
        vec![
            signal_start("s", "poke", None),
            start_with(
                "e",
                StartEvent::Error {
                    code: "E1".to_string(),
                },
            ),
            end("x"),
        ],
    );
    let handler = NodeDefinition::new(
        "handler",
        "",
        NodeKind::Container(Container {
            kind: ContainerKind::EventSubProcess {
                keep_active: true,
                events: vec!["poke".to_string(), "Escalation-late".to_string()],
            },
            autocomplete: false,
            graph,
        }),
    );
    // Event sub-processes are not connected to the main flow.
    let mut process = process_of(vec![start("1"), end("2")]);
    process.nodes.push(handler);

    let artifacts = compile(&process);
    assert_eq!(
        fields(&artifacts.model, "handler"),
        vec![
            &NodeField::AutoComplete(false),
            &NodeField::KeepActive(true),
            &NodeField::Event("Error-E1".to_string()),
            &NodeField::Event("Escalation-late".to_string()),
            &NodeField::Event("poke".to_string()),
        ]
    );
    // Nested start events never make the process startable on their own.
    assert!(artifacts.metadata.startable);
    assert_eq!(artifacts.metadata.signals.len(), 2);
}

#[test]
fn test_metadata_serializes_to_json() {
    let process = process_of(vec![signal_start("1", "go", None), end("2")]);
    let metadata = compile(&process).metadata;

    let json = serde_json::to_value(&metadata).unwrap();
    assert_eq!(json["processId"], "org.acme.orders");
    assert_eq!(json["artifactHandle"], "OrdersProcess");
    assert_eq!(json["triggers"][0]["ownerId"], "1");
    assert_eq!(json["triggers"][0]["kind"], "ConsumeSignal");

    let back: ProcessMetaData = serde_json::from_value(json).unwrap();
    assert_eq!(back, metadata);
}

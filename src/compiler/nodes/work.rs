use super::{emit_associations, unexpected_kind};
use crate::compiler::context::CompileContext;
use crate::compiler::metadata::WorkItemBinding;
use crate::compiler::naming::simple_type_name;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::NodeField;
use crate::process::{NodeDefinition, NodeKind, Work};

/// Work name of service calls that are bound to a generated handler.
const SERVICE_TASK: &str = "Service Task";

const INTERFACE: &str = "Interface";
const OPERATION: &str = "Operation";
const PARAMETER_TYPE: &str = "ParameterType";
const DEFAULT_PARAMETER: &str = "Parameter";

/// Parameters that configure the work item itself rather than carry data.
const RESERVED_PARAMETERS: &[&str] = &[
    "TaskName",
    INTERFACE,
    OPERATION,
    PARAMETER_TYPE,
    "implementation",
    "interfaceImplementationRef",
    "operationImplementationRef",
];

pub(super) fn compile_human_task<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::HumanTask(task) = &node.kind else {
        return Err(unexpected_kind(node, "human task"));
    };

    Validator::of("Human Task", &node.id)
        .not_empty("work name", &task.work.name)
        .validate()?;

    cx.begin_node(node, "Human Task");
    emit_work(cx, &task.work);
    if let Some(swimlane) = task.swimlane.as_deref().filter(|s| !s.is_empty()) {
        cx.field(NodeField::Swimlane(swimlane.to_string()));
    }
    cx.metadata_mut().add_work_item(task.work.name.clone());
    cx.emit_metadata(node);
    emit_associations(cx, node, &task.in_associations, &task.out_associations)?;
    cx.done();
    Ok(())
}

pub(super) fn compile_work_item<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::WorkItem(item) = &node.kind else {
        return Err(unexpected_kind(node, "work item"));
    };
    let work = &item.work;

    Validator::of("Work Item", &node.id)
        .not_empty("work name", &work.name)
        .validate()?;

    let work_name = if work.name == SERVICE_TASK {
        bind_service_task(cx, node, work)?
    } else {
        work.name.clone()
    };

    cx.begin_node(node, "Work Item");
    emit_work(cx, work);
    cx.metadata_mut().add_work_item(work_name);
    cx.emit_metadata(node);
    emit_associations(cx, node, &item.in_associations, &item.out_associations)?;
    cx.done();
    Ok(())
}

/// Validates a service call and registers the handler it is bound to.
/// Returns the handler's work name.
fn bind_service_task(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    work: &Work,
) -> Result<String, CompileError> {
    Validator::of(SERVICE_TASK, &node.id)
        .present("interface name", work.parameter(INTERFACE))
        .present("operation name", work.parameter(OPERATION))
        .validate()?;
    let interface = work.parameter(INTERFACE).unwrap_or_default();
    let operation = work.parameter(OPERATION).unwrap_or_default();

    let work_name = format!(
        "{}_{}_{}_Handler",
        simple_type_name(interface),
        operation,
        cx.owner_id(&node.id)
    );
    cx.metadata_mut().add_work_item_binding(WorkItemBinding {
        work_name: work_name.clone(),
        node_id: node.id.clone(),
        interface: interface.to_string(),
        operation: operation.to_string(),
        parameter_types: parameter_types(work),
    });
    Ok(work_name)
}

/// The ordered payload types of a service call: the declared data
/// parameters, else the single `ParameterType`, else `Object`.
fn parameter_types(work: &Work) -> Vec<String> {
    let declared: Vec<String> = work
        .parameter_definitions
        .iter()
        .filter(|d| !RESERVED_PARAMETERS.contains(&d.name.as_str()))
        .map(|d| d.data_type.clone())
        .collect();
    if !declared.is_empty() {
        return declared;
    }
    vec![
        work.parameter(PARAMETER_TYPE)
            .unwrap_or("Object")
            .to_string(),
    ]
}

fn emit_work(cx: &mut CompileContext<'_>, work: &Work) {
    cx.field(NodeField::WorkName(work.name.clone()));
    for (name, value) in &work.parameters {
        cx.field(NodeField::WorkParameter {
            name: name.clone(),
            value: value.clone(),
        });
    }
    if work.parameter_definitions.is_empty() {
        if let Some(data_type) = work.parameter(PARAMETER_TYPE) {
            cx.field(NodeField::ParameterDefinition {
                name: DEFAULT_PARAMETER.to_string(),
                data_type: data_type.to_string(),
            });
        }
    }
    for definition in &work.parameter_definitions {
        cx.field(NodeField::ParameterDefinition {
            name: definition.name.clone(),
            data_type: definition.data_type.clone(),
        });
    }
}

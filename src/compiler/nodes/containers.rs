use super::gateways::compile_constraints;
use super::{resolve_variable, unexpected_kind};
use crate::compiler::context::CompileContext;
use crate::compiler::naming::strip_expression;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::NodeField;
use crate::process::metadata_keys::TRIGGER_REF;
use crate::process::{ContainerKind, NodeDefinition, NodeKind, StartEvent, SubGraph};
use std::collections::BTreeSet;

pub(super) fn compile_container<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Container(container) = &node.kind else {
        return Err(unexpected_kind(node, "container node"));
    };

    let default_name = match container.kind {
        ContainerKind::Composite => "Composite",
        ContainerKind::Dynamic { .. } => "Dynamic",
        ContainerKind::State { .. } => "State",
        ContainerKind::EventSubProcess { .. } => "Event Subprocess",
    };
    cx.begin_node(node, default_name);
    cx.field(NodeField::AutoComplete(container.autocomplete));

    match &container.kind {
        ContainerKind::Composite => {}
        ContainerKind::Dynamic {
            activation,
            completion,
        } => {
            if let Some(activation) = activation.as_deref().filter(|e| !e.is_empty()) {
                cx.field(NodeField::ActivationExpression(activation.to_string()));
            }
            if let Some(completion) = completion.as_deref().filter(|e| !e.is_empty()) {
                cx.field(NodeField::CompletionExpression(completion.to_string()));
            }
        }
        ContainerKind::State { constraints } => compile_constraints(cx, node, constraints)?,
        ContainerKind::EventSubProcess {
            keep_active,
            events,
        } => {
            cx.field(NodeField::KeepActive(*keep_active));
            for event in triggering_events(events, &container.graph) {
                cx.field(NodeField::Event(event));
            }
        }
    }

    cx.emit_metadata(node);
    cx.compile_subgraph(node, &container.graph, &[])?;
    cx.done();
    Ok(())
}

/// The distinct events that start an event sub-process, sorted: the declared
/// ones plus those its start nodes listen to.
fn triggering_events(declared: &[String], graph: &SubGraph) -> BTreeSet<String> {
    let started_by = graph.nodes.iter().filter_map(|node| match &node.kind {
        NodeKind::Start {
            event: Some(StartEvent::Signal | StartEvent::Message),
            ..
        } => node.meta_str(TRIGGER_REF).map(str::to_string),
        NodeKind::Start {
            event: Some(StartEvent::Error { code }),
            ..
        } => Some(format!("Error-{}", code)),
        NodeKind::Start {
            event: Some(StartEvent::Escalation { code }),
            ..
        } => Some(format!("Escalation-{}", code)),
        _ => None,
    });

    declared
        .iter()
        .filter(|event| !event.is_empty())
        .cloned()
        .chain(started_by)
        .collect()
}

pub(super) fn compile_for_each<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::ForEach(for_each) = &node.kind else {
        return Err(unexpected_kind(node, "for-each node"));
    };

    Validator::of("ForEach", &node.id)
        .not_empty("collection expression", &for_each.collection_expression)
        .not_empty("variable name", &for_each.variable.name)
        .not_empty("linked incoming node", &for_each.linked_incoming)
        .not_empty("linked outgoing node", &for_each.linked_outgoing)
        .validate()?;
    for link in [&for_each.linked_incoming, &for_each.linked_outgoing] {
        if !for_each.graph.nodes.iter().any(|child| &child.id == link) {
            return Err(CompileError::ReferenceResolution {
                node_id: node.id.clone(),
                reference: "linked node",
                name: link.clone(),
            });
        }
    }
    resolve_variable(cx, node, &for_each.collection_expression)?;

    cx.begin_node(node, "ForEach");
    cx.field(NodeField::CollectionExpression(
        strip_expression(&for_each.collection_expression).to_string(),
    ));
    cx.field(NodeField::LoopVariable {
        name: for_each.variable.name.clone(),
        data_type: for_each.variable.data_type.clone(),
    });
    if let Some(output) = for_each
        .output_collection_expression
        .as_deref()
        .filter(|e| !e.is_empty())
    {
        resolve_variable(cx, node, output)?;
        cx.field(NodeField::OutputCollectionExpression(
            strip_expression(output).to_string(),
        ));
    }
    if let Some(variable) = &for_each.output_variable {
        cx.field(NodeField::OutputVariable {
            name: variable.name.clone(),
            data_type: variable.data_type.clone(),
        });
    }
    if let Some(condition) = for_each
        .completion_condition
        .as_deref()
        .filter(|c| !c.is_empty())
    {
        cx.field(NodeField::CompletionCondition(
            strip_expression(condition).to_string(),
        ));
    }
    cx.field(NodeField::LinkIncoming(for_each.linked_incoming.clone()));
    cx.field(NodeField::LinkOutgoing(for_each.linked_outgoing.clone()));
    cx.emit_metadata(node);

    let mut loop_scope = vec![&for_each.variable];
    loop_scope.extend(for_each.output_variable.as_ref());
    cx.compile_subgraph(node, &for_each.graph, &loop_scope)?;
    cx.done();
    Ok(())
}

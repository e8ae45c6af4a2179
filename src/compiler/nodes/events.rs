use super::{compile_timer, emit_producer, producer_kind, resolve_variable, unexpected_kind};
use crate::compiler::context::CompileContext;
use crate::compiler::metadata::{TriggerKind, TriggerMetaData};
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::NodeField;
use crate::process::metadata_keys::TRIGGER_MAPPING;
use crate::process::{EventKind, NodeDefinition, NodeKind, StartEvent};

pub(super) fn compile_start<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Start {
        interrupting,
        event,
    } = &node.kind
    else {
        return Err(unexpected_kind(node, "start node"));
    };

    cx.begin_node(node, "Start");
    cx.field(NodeField::Interrupting(*interrupting));

    match event {
        None => {
            if cx.is_top_level() {
                cx.metadata_mut().startable = true;
            }
        }
        Some(StartEvent::Timer { timer }) => {
            let timer = compile_timer(node, timer)?;
            cx.field(NodeField::Timer(timer));
        }
        Some(StartEvent::Signal) => consume(cx, node, TriggerKind::ConsumeSignal)?,
        Some(StartEvent::Message) => consume(cx, node, TriggerKind::ConsumeMessage)?,
        Some(StartEvent::Error { code }) => {
            Validator::of("Error Start Event", &node.id)
                .not_empty("error code", code)
                .validate()?;
            event_signal(cx, format!("Error-{}", code));
        }
        Some(StartEvent::Escalation { code }) => {
            Validator::of("Escalation Start Event", &node.id)
                .not_empty("escalation code", code)
                .validate()?;
            event_signal(cx, format!("Escalation-{}", code));
        }
        Some(StartEvent::Compensation) => {
            let owner_id = cx.owner_id(&node.id);
            event_signal(cx, format!("Compensation-{}", owner_id));
        }
        Some(StartEvent::Conditional { expression }) => {
            Validator::of("Conditional Start Event", &node.id)
                .not_empty("condition", expression)
                .validate()?;
            cx.field(NodeField::Condition(expression.clone()));
            let owner_id = cx.owner_id(&node.id);
            event_signal(cx, format!("Conditional-{}", owner_id));
        }
    }

    cx.close_node(node);
    Ok(())
}

/// Registers a consuming trigger together with its signal.
fn consume(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    kind: TriggerKind,
) -> Result<(), CompileError> {
    let trigger = TriggerMetaData::of(node, cx, node.meta_str(TRIGGER_MAPPING), Some(kind))?;
    cx.field(trigger.to_field());
    let metadata = cx.metadata_mut();
    metadata.add_signal(trigger.name.clone(), trigger.payload_type());
    metadata.add_trigger(trigger);
    Ok(())
}

/// Emits and registers a signal without payload.
fn event_signal(cx: &mut CompileContext<'_>, name: String) {
    cx.field(NodeField::EventSignal(name.clone()));
    cx.metadata_mut().add_signal(name, None);
}

pub(super) fn compile_end<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::End { terminate } = &node.kind else {
        return Err(unexpected_kind(node, "end node"));
    };

    cx.begin_node(node, "End");
    cx.field(NodeField::Terminate(*terminate));
    if let Some(kind) = producer_kind(node)? {
        emit_producer(cx, node, kind)?;
    }
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_timer_node<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Timer { timer } = &node.kind else {
        return Err(unexpected_kind(node, "timer node"));
    };

    let timer = compile_timer(node, timer)?;
    cx.begin_node(node, "Timer");
    cx.field(NodeField::Timer(timer));
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_fault<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Fault {
        fault_name,
        fault_variable,
        terminate_parent,
    } = &node.kind
    else {
        return Err(unexpected_kind(node, "fault node"));
    };

    cx.begin_node(node, "Error");
    if let Some(name) = fault_name {
        cx.field(NodeField::FaultName(name.clone()));
    }
    if let Some(variable) = fault_variable {
        resolve_variable(cx, node, variable)?;
        cx.field(NodeField::FaultVariable(variable.clone()));
    }
    cx.field(NodeField::TerminateParent(*terminate_parent));
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_milestone<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Milestone {
        condition,
        match_variable,
    } = &node.kind
    else {
        return Err(unexpected_kind(node, "milestone node"));
    };

    Validator::of("Milestone", &node.id)
        .not_empty("condition", condition)
        .validate()?;

    cx.begin_node(node, "Milestone");
    cx.field(NodeField::Condition(condition.clone()));
    if let Some(variable) = match_variable {
        resolve_variable(cx, node, variable)?;
        cx.field(NodeField::MatchVariable(variable.clone()));
    }
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_boundary_event<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::BoundaryEvent(event) = &node.kind else {
        return Err(unexpected_kind(node, "boundary event"));
    };

    Validator::of("Boundary Event", &node.id)
        .not_empty("event type", &event.event_type)
        .not_empty("attached to", &event.attached_to)
        .validate()?;
    if cx.sibling(&event.attached_to).is_none() {
        return Err(CompileError::ReferenceResolution {
            node_id: node.id.clone(),
            reference: "attached node",
            name: event.attached_to.clone(),
        });
    }

    cx.begin_node(node, "Boundary Event");
    cx.field(NodeField::EventType(event.event_type.clone()));
    cx.field(NodeField::AttachedTo(event.attached_to.clone()));
    cx.field(NodeField::Scope(event.scope.clone()));
    register_event(
        cx,
        node,
        event.kind,
        &event.event_type,
        event.variable_name.as_deref(),
    )?;
    cx.field(NodeField::CancelActivity(event.cancel_activity));
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_catch_event<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Event(event) = &node.kind else {
        return Err(unexpected_kind(node, "catch event"));
    };

    Validator::of("Event", &node.id)
        .not_empty("event type", &event.event_type)
        .validate()?;

    cx.begin_node(node, "Event");
    cx.field(NodeField::EventType(event.event_type.clone()));
    cx.field(NodeField::Scope(event.scope.clone()));
    register_event(
        cx,
        node,
        event.kind,
        &event.event_type,
        event.variable_name.as_deref(),
    )?;
    cx.close_node(node);
    Ok(())
}

/// Emits the receiving variable of a catching event and registers what the
/// event waits for: a signal typed by that variable, or a message trigger.
fn register_event(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    kind: EventKind,
    event_type: &str,
    variable_name: Option<&str>,
) -> Result<(), CompileError> {
    let variable = match variable_name {
        Some(name) => {
            let variable = resolve_variable(cx, node, name)?;
            cx.field(NodeField::VariableName(name.to_string()));
            variable
        }
        None => None,
    };

    match kind {
        EventKind::Signal => {
            let payload = variable.map(|v| v.data_type.clone());
            cx.metadata_mut().add_signal(event_type, payload);
        }
        EventKind::Message => {
            let trigger =
                TriggerMetaData::of(node, cx, variable_name, Some(TriggerKind::ConsumeMessage))?;
            cx.field(trigger.to_field());
            cx.metadata_mut().add_trigger(trigger);
        }
        EventKind::Timer
        | EventKind::Error
        | EventKind::Escalation
        | EventKind::Compensation
        | EventKind::Conditional => {}
    }
    Ok(())
}

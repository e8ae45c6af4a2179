//! Compilers for the built-in node kinds.

use crate::compiler::associations::compile_associations;
use crate::compiler::context::CompileContext;
use crate::compiler::metadata::{TriggerKind, TriggerMetaData};
use crate::compiler::naming::{is_identifier, strip_expression};
use crate::compiler::registry::{NodeCompiler, NodeRegistry};
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::{CompiledAction, CompiledTimer, Instruction, NodeField};
use crate::process::metadata_keys::{TRIGGER_MAPPING_INPUT, TRIGGER_TYPE};
use crate::process::{DataAssociation, DataMapping, NodeDefinition, TimeType, Timer, Variable};

mod actions;
mod containers;
mod events;
mod gateways;
mod rules;
mod subprocess;
mod work;

/// Defines a compiler struct per built-in node type and the function that
/// registers all of them.
macro_rules! define_node_compilers {
    ( $( ($struct_name:ident, $node_type:expr, $compile:path) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeCompiler for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn compile<'a>(&self, node: &'a NodeDefinition, cx: &mut CompileContext<'a>) -> Result<(), CompileError> {
                    $compile(node, cx)
                }
            }
        )*

        pub(crate) fn register_default_compilers(registry: &mut NodeRegistry) {
            $( registry.register(Box::new($struct_name)); )*
        }
    };
}

define_node_compilers! {
    // Events
    (StartNodeCompiler, "StartNode", events::compile_start),
    (EndNodeCompiler, "EndNode", events::compile_end),
    (TimerNodeCompiler, "TimerNode", events::compile_timer_node),
    (FaultNodeCompiler, "FaultNode", events::compile_fault),
    (BoundaryEventCompiler, "BoundaryEventNode", events::compile_boundary_event),
    (EventNodeCompiler, "EventNode", events::compile_catch_event),
    (MilestoneNodeCompiler, "MilestoneNode", events::compile_milestone),

    // Activities
    (ActionNodeCompiler, "ActionNode", actions::compile_action),
    (HumanTaskCompiler, "HumanTaskNode", work::compile_human_task),
    (WorkItemCompiler, "WorkItemNode", work::compile_work_item),
    (SubProcessCompiler, "SubProcessNode", subprocess::compile_sub_process),
    (RuleSetCompiler, "RuleSetNode", rules::compile_rule_set),

    // Gateways
    (SplitCompiler, "Split", gateways::compile_split),
    (JoinCompiler, "Join", gateways::compile_join),

    // Containers
    (ForEachCompiler, "ForEachNode", containers::compile_for_each),
    (CompositeCompiler, "CompositeContextNode", containers::compile_container),
    (DynamicCompiler, "DynamicNode", containers::compile_container),
    (StateCompiler, "StateNode", containers::compile_container),
    (EventSubProcessCompiler, "EventSubProcessNode", containers::compile_container),
}

/// A built-in compiler was handed a node of another kind, e.g. through a
/// type alias.
fn unexpected_kind(node: &NodeDefinition, expected: &'static str) -> CompileError {
    CompileError::UnsupportedFeature {
        node_id: node.id.clone(),
        feature: expected,
        value: node.kind.type_name().to_string(),
    }
}

/// Emits the in and out associations of a node, in declaration order.
fn emit_associations(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    inputs: &[DataAssociation],
    outputs: &[DataAssociation],
) -> Result<(), CompileError> {
    for association in compile_associations(&node.id, inputs)? {
        cx.emit(Instruction::InAssociation(association));
    }
    for association in compile_associations(&node.id, outputs)? {
        cx.emit(Instruction::OutAssociation(association));
    }
    Ok(())
}

/// Emits variable-name mappings between a node and its enclosing scope. The
/// enclosing side must resolve when it is a plain variable name.
fn emit_mappings(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    inputs: &[DataMapping],
    outputs: &[DataMapping],
) -> Result<(), CompileError> {
    for mapping in inputs {
        resolve_variable(cx, node, &mapping.source)?;
        cx.field(NodeField::InMapping {
            source: mapping.source.clone(),
            target: mapping.target.clone(),
        });
    }
    for mapping in outputs {
        resolve_variable(cx, node, &mapping.target)?;
        cx.field(NodeField::OutMapping {
            source: mapping.source.clone(),
            target: mapping.target.clone(),
        });
    }
    Ok(())
}

/// Looks up a variable referenced by name. Expressions are left to the
/// runtime and resolve to `None`.
fn resolve_variable<'a>(
    cx: &CompileContext<'a>,
    node: &NodeDefinition,
    reference: &str,
) -> Result<Option<&'a Variable>, CompileError> {
    let name = strip_expression(reference);
    if !is_identifier(name) {
        return Ok(None);
    }
    cx.find_variable(name)
        .map(Some)
        .ok_or_else(|| CompileError::ReferenceResolution {
            node_id: node.id.clone(),
            reference: "variable",
            name: name.to_string(),
        })
}

fn compile_timer(node: &NodeDefinition, timer: &Timer) -> Result<CompiledTimer, CompileError> {
    let validator = Validator::of("Timer", &node.id);
    let validator = match timer.time_type {
        TimeType::Duration | TimeType::Cycle => validator.present("delay", timer.delay.as_deref()),
        TimeType::Date => validator.present("date", timer.date.as_deref()),
    };
    validator.validate()?;

    Ok(match timer.time_type {
        TimeType::Duration => CompiledTimer {
            time_type: timer.time_type.code(),
            delay: timer.delay.clone(),
            period: None,
            date: None,
        },
        TimeType::Cycle => CompiledTimer {
            time_type: timer.time_type.code(),
            delay: timer.delay.clone(),
            period: timer.period.clone(),
            date: None,
        },
        TimeType::Date => CompiledTimer {
            time_type: timer.time_type.code(),
            delay: None,
            period: None,
            date: timer.date.clone(),
        },
    })
}

/// The producer kind declared in a node's `TriggerType`, if it declares one.
fn producer_kind(node: &NodeDefinition) -> Result<Option<TriggerKind>, CompileError> {
    let Some(raw) = node.meta_str(TRIGGER_TYPE) else {
        return Ok(None);
    };
    let kind = TriggerKind::parse(raw).ok_or_else(|| CompileError::UnsupportedFeature {
        node_id: node.id.clone(),
        feature: "trigger type",
        value: raw.to_string(),
    })?;
    Ok(Some(kind).filter(TriggerKind::is_producer))
}

/// Registers the trigger of a producing node and emits its producer action.
fn emit_producer(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    kind: TriggerKind,
) -> Result<(), CompileError> {
    let trigger = TriggerMetaData::of(node, cx, node.meta_str(TRIGGER_MAPPING_INPUT), Some(kind))?;
    cx.field(NodeField::Action(CompiledAction::Produce {
        trigger: trigger.name.clone(),
        kind: trigger.kind,
        owner_id: trigger.owner_id.clone(),
        data_type: trigger.data_type.clone(),
        model_ref: trigger.model_ref.clone(),
    }));
    cx.metadata_mut().add_trigger(trigger);
    Ok(())
}

use super::unexpected_kind;
use crate::compiler::associations::check_language;
use crate::compiler::context::CompileContext;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::{CompiledConstraint, NodeField};
use crate::process::{Constraint, JoinKind, NodeDefinition, NodeKind};

pub(super) fn compile_split<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Split {
        gateway,
        constraints,
    } = &node.kind
    else {
        return Err(unexpected_kind(node, "split node"));
    };

    cx.begin_node(node, "Split");
    cx.field(NodeField::GatewayType(gateway.code()));
    if gateway.is_conditional() {
        compile_constraints(cx, node, constraints)?;
    }
    cx.close_node(node);
    Ok(())
}

pub(super) fn compile_join<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Join { gateway } = &node.kind else {
        return Err(unexpected_kind(node, "join node"));
    };

    if let JoinKind::NOfM { threshold } = gateway {
        Validator::of("Join", &node.id)
            .not_empty("threshold", threshold)
            .validate()?;
    }

    cx.begin_node(node, "Join");
    cx.field(NodeField::GatewayType(gateway.code()));
    if let JoinKind::NOfM { threshold } = gateway {
        cx.field(NodeField::JoinThreshold(threshold.clone()));
    }
    cx.close_node(node);
    Ok(())
}

/// Emits one constraint per visible outgoing connection of `node` that has
/// one declared. Connections without a constraint are left unguarded.
pub(super) fn compile_constraints(
    cx: &mut CompileContext<'_>,
    node: &NodeDefinition,
    constraints: &[Constraint],
) -> Result<(), CompileError> {
    for connection in cx.outgoing(&node.id) {
        let Some(constraint) = constraints
            .iter()
            .find(|c| c.connection_id == connection.id)
        else {
            continue;
        };
        let dialect = check_language(&node.id, "constraint dialect", &constraint.dialect)?;
        if !constraint.default {
            Validator::of("Constraint", &constraint.connection_id)
                .not_empty("expression", &constraint.expression)
                .validate()?;
        }
        cx.field(NodeField::Constraint(CompiledConstraint {
            connection_id: connection.id.clone(),
            to: connection.to.clone(),
            name: constraint.name.clone(),
            dialect: dialect.to_string(),
            expression: constraint.expression.clone(),
            priority: constraint.priority,
            default: constraint.default,
        }));
    }
    Ok(())
}

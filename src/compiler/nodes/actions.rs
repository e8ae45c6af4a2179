use super::{emit_producer, producer_kind, unexpected_kind};
use crate::compiler::associations::check_language;
use crate::compiler::context::CompileContext;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::{CompiledAction, NodeField, VariableBinding};
use crate::process::{Action, NodeDefinition, NodeKind};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier regex must compile"));

pub(super) fn compile_action<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::Action { action } = &node.kind else {
        return Err(unexpected_kind(node, "action node"));
    };

    let producer = producer_kind(node)?;
    cx.begin_node(node, "Script");
    match (action, producer) {
        (Action::ThrowCompensation { activity_ref }, _) => {
            let event = match activity_ref.as_deref().filter(|r| !r.is_empty()) {
                Some(activity) => activity.to_string(),
                None => format!("implicit:compensation:{}", cx.process_id()),
            };
            cx.field(NodeField::Action(CompiledAction::ThrowCompensation { event }));
        }
        (
            Action::Expression {
                language,
                expression,
            },
            _,
        ) => {
            let language = check_language(&node.id, "expression language", language)?;
            Validator::of("Expression Action", &node.id)
                .not_empty("expression", expression)
                .validate()?;
            cx.field(NodeField::Action(CompiledAction::Expression {
                language: language.to_string(),
                expression: expression.clone(),
            }));
        }
        (_, Some(kind)) => emit_producer(cx, node, kind)?,
        (Action::Script { dialect, script }, None) => {
            let dialect = check_language(&node.id, "script dialect", dialect)?;
            let bindings = script_bindings(cx, script);
            cx.field(NodeField::Action(CompiledAction::Script {
                dialect: dialect.to_string(),
                bindings,
                body: script.clone(),
            }));
        }
        (Action::Escalation { code }, None) => {
            Validator::of("Escalation Action", &node.id)
                .not_empty("escalation code", code)
                .validate()?;
            cx.field(NodeField::Action(CompiledAction::Escalation { code: code.clone() }));
        }
    }
    cx.close_node(node);
    Ok(())
}

/// Bindings for the visible variables a script reads, innermost scope first.
///
/// Member accesses such as `order.total` bind `order` only.
fn script_bindings(cx: &CompileContext<'_>, script: &str) -> Vec<VariableBinding> {
    let referenced: AHashSet<&str> = IDENTIFIER
        .find_iter(script)
        .filter(|m| !script[..m.start()].ends_with('.'))
        .filter(|m| {
            // Skip the tail of a longer token such as `1abc`.
            !script[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit())
        })
        .map(|m| m.as_str())
        .collect();

    cx.visible_variables()
        .into_iter()
        .filter(|variable| referenced.contains(variable.name.as_str()))
        .map(|variable| VariableBinding {
            name: variable.name.clone(),
            data_type: variable.data_type.clone(),
        })
        .collect()
}

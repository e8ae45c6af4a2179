use super::{emit_mappings, unexpected_kind};
use crate::compiler::context::CompileContext;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::{CompiledRuleBinding, NodeField};
use crate::process::{NodeDefinition, NodeKind, RuleBinding, RuleLanguage};

pub(super) fn compile_rule_set<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::RuleSet(rule_set) = &node.kind else {
        return Err(unexpected_kind(node, "rule set node"));
    };

    let language =
        RuleLanguage::parse(&rule_set.language).ok_or_else(|| CompileError::UnsupportedFeature {
            node_id: node.id.clone(),
            feature: "rule language",
            value: rule_set.language.clone(),
        })?;
    let binding = compile_binding(cx, node, language, &rule_set.binding)?;

    cx.begin_node(node, "Rule");
    cx.field(NodeField::RuleBinding(binding));
    emit_mappings(cx, node, &rule_set.in_mappings, &rule_set.out_mappings)?;
    cx.close_node(node);
    Ok(())
}

/// Checks that the binding fits the rule language and that a rule unit is
/// known.
fn compile_binding(
    cx: &CompileContext<'_>,
    node: &NodeDefinition,
    language: RuleLanguage,
    binding: &RuleBinding,
) -> Result<CompiledRuleBinding, CompileError> {
    let mismatch = || CompileError::UnsupportedFeature {
        node_id: node.id.clone(),
        feature: "rule binding",
        value: format!("{} binding for {} rules", binding_kind(binding), language),
    };

    match (language, binding) {
        (RuleLanguage::Drl, RuleBinding::RuleFlowGroup { name }) => {
            Validator::of("Rule", &node.id)
                .not_empty("rule flow group", name)
                .validate()?;
            Ok(CompiledRuleBinding::RuleFlowGroup(name.clone()))
        }
        (RuleLanguage::Drl, RuleBinding::RuleUnit { name }) => {
            Validator::of("Rule", &node.id)
                .not_empty("rule unit", name)
                .validate()?;
            if !cx.catalog().knows_rule_unit(name) {
                return Err(CompileError::ReferenceResolution {
                    node_id: node.id.clone(),
                    reference: "rule unit",
                    name: name.clone(),
                });
            }
            Ok(CompiledRuleBinding::RuleUnit(name.clone()))
        }
        (
            RuleLanguage::Dmn,
            RuleBinding::Decision {
                namespace,
                model,
                decision,
            },
        ) => {
            Validator::of("Rule", &node.id)
                .not_empty("namespace", namespace)
                .not_empty("model", model)
                .validate()?;
            Ok(CompiledRuleBinding::Decision {
                namespace: namespace.clone(),
                model: model.clone(),
                decision: decision.clone().filter(|d| !d.is_empty()),
            })
        }
        _ => Err(mismatch()),
    }
}

fn binding_kind(binding: &RuleBinding) -> &'static str {
    match binding {
        RuleBinding::RuleFlowGroup { .. } => "rule flow group",
        RuleBinding::RuleUnit { .. } => "rule unit",
        RuleBinding::Decision { .. } => "decision",
    }
}

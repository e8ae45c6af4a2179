use crate::compiler::context::CompileContext;
use crate::compiler::metadata::{Correlation, TriggerKind, TriggerMetaData};
use crate::compiler::naming::strip_expression;
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::NodeField;
use crate::process::NodeDefinition;
use crate::process::metadata_keys::{
    CORRELATION_ATTRIBUTE, CORRELATION_EXPRESSION, CUSTOM_SCOPE, DATA_ONLY,
    DEFAULT_TRIGGER_SCOPE, MESSAGE_TYPE, TRIGGER_REF, TRIGGER_TYPE,
};

impl TriggerMetaData {
    /// Builds the trigger of a node from its metadata.
    ///
    /// `mapping_variable` names the process variable receiving (or providing)
    /// the payload. `default_kind` applies when the node carries no
    /// `TriggerType`, e.g. for a start event whose kind already says it.
    pub fn of(
        node: &NodeDefinition,
        cx: &CompileContext<'_>,
        mapping_variable: Option<&str>,
        default_kind: Option<TriggerKind>,
    ) -> Result<Self, CompileError> {
        let kind = match node.meta_str(TRIGGER_TYPE) {
            Some(raw) => TriggerKind::parse(raw).ok_or_else(|| CompileError::UnsupportedFeature {
                node_id: node.id.clone(),
                feature: "trigger type",
                value: raw.to_string(),
            })?,
            None => Validator::of(node.kind.type_name(), &node.id)
                .required("trigger type", default_kind)?,
        };

        let model_ref = mapping_variable
            .map(strip_expression)
            .filter(|name| !name.is_empty());
        let variable = match model_ref {
            Some(name) => {
                // `order.customer` binds the payload into a field of `order`.
                let root = name.split('.').next().unwrap_or(name);
                Some(cx.find_variable(root).ok_or_else(|| {
                    CompileError::ReferenceResolution {
                        node_id: node.id.clone(),
                        reference: "variable",
                        name: name.to_string(),
                    }
                })?)
            }
            None => None,
        };

        let data_type = node
            .meta_str(MESSAGE_TYPE)
            .map(str::to_string)
            .or_else(|| variable.map(|v| v.data_type.clone()))
            .unwrap_or_default();

        let correlation = node
            .meta_str(CORRELATION_ATTRIBUTE)
            .map(|attribute| Correlation {
                attribute: attribute.to_string(),
                expression: node.meta_str(CORRELATION_EXPRESSION).map(str::to_string),
            });

        TriggerMetaData {
            name: node.meta_str(TRIGGER_REF).unwrap_or_default().to_string(),
            kind,
            data_type,
            model_ref: model_ref.map(str::to_string),
            owner_id: cx.owner_id(&node.id),
            data_only: node.meta_bool(DATA_ONLY).unwrap_or(true),
            scope: node
                .meta_str(CUSTOM_SCOPE)
                .unwrap_or(DEFAULT_TRIGGER_SCOPE)
                .to_string(),
            correlation,
        }
        .validate()
    }

    /// The node field announcing this trigger to the runtime.
    pub fn to_field(&self) -> NodeField {
        NodeField::Trigger {
            name: self.name.clone(),
            kind: self.kind,
            owner_id: self.owner_id.clone(),
            data_type: self.data_type.clone(),
            model_ref: self.model_ref.clone(),
        }
    }

    /// The payload type registered for the trigger's signal, if known.
    pub fn payload_type(&self) -> Option<String> {
        Some(self.data_type.clone()).filter(|t| !t.is_empty())
    }
}

//! Well-known node metadata keys read by the compiler.

pub const TRIGGER_REF: &str = "TriggerRef";
pub const TRIGGER_TYPE: &str = "TriggerType";
pub const MESSAGE_TYPE: &str = "MessageType";
/// Variable receiving the payload of a consumed message or signal.
pub const TRIGGER_MAPPING: &str = "TriggerMapping";
/// Variable providing the payload of a produced message or signal.
pub const TRIGGER_MAPPING_INPUT: &str = "TriggerMappingInput";
pub const CUSTOM_SCOPE: &str = "customScope";
pub const DATA_ONLY: &str = "DataOnly";
pub const CORRELATION_ATTRIBUTE: &str = "correlationAttribute";
pub const CORRELATION_EXPRESSION: &str = "correlationExpression";

pub const DEFAULT_TRIGGER_SCOPE: &str = "processInstance";

/// Keys with this prefix are written by the model builder for its own use.
pub const BPMN_PREFIX: &str = "BPMN.";
pub const INTERNAL_PREFIX: &str = "_";
pub const CUSTOM_PREFIX: &str = "custom";

/// Whether a metadata key is carried into the compiled model.
///
/// Builder-internal keys are dropped unless they are explicitly marked custom,
/// e.g. `BPMN.customAsync`.
pub fn is_exported(key: &str) -> bool {
    match key.strip_prefix(BPMN_PREFIX) {
        Some(rest) => rest.starts_with(CUSTOM_PREFIX),
        None => !key.starts_with(INTERNAL_PREFIX),
    }
}

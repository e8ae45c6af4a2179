use crate::compiler::metadata::TriggerMetaData;
use thiserror::Error;

/// Errors that can occur while compiling a process definition.
///
/// Every variant names the offending node so the message can be shown to the
/// process author verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownNodeKind { node_id: String, type_name: String },

    #[error("Node id '{node_id}' is declared more than once in '{container}'")]
    DuplicateNodeId { container: String, node_id: String },

    #[error("Invalid parameters for {node_type} \"{node_id}\": {}", .problems.join(", "))]
    InvalidParameters {
        node_type: String,
        node_id: String,
        problems: Vec<String>,
    },

    #[error("{family} trigger information is not complete: {trigger}")]
    IncompleteTrigger {
        family: &'static str,
        trigger: Box<TriggerMetaData>,
    },

    #[error("Node '{node_id}' references {reference} '{name}', which cannot be found")]
    ReferenceResolution {
        node_id: String,
        reference: &'static str,
        name: String,
    },

    #[error("Node '{node_id}' uses an unsupported {feature}: '{value}'")]
    UnsupportedFeature {
        node_id: String,
        feature: &'static str,
        value: String,
    },
}

/// Errors that can occur when saving or loading a compiled process model.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),

    #[error("Could not access file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors that can occur when converting a custom user format into a `ProcessDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ProcessConversionError {
    #[error("Failed to parse process JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

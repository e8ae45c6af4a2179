use super::definition::ProcessDefinition;
use crate::error::ProcessConversionError;

/// A trait for custom process models that can be converted into a nagare `ProcessDefinition`.
///
/// This is the extension point that keeps the compiler independent of any
/// particular authoring format. Implement it on the structs your own parser
/// produces (BPMN XML, YAML, a database row set, ...) and hand the result to
/// `ProcessCompiler::compile`.
///
/// # Example
///
/// ```rust,no_run
/// use nagare::error::ProcessConversionError;
/// use nagare::process::{IntoProcess, NodeDefinition, NodeKind, ProcessDefinition};
///
/// // 1. Define your custom structs for parsing your format.
/// struct MyStep { id: String, last: bool }
/// struct MyWorkflow { key: String, steps: Vec<MyStep> }
///
/// // 2. Implement `IntoProcess` for your top-level struct.
/// impl IntoProcess for MyWorkflow {
///     fn into_process(self) -> Result<ProcessDefinition, ProcessConversionError> {
///         if self.key.is_empty() {
///             return Err(ProcessConversionError::ValidationError("missing key".into()));
///         }
///         let mut process = ProcessDefinition::new(&self.key, &self.key);
///         for step in self.steps {
///             let kind = if step.last {
///                 NodeKind::End { terminate: false }
///             } else {
///                 NodeKind::Start { interrupting: true, event: None }
///             };
///             process.nodes.push(NodeDefinition::new(&step.id, "", kind));
///         }
///         Ok(process)
///     }
/// }
/// ```
pub trait IntoProcess {
    /// Consumes the object and converts it into a compilable process definition.
    fn into_process(self) -> Result<ProcessDefinition, ProcessConversionError>;
}

impl ProcessDefinition {
    /// Parses a process definition from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ProcessConversionError> {
        serde_json::from_str(json).map_err(|e| ProcessConversionError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ProcessConversionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProcessConversionError::JsonParseError(e.to_string()))
    }
}

impl IntoProcess for ProcessDefinition {
    fn into_process(self) -> Result<ProcessDefinition, ProcessConversionError> {
        Ok(self)
    }
}

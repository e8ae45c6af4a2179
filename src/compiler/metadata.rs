use crate::compiler::naming::{artifact_handle, extract_process_id};
use crate::error::CompileError;
use crate::process::ProcessDefinition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    ConsumeMessage,
    ProduceMessage,
    ConsumeSignal,
    ProduceSignal,
}

impl TriggerKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ConsumeMessage" => Some(Self::ConsumeMessage),
            "ProduceMessage" => Some(Self::ProduceMessage),
            "ConsumeSignal" | "Signal" => Some(Self::ConsumeSignal),
            "ProduceSignal" => Some(Self::ProduceSignal),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::ConsumeMessage | Self::ProduceMessage)
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, Self::ProduceMessage | Self::ProduceSignal)
    }

    /// "Message" or "Signal".
    pub fn family(&self) -> &'static str {
        if self.is_message() { "Message" } else { "Signal" }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Routes an incoming message to an instance by matching one of its
/// attributes against an expression over process data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub attribute: String,
    pub expression: Option<String>,
}

/// A compiled binding between a node and an external message or signal channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerMetaData {
    pub name: String,
    pub kind: TriggerKind,
    pub data_type: String,
    pub model_ref: Option<String>,
    pub owner_id: String,
    pub data_only: bool,
    pub scope: String,
    pub correlation: Option<Correlation>,
}

impl TriggerMetaData {
    /// Message triggers need a name and a data type; signal triggers only a name.
    pub fn validate(self) -> Result<Self, CompileError> {
        let complete = if self.kind.is_message() {
            !self.name.is_empty() && !self.data_type.is_empty()
        } else {
            !self.name.is_empty()
        };
        if complete {
            Ok(self)
        } else {
            Err(CompileError::IncompleteTrigger {
                family: self.kind.family(),
                trigger: Box::new(self),
            })
        }
    }
}

impl fmt::Display for TriggerMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TriggerMetaData {{ name: '{}', kind: {}, dataType: '{}', modelRef: {}, ownerId: '{}', dataOnly: {}, scope: '{}', correlation: ",
            self.name,
            self.kind,
            self.data_type,
            self.model_ref.as_deref().unwrap_or("none"),
            self.owner_id,
            self.data_only,
            self.scope,
        )?;
        match &self.correlation {
            Some(c) => write!(
                f,
                "{} = {} }}",
                c.attribute,
                c.expression.as_deref().unwrap_or("?")
            ),
            None => write!(f, "none }}"),
        }
    }
}

/// Describes an external service call a handler must be generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemBinding {
    /// The handler name the work item is registered under.
    pub work_name: String,
    pub node_id: String,
    pub interface: String,
    pub operation: String,
    pub parameter_types: Vec<String>,
}

/// The side record of a compilation, consumed by deployment and runtime
/// registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetaData {
    pub process_id: String,
    pub extracted_process_id: String,
    pub name: String,
    pub version: Option<String>,
    pub artifact_handle: String,
    pub work_items: BTreeSet<String>,
    pub signals: BTreeMap<String, Option<String>>,
    pub triggers: Vec<TriggerMetaData>,
    pub sub_processes: BTreeMap<String, String>,
    pub startable: bool,
    pub work_item_bindings: Vec<WorkItemBinding>,
}

impl ProcessMetaData {
    pub fn new(process: &ProcessDefinition) -> Self {
        let extracted_process_id = extract_process_id(&process.id, process.version.as_deref());
        Self {
            process_id: process.id.clone(),
            artifact_handle: artifact_handle(&extracted_process_id),
            extracted_process_id,
            name: process.name.clone(),
            version: process.version.clone(),
            work_items: BTreeSet::new(),
            signals: BTreeMap::new(),
            triggers: Vec::new(),
            sub_processes: BTreeMap::new(),
            startable: false,
            work_item_bindings: Vec::new(),
        }
    }

    pub fn add_work_item(&mut self, name: impl Into<String>) {
        self.work_items.insert(name.into());
    }

    /// Registers a signal. A later registration can fill in a payload type
    /// but never replaces a known one.
    pub fn add_signal(&mut self, name: impl Into<String>, payload_type: Option<String>) {
        let entry = self.signals.entry(name.into()).or_insert(None);
        if entry.is_none() {
            *entry = payload_type;
        }
    }

    pub fn add_trigger(&mut self, trigger: TriggerMetaData) {
        self.triggers.push(trigger);
    }

    pub fn add_sub_process(&mut self, process_id: impl Into<String>, reference: impl Into<String>) {
        self.sub_processes.insert(process_id.into(), reference.into());
    }

    pub fn add_work_item_binding(&mut self, binding: WorkItemBinding) {
        if !self
            .work_item_bindings
            .iter()
            .any(|b| b.work_name == binding.work_name)
        {
            self.work_item_bindings.push(binding);
        }
    }
}

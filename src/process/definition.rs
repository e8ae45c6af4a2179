use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata attached to processes, nodes and variables.
pub type Metadata = BTreeMap<String, serde_json::Value>;

fn default_true() -> bool {
    true
}

fn default_object_type() -> String {
    "Object".to_string()
}

/// The complete, canonical definition of a process, ready for compilation.
/// This is the target structure for any custom process format conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub variables: VariableScope,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub connections: Vec<ConnectionDefinition>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub globals: Vec<Global>,
}

impl ProcessDefinition {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }
}

/// A global binding made available to the process by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Global {
    pub name: String,
    pub data_type: String,
}

/// Defines a single node (activity, gateway or event) of a process graph.
///
/// The node id is only unique within its immediate container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NodeDefinition {
    pub fn new(id: &str, name: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Reads a metadata entry as a string, treating empty strings as absent.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn meta_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// The kind of a node together with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    Start {
        #[serde(default = "default_true")]
        interrupting: bool,
        #[serde(default)]
        event: Option<StartEvent>,
    },
    End {
        #[serde(default)]
        terminate: bool,
    },
    Action {
        action: Action,
    },
    Split {
        gateway: SplitKind,
        #[serde(default)]
        constraints: Vec<Constraint>,
    },
    Join {
        gateway: JoinKind,
    },
    HumanTask(HumanTask),
    WorkItem(WorkItem),
    SubProcess(SubProcess),
    ForEach(ForEach),
    Container(Container),
    Timer {
        timer: Timer,
    },
    Milestone {
        condition: String,
        #[serde(default)]
        match_variable: Option<String>,
    },
    Fault {
        #[serde(default)]
        fault_name: Option<String>,
        #[serde(default)]
        fault_variable: Option<String>,
        #[serde(default = "default_true")]
        terminate_parent: bool,
    },
    RuleSet(RuleSet),
    BoundaryEvent(BoundaryEvent),
    Event(CatchEvent),
    /// A node kind unknown to the built-in compilers. It only compiles when a
    /// compiler for `type_name` has been registered.
    Custom {
        type_name: String,
        #[serde(default)]
        properties: Metadata,
    },
}

impl NodeKind {
    /// The runtime type name used to look up the node's compiler.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Start { .. } => "StartNode",
            NodeKind::End { .. } => "EndNode",
            NodeKind::Action { .. } => "ActionNode",
            NodeKind::Split { .. } => "Split",
            NodeKind::Join { .. } => "Join",
            NodeKind::HumanTask(_) => "HumanTaskNode",
            NodeKind::WorkItem(_) => "WorkItemNode",
            NodeKind::SubProcess(_) => "SubProcessNode",
            NodeKind::ForEach(_) => "ForEachNode",
            NodeKind::Container(container) => container.kind.type_name(),
            NodeKind::Timer { .. } => "TimerNode",
            NodeKind::Milestone { .. } => "MilestoneNode",
            NodeKind::Fault { .. } => "FaultNode",
            NodeKind::RuleSet(_) => "RuleSetNode",
            NodeKind::BoundaryEvent(_) => "BoundaryEventNode",
            NodeKind::Event(_) => "EventNode",
            NodeKind::Custom { type_name, .. } => type_name,
        }
    }

    /// The nested graph of container kinds.
    pub fn subgraph(&self) -> Option<&SubGraph> {
        match self {
            NodeKind::Container(container) => Some(&container.graph),
            NodeKind::ForEach(for_each) => Some(&for_each.graph),
            _ => None,
        }
    }
}

/// The event that starts a process or an event sub-process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StartEvent {
    Timer { timer: Timer },
    Signal,
    Message,
    Error { code: String },
    Escalation { code: String },
    Compensation,
    Conditional { expression: String },
}

/// The kind of event a boundary or intermediate catch event waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Signal,
    Message,
    Timer,
    Error,
    Escalation,
    Compensation,
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    Script {
        dialect: String,
        script: String,
    },
    /// An action whose behaviour is supplied by an expression language at runtime.
    Expression {
        language: String,
        expression: String,
    },
    /// Throws compensation, either for one activity or for the whole process.
    ThrowCompensation {
        #[serde(default)]
        activity_ref: Option<String>,
    },
    Escalation {
        code: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitKind {
    Parallel,
    Exclusive,
    Inclusive,
    EventBased,
}

impl SplitKind {
    pub fn code(&self) -> u8 {
        match self {
            SplitKind::Parallel => 1,
            SplitKind::Exclusive => 2,
            SplitKind::Inclusive => 3,
            SplitKind::EventBased => 4,
        }
    }

    /// Whether outgoing connections of this gateway carry constraints.
    pub fn is_conditional(&self) -> bool {
        matches!(self, SplitKind::Exclusive | SplitKind::Inclusive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JoinKind {
    Parallel,
    Exclusive,
    Discriminator,
    NOfM { threshold: String },
    Inclusive,
}

impl JoinKind {
    pub fn code(&self) -> u8 {
        match self {
            JoinKind::Parallel => 1,
            JoinKind::Exclusive => 2,
            JoinKind::Discriminator => 3,
            JoinKind::NOfM { .. } => 4,
            JoinKind::Inclusive => 5,
        }
    }
}

/// A condition guarding one outgoing connection of a split or state node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub connection_id: String,
    #[serde(default)]
    pub name: String,
    pub dialect: String,
    pub expression: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub default: bool,
}

/// Describes a unit of delegated execution: a human task or a service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
}

impl Work {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.insert(name.to_string(), value.to_string());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default = "default_object_type")]
    pub data_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanTask {
    pub work: Work,
    #[serde(default)]
    pub swimlane: Option<String>,
    #[serde(default)]
    pub in_associations: Vec<DataAssociation>,
    #[serde(default)]
    pub out_associations: Vec<DataAssociation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub work: Work,
    #[serde(default)]
    pub in_associations: Vec<DataAssociation>,
    #[serde(default)]
    pub out_associations: Vec<DataAssociation>,
}

/// A variable-name mapping between a node and its surrounding scope.
///
/// For input mappings `source` is the enclosing-scope side; for output
/// mappings `target` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMapping {
    pub source: String,
    pub target: String,
}

impl DataMapping {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProcess {
    pub process_id: String,
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default = "default_true")]
    pub wait_for_completion: bool,
    #[serde(default = "default_true")]
    pub independent: bool,
    #[serde(default)]
    pub in_mappings: Vec<DataMapping>,
    #[serde(default)]
    pub out_mappings: Vec<DataMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForEach {
    pub collection_expression: String,
    pub variable: Variable,
    #[serde(default)]
    pub output_collection_expression: Option<String>,
    #[serde(default)]
    pub output_variable: Option<Variable>,
    #[serde(default)]
    pub completion_condition: Option<String>,
    pub linked_incoming: String,
    pub linked_outgoing: String,
    #[serde(default)]
    pub graph: SubGraph,
}

/// The nested graph held by every container kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubGraph {
    #[serde(default)]
    pub variables: VariableScope,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub connections: Vec<ConnectionDefinition>,
}

/// A node holding its own sub-graph. The container kinds share this record
/// and only differ in their `kind` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub kind: ContainerKind,
    #[serde(default = "default_true")]
    pub autocomplete: bool,
    #[serde(default)]
    pub graph: SubGraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContainerKind {
    Composite,
    Dynamic {
        #[serde(default)]
        activation: Option<String>,
        #[serde(default)]
        completion: Option<String>,
    },
    State {
        #[serde(default)]
        constraints: Vec<Constraint>,
    },
    EventSubProcess {
        #[serde(default)]
        keep_active: bool,
        #[serde(default)]
        events: Vec<String>,
    },
}

impl ContainerKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ContainerKind::Composite => "CompositeContextNode",
            ContainerKind::Dynamic { .. } => "DynamicNode",
            ContainerKind::State { .. } => "StateNode",
            ContainerKind::EventSubProcess { .. } => "EventSubProcessNode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeType {
    Duration,
    Cycle,
    Date,
}

impl TimeType {
    pub fn code(&self) -> u8 {
        match self {
            TimeType::Duration => 1,
            TimeType::Cycle => 2,
            TimeType::Date => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub time_type: TimeType,
    #[serde(default)]
    pub delay: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Timer {
    pub fn duration(delay: &str) -> Self {
        Self {
            time_type: TimeType::Duration,
            delay: Some(delay.to_string()),
            period: None,
            date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub language: String,
    pub binding: RuleBinding,
    #[serde(default)]
    pub in_mappings: Vec<DataMapping>,
    #[serde(default)]
    pub out_mappings: Vec<DataMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RuleBinding {
    RuleFlowGroup {
        name: String,
    },
    RuleUnit {
        name: String,
    },
    Decision {
        namespace: String,
        model: String,
        #[serde(default)]
        decision: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryEvent {
    pub event_type: String,
    pub kind: EventKind,
    pub attached_to: String,
    #[serde(default = "default_true")]
    pub cancel_activity: bool,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub variable_name: Option<String>,
}

/// An intermediate event that waits for a signal or message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchEvent {
    pub event_type: String,
    pub kind: EventKind,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub variable_name: Option<String>,
}

/// Defines a directed edge between two nodes of the same container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefinition {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Set on edges synthesized by the model builder (e.g. compensation).
    #[serde(default)]
    pub hidden: bool,
}

impl ConnectionDefinition {
    pub fn new(id: &str, from: &str, to: &str) -> Self {
        Self {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            hidden: false,
        }
    }
}

/// Named, typed data slots visible to a container and its descendants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableScope {
    variables: Vec<Variable>,
}

impl VariableScope {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    pub fn push(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

impl FromIterator<Variable> for VariableScope {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default = "default_object_type")]
    pub data_type: String,
    #[serde(default)]
    pub tags: Vec<VariableTag>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Variable {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            tags: Vec::new(),
            default_value: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_tag(mut self, tag: VariableTag) -> Self {
        self.tags.push(tag);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableTag {
    Internal,
    Input,
    Output,
    Required,
    Readonly,
    Custom(String),
}

impl VariableTag {
    pub fn as_str(&self) -> &str {
        match self {
            VariableTag::Internal => "internal",
            VariableTag::Input => "input",
            VariableTag::Output => "output",
            VariableTag::Required => "required",
            VariableTag::Readonly => "readonly",
            VariableTag::Custom(tag) => tag,
        }
    }
}

/// A mapping from one or more source data items to a target, optionally
/// transformed or assigned field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAssociation {
    pub sources: Vec<DataDefinition>,
    pub target: DataDefinition,
    #[serde(default)]
    pub transformation: Option<Transformation>,
    #[serde(default)]
    pub assignments: Option<Vec<Assignment>>,
}

impl DataAssociation {
    pub fn new(source: DataDefinition, target: DataDefinition) -> Self {
        Self {
            sources: vec![source],
            target,
            transformation: None,
            assignments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_object_type")]
    pub data_type: String,
    #[serde(default)]
    pub expression: Option<String>,
}

impl DataDefinition {
    pub fn new(id: &str, data_type: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            data_type: data_type.to_string(),
            expression: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub language: String,
    pub expression: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub dialect: String,
    pub from: String,
    pub to: String,
}

use crate::compiler::metadata::TriggerKind;
use crate::model::Value;
use crate::process::{Assignment, DataDefinition, Transformation};
use serde::{Deserialize, Serialize};

/// One step of the compiled process model.
///
/// The runtime replays instructions in order: a `BeginNode` opens a node,
/// the following `Name`/`Field`/`Meta`/association instructions configure it,
/// and `Done` closes it. Nodes of a container appear between the container's
/// `BeginNode` and its `Done`, followed by the container's connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    // Process level
    Header(ProcessHeader),
    Import(String),
    Global { name: String, data_type: String },
    ProcessMeta { key: String, value: Value },
    Variable(VariableDecl),

    // Node lifecycle
    BeginNode { id: String, node_type: String },
    Name(String),
    Field(NodeField),
    Meta { key: String, value: Value },
    InAssociation(CompiledAssociation),
    OutAssociation(CompiledAssociation),
    Done,

    // Control edges
    Connection(CompiledConnection),

    // End of the model
    EndProcess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHeader {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub package: Option<String>,
    pub visibility: String,
    pub dynamic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub data_type: String,
    pub default_value: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Vec<(String, Value)>,
}

/// Kind-specific configuration of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeField {
    // Events
    Interrupting(bool),
    Terminate(bool),
    Timer(CompiledTimer),
    Trigger {
        name: String,
        kind: TriggerKind,
        owner_id: String,
        data_type: String,
        model_ref: Option<String>,
    },
    EventSignal(String),
    EventType(String),
    AttachedTo(String),
    Scope(Option<String>),
    VariableName(String),
    CancelActivity(bool),

    // Actions
    Action(CompiledAction),

    // Gateways
    GatewayType(u8),
    JoinThreshold(String),
    Constraint(CompiledConstraint),

    // Work items
    WorkName(String),
    WorkParameter { name: String, value: String },
    ParameterDefinition { name: String, data_type: String },
    Swimlane(String),

    // Sub-processes and rule sets
    ProcessId(String),
    ProcessName(String),
    WaitForCompletion(bool),
    Independent(bool),
    InMapping { source: String, target: String },
    OutMapping { source: String, target: String },
    RuleBinding(CompiledRuleBinding),

    // Loops
    CollectionExpression(String),
    LoopVariable { name: String, data_type: String },
    OutputCollectionExpression(String),
    OutputVariable { name: String, data_type: String },
    CompletionCondition(String),
    LinkIncoming(String),
    LinkOutgoing(String),

    // Containers
    AutoComplete(bool),
    KeepActive(bool),
    Event(String),
    ActivationExpression(String),
    CompletionExpression(String),

    // Milestones and faults
    Condition(String),
    MatchVariable(String),
    FaultName(String),
    FaultVariable(String),
    TerminateParent(bool),

    /// Free-form property emitted by custom node compilers.
    Property { key: String, value: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTimer {
    pub time_type: u8,
    pub delay: Option<String>,
    pub period: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompiledAction {
    /// A script preceded by bindings for the variables it reads.
    Script {
        dialect: String,
        bindings: Vec<VariableBinding>,
        body: String,
    },
    Expression {
        language: String,
        expression: String,
    },
    ThrowCompensation {
        event: String,
    },
    Produce {
        trigger: String,
        kind: TriggerKind,
        owner_id: String,
        data_type: String,
        model_ref: Option<String>,
    },
    Escalation {
        code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledConstraint {
    pub connection_id: String,
    pub to: String,
    pub name: String,
    pub dialect: String,
    pub expression: String,
    pub priority: i32,
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompiledRuleBinding {
    RuleFlowGroup(String),
    RuleUnit(String),
    Decision {
        namespace: String,
        model: String,
        decision: Option<String>,
    },
}

/// A data association packaged for the runtime. Expressions are carried as
/// written; `None` marks an absent transformation or assignment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledAssociation {
    pub sources: Vec<DataDefinition>,
    pub target: DataDefinition,
    pub transformation: Option<Transformation>,
    pub assignments: Option<Vec<Assignment>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledConnection {
    pub id: String,
    pub from: String,
    pub to: String,
}

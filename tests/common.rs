//! Common test utilities for building process definitions.
use nagare::prelude::*;
use nagare::process::{Action, Container, ContainerKind, StartEvent};

/// Connects the given nodes in sequence, `c0`, `c1`, ...
#[allow(dead_code)]
pub fn chain(nodes: &[NodeDefinition]) -> Vec<ConnectionDefinition> {
    nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| ConnectionDefinition::new(&format!("c{}", i), &pair[0].id, &pair[1].id))
        .collect()
}

/// A process named after its id holding the given nodes, connected in sequence.
#[allow(dead_code)]
pub fn process_of(nodes: Vec<NodeDefinition>) -> ProcessDefinition {
    let mut process = ProcessDefinition::new("org.acme.orders", "Orders");
    process.connections = chain(&nodes);
    process.nodes = nodes;
    process
}

/// A graph holding the given nodes, connected in sequence.
#[allow(dead_code)]
pub fn graph_of(variables: Vec<Variable>, nodes: Vec<NodeDefinition>) -> SubGraph {
    SubGraph {
        variables: variables.into_iter().collect(),
        connections: chain(&nodes),
        nodes,
    }
}

#[allow(dead_code)]
pub fn start(id: &str) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::Start {
            interrupting: true,
            event: None,
        },
    )
}

#[allow(dead_code)]
pub fn start_with(id: &str, event: StartEvent) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::Start {
            interrupting: true,
            event: Some(event),
        },
    )
}

#[allow(dead_code)]
pub fn end(id: &str) -> NodeDefinition {
    NodeDefinition::new(id, "", NodeKind::End { terminate: false })
}

#[allow(dead_code)]
pub fn human_task(id: &str, work_name: &str) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::HumanTask(HumanTask {
            work: Work::new(work_name),
            ..HumanTask::default()
        }),
    )
}

#[allow(dead_code)]
pub fn service_task(id: &str, interface: &str, operation: &str) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::WorkItem(WorkItem {
            work: Work::new("Service Task")
                .with_parameter("Interface", interface)
                .with_parameter("Operation", operation),
            ..WorkItem::default()
        }),
    )
}

#[allow(dead_code)]
pub fn script(id: &str, body: &str) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::Action {
            action: Action::Script {
                dialect: "java".to_string(),
                script: body.to_string(),
            },
        },
    )
}

#[allow(dead_code)]
pub fn composite(id: &str, graph: SubGraph) -> NodeDefinition {
    NodeDefinition::new(
        id,
        "",
        NodeKind::Container(Container {
            kind: ContainerKind::Composite,
            autocomplete: true,
            graph,
        }),
    )
}

/// A start node consuming the signal `name` into `variable`.
#[allow(dead_code)]
pub fn signal_start(id: &str, name: &str, variable: Option<&str>) -> NodeDefinition {
    let node = start_with(id, StartEvent::Signal).with_metadata("TriggerRef", name);
    match variable {
        Some(variable) => node.with_metadata("TriggerMapping", variable),
        None => node,
    }
}

/// Compiles with the default compiler, panicking on failure.
#[allow(dead_code)]
pub fn compile(process: &ProcessDefinition) -> CompilationArtifacts {
    ProcessCompiler::default()
        .compile(process)
        .expect("Failed to compile")
}

/// Compiles with the default compiler, expecting failure.
#[allow(dead_code)]
pub fn compile_err(process: &ProcessDefinition) -> CompileError {
    ProcessCompiler::default()
        .compile(process)
        .expect_err("Compilation should fail")
}

/// The fields emitted directly for a node, excluding those of nested nodes.
#[allow(dead_code)]
pub fn fields<'a>(model: &'a CompiledProcess, node_id: &str) -> Vec<&'a NodeField> {
    let instructions = model.node(node_id).expect("node was not emitted");
    let mut depth = 0usize;
    let mut fields = Vec::new();
    for instruction in instructions {
        match instruction {
            Instruction::BeginNode { .. } => depth += 1,
            Instruction::Done => depth -= 1,
            Instruction::Field(field) if depth == 1 => fields.push(field),
            _ => {}
        }
    }
    fields
}

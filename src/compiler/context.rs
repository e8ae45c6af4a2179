use crate::compiler::catalog::ReferenceCatalog;
use crate::compiler::metadata::ProcessMetaData;
use crate::compiler::naming::escape_identifier;
use crate::compiler::registry::NodeRegistry;
use crate::compiler::validator::Validator;
use crate::compiler::variables::compile_scope;
use crate::error::CompileError;
use crate::model::{CompiledConnection, Instruction, NodeField, Value};
use crate::process::metadata_keys::is_exported;
use crate::process::{ConnectionDefinition, NodeDefinition, SubGraph, Variable};
use ahash::AHashSet;
use itertools::Itertools;
use tracing::{debug, trace};

/// One level of the container chain being compiled.
struct Frame<'a> {
    /// The container node, or `None` for the process itself.
    owner: Option<&'a NodeDefinition>,
    /// Variables declared at this level.
    variables: Vec<&'a Variable>,
    nodes: &'a [NodeDefinition],
    connections: &'a [ConnectionDefinition],
}

/// The state of a single compilation.
///
/// Holds the shared, read-only registry and catalog plus everything that is
/// accumulated while walking one process: the instruction buffer, the
/// metadata record, the set of declared variable names and the chain of
/// enclosing containers. A context is never shared between compilations.
pub struct CompileContext<'a> {
    registry: &'a NodeRegistry,
    catalog: &'a ReferenceCatalog,
    process_id: &'a str,
    metadata: ProcessMetaData,
    declared: AHashSet<String>,
    instructions: Vec<Instruction>,
    frames: Vec<Frame<'a>>,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        registry: &'a NodeRegistry,
        catalog: &'a ReferenceCatalog,
        process_id: &'a str,
        metadata: ProcessMetaData,
    ) -> Self {
        Self {
            registry,
            catalog,
            process_id,
            metadata,
            declared: AHashSet::new(),
            instructions: Vec::new(),
            frames: Vec::new(),
        }
    }

    // --- Emission ---

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn field(&mut self, field: NodeField) {
        self.emit(Instruction::Field(field));
    }

    /// Opens a node and emits its name, falling back to `default_name`.
    pub fn begin_node(&mut self, node: &NodeDefinition, default_name: &str) {
        self.emit(Instruction::BeginNode {
            id: node.id.clone(),
            node_type: node.kind.type_name().to_string(),
        });
        let name = if node.name.is_empty() {
            default_name
        } else {
            node.name.as_str()
        };
        self.emit(Instruction::Name(name.to_string()));
    }

    /// Emits the exported metadata entries of a node, in key order.
    pub fn emit_metadata(&mut self, node: &NodeDefinition) {
        for (key, value) in &node.metadata {
            if !is_exported(key) {
                trace!(node = %node.id, key = %key, "skipping internal metadata");
                continue;
            }
            match Value::from_json(value) {
                Some(value) => self.emit(Instruction::Meta {
                    key: key.clone(),
                    value,
                }),
                None => trace!(node = %node.id, key = %key, "skipping non-literal metadata"),
            }
        }
    }

    pub fn done(&mut self) {
        self.emit(Instruction::Done);
    }

    /// Emits the metadata of a node without nested content and closes it.
    pub fn close_node(&mut self, node: &NodeDefinition) {
        self.emit_metadata(node);
        self.done();
    }

    // --- Traversal ---

    /// Compiles a single node through the compiler registered for its type.
    pub fn compile_node(&mut self, node: &'a NodeDefinition) -> Result<(), CompileError> {
        let registry = self.registry;
        let type_name = node.kind.type_name();
        let compiler = registry
            .get(type_name)
            .ok_or_else(|| CompileError::UnknownNodeKind {
                node_id: node.id.clone(),
                type_name: type_name.to_string(),
            })?;
        debug!(node = %node.id, node_type = type_name, "compiling node");
        compiler.compile(node, self)
    }

    /// Compiles one level of the graph: its variable declarations, its nodes
    /// in declaration order and then its visible connections.
    pub fn compile_graph(
        &mut self,
        owner: Option<&'a NodeDefinition>,
        variables: Vec<&'a Variable>,
        nodes: &'a [NodeDefinition],
        connections: &'a [ConnectionDefinition],
    ) -> Result<(), CompileError> {
        let container = owner.map_or(self.process_id, |node| node.id.as_str());
        check_structure(container, nodes, connections)?;

        for declaration in compile_scope(variables.iter().copied(), &mut self.declared) {
            self.emit(Instruction::Variable(declaration));
        }

        self.frames.push(Frame {
            owner,
            variables,
            nodes,
            connections,
        });
        for node in nodes {
            self.compile_node(node)?;
        }
        for connection in connections {
            if connection.hidden {
                trace!(connection = %connection.id, "skipping hidden connection");
                continue;
            }
            self.emit(Instruction::Connection(CompiledConnection {
                id: connection.id.clone(),
                from: connection.from.clone(),
                to: connection.to.clone(),
            }));
        }
        self.frames.pop();
        Ok(())
    }

    /// Compiles the nested graph of a container node.
    ///
    /// `extra` holds variables the container declares outside its graph's
    /// scope, such as a loop variable. A container without variables of its
    /// own declares nothing and its nodes see the enclosing scopes.
    pub fn compile_subgraph(
        &mut self,
        owner: &'a NodeDefinition,
        graph: &'a SubGraph,
        extra: &[&'a Variable],
    ) -> Result<(), CompileError> {
        let variables = graph.variables.iter().chain(extra.iter().copied()).collect();
        self.compile_graph(Some(owner), variables, &graph.nodes, &graph.connections)
    }

    // --- Lookups ---

    /// Resolves a variable name against the enclosing scopes, innermost first.
    pub fn find_variable(&self, name: &str) -> Option<&'a Variable> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.variables.iter().copied())
            .find(|variable| variable.name == name)
    }

    /// Every variable visible from the current level, innermost scope first.
    /// A name shadowed by an inner scope is listed once.
    pub fn visible_variables(&self) -> Vec<&'a Variable> {
        let mut seen = AHashSet::new();
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.variables.iter().copied())
            .filter(|variable| seen.insert(variable.name.as_str()))
            .collect()
    }

    /// The scope-qualified id of a node at the current level: the escaped
    /// ids of the enclosing containers, outermost first, then the node's own,
    /// joined with `_`. Distinct scope paths always give distinct owner ids.
    pub fn owner_id(&self, node_id: &str) -> String {
        self.frames
            .iter()
            .filter_map(|frame| frame.owner)
            .map(|owner| escape_identifier(&owner.id))
            .chain(std::iter::once(escape_identifier(node_id)))
            .join("_")
    }

    /// A node of the current container.
    pub fn sibling(&self, node_id: &str) -> Option<&'a NodeDefinition> {
        let frame = self.frames.last()?;
        frame.nodes.iter().find(|node| node.id == node_id)
    }

    /// The visible connections leaving a node of the current container.
    pub fn outgoing(&self, node_id: &str) -> Vec<&'a ConnectionDefinition> {
        self.frames
            .last()
            .map(|frame| {
                frame
                    .connections
                    .iter()
                    .filter(|c| c.from == node_id && !c.hidden)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_top_level(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn process_id(&self) -> &'a str {
        self.process_id
    }

    pub fn catalog(&self) -> &'a ReferenceCatalog {
        self.catalog
    }

    pub fn metadata_mut(&mut self) -> &mut ProcessMetaData {
        &mut self.metadata
    }

    pub fn finish(self) -> (Vec<Instruction>, ProcessMetaData) {
        (self.instructions, self.metadata)
    }
}

/// Rejects empty or duplicate node ids and connections leaving the container.
fn check_structure(
    container: &str,
    nodes: &[NodeDefinition],
    connections: &[ConnectionDefinition],
) -> Result<(), CompileError> {
    let mut ids: AHashSet<&str> = AHashSet::with_capacity(nodes.len());
    for node in nodes {
        Validator::of(node.kind.type_name(), &node.id)
            .not_empty("node id", &node.id)
            .validate()?;
        if !ids.insert(node.id.as_str()) {
            return Err(CompileError::DuplicateNodeId {
                container: container.to_string(),
                node_id: node.id.clone(),
            });
        }
    }
    for connection in connections {
        for endpoint in [&connection.from, &connection.to] {
            if !ids.contains(endpoint.as_str()) {
                return Err(CompileError::ReferenceResolution {
                    node_id: connection.id.clone(),
                    reference: "connection endpoint",
                    name: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}

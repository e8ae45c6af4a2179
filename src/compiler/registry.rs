use crate::compiler::context::CompileContext;
use crate::compiler::nodes;
use crate::error::CompileError;
use crate::process::NodeDefinition;
use ahash::AHashMap;

/// Defines the contract for compiling one node type into instructions.
///
/// Implementations emit the node through the context, from `begin_node` to
/// `done`, and record whatever the node contributes to the process metadata.
pub trait NodeCompiler: Send + Sync {
    fn node_type(&self) -> &str;
    fn compile<'a>(
        &self,
        node: &'a NodeDefinition,
        cx: &mut CompileContext<'a>,
    ) -> Result<(), CompileError>;
}

/// Maps node type names to their compilers. Built once, then read-only.
#[derive(Default)]
pub struct NodeRegistry {
    compilers: AHashMap<String, Box<dyn NodeCompiler>>,
}

impl NodeRegistry {
    /// A registry holding a compiler for every built-in node kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        nodes::register_default_compilers(&mut registry);
        registry
    }

    /// Registers a compiler under its node type, replacing any previous one.
    pub fn register(&mut self, compiler: Box<dyn NodeCompiler>) {
        self.compilers
            .insert(compiler.node_type().to_string(), compiler);
    }

    pub fn get(&self, node_type: &str) -> Option<&dyn NodeCompiler> {
        self.compilers.get(node_type).map(|c| c.as_ref())
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.compilers.contains_key(node_type)
    }
}

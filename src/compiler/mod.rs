use crate::error::CompileError;
use crate::model::{CompiledProcess, Instruction, ProcessHeader, Value};
use crate::process::metadata_keys::is_exported;
use crate::process::ProcessDefinition;
use std::sync::Arc;
use tracing::{debug, info, info_span};

pub mod associations;
pub mod catalog;
pub mod context;
pub mod metadata;
pub mod naming;
mod nodes;
pub mod registry;
mod triggers;
pub mod validator;
pub mod variables;

pub use catalog::ReferenceCatalog;
pub use context::CompileContext;
pub use metadata::{ProcessMetaData, TriggerKind, TriggerMetaData, WorkItemBinding};
pub use registry::{NodeCompiler, NodeRegistry};
pub use validator::Validator;

/// The result of compiling one process.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationArtifacts {
    pub model: CompiledProcess,
    pub metadata: ProcessMetaData,
}

/// Compiles process definitions into executable models.
///
/// The compiler holds only read-only configuration, so one instance can be
/// shared across threads and compile many processes concurrently.
#[derive(Clone)]
pub struct ProcessCompiler {
    registry: Arc<NodeRegistry>,
    catalog: Arc<ReferenceCatalog>,
}

pub struct CompilerBuilder {
    registry: NodeRegistry,
    catalog: ReferenceCatalog,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::with_defaults(),
            catalog: ReferenceCatalog::default(),
        }
    }

    /// Registers a compiler for a custom node type, or replaces the compiler
    /// of a built-in one.
    pub fn with_custom_compiler(mut self, compiler: Box<dyn NodeCompiler>) -> Self {
        self.registry.register(compiler);
        self
    }

    /// Restricts call activities to the given process ids.
    pub fn with_process_catalog<I, S>(mut self, process_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = self.catalog.with_processes(process_ids);
        self
    }

    /// Restricts rule-set nodes to the given rule units.
    pub fn with_rule_unit_catalog<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = self.catalog.with_rule_units(units);
        self
    }

    pub fn build(self) -> ProcessCompiler {
        ProcessCompiler {
            registry: Arc::new(self.registry),
            catalog: Arc::new(self.catalog),
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ProcessCompiler {
    fn default() -> Self {
        CompilerBuilder::new().build()
    }
}

impl ProcessCompiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Compiles a process into its instruction stream and metadata record.
    ///
    /// Either the whole process compiles or the first error found is returned;
    /// no partial model is produced.
    pub fn compile(
        &self,
        process: &ProcessDefinition,
    ) -> Result<CompilationArtifacts, CompileError> {
        let span = info_span!("compile", process_id = %process.id);
        let _guard = span.enter();

        Self::validate_process(process)?;

        let mut cx = CompileContext::new(
            &self.registry,
            &self.catalog,
            &process.id,
            ProcessMetaData::new(process),
        );

        cx.emit(Instruction::Header(ProcessHeader {
            id: process.id.clone(),
            name: process.name.clone(),
            version: process.version.clone(),
            package: process.package.clone(),
            visibility: process.visibility.as_str().to_string(),
            dynamic: process.dynamic,
        }));
        for import in &process.imports {
            cx.emit(Instruction::Import(import.clone()));
        }
        for global in &process.globals {
            cx.emit(Instruction::Global {
                name: global.name.clone(),
                data_type: global.data_type.clone(),
            });
        }
        for (key, value) in &process.metadata {
            match Value::from_json(value).filter(|_| is_exported(key)) {
                Some(value) => cx.emit(Instruction::ProcessMeta {
                    key: key.clone(),
                    value,
                }),
                None => debug!(key = %key, "skipping process metadata"),
            }
        }

        cx.compile_graph(
            None,
            process.variables.iter().collect(),
            &process.nodes,
            &process.connections,
        )?;
        cx.emit(Instruction::EndProcess);

        let (instructions, metadata) = cx.finish();
        info!(
            instructions = instructions.len(),
            triggers = metadata.triggers.len(),
            "process compiled"
        );
        Ok(CompilationArtifacts {
            model: CompiledProcess::new(process.id.clone(), instructions),
            metadata,
        })
    }

    fn validate_process(process: &ProcessDefinition) -> Result<(), CompileError> {
        Validator::of("Process", &process.id)
            .not_empty("process id", &process.id)
            .validate()
    }
}

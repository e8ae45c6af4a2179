//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nagare crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/process.json")?;
//! let process = ProcessDefinition::from_json(&json)?;
//!
//! let artifacts = ProcessCompiler::default().compile(&process)?;
//! artifacts.model.save("orders.ngr")?;
//! println!("{}", serde_json::to_string_pretty(&artifacts.metadata)?);
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{
    CompilationArtifacts, CompileContext, CompilerBuilder, NodeCompiler, ProcessCompiler,
    ProcessMetaData, TriggerKind, TriggerMetaData, WorkItemBinding,
};

// Process definitions
pub use crate::process::{
    ConnectionDefinition, DataAssociation, DataDefinition, HumanTask, IntoProcess,
    NodeDefinition, NodeKind, ProcessDefinition, SubGraph, Variable, VariableScope, Work,
    WorkItem,
};

// Compiled model
pub use crate::model::visualizer::Listing;
pub use crate::model::{CompiledProcess, Instruction, NodeField};

// Error types
pub use crate::error::{ArtifactError, CompileError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

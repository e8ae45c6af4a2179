//! # Nagare - Process Definition Compiler
//!
//! **Nagare** compiles graph-shaped process (workflow) definitions into a flat,
//! executable instruction stream that a process engine replays to build its
//! in-memory process, together with a metadata record describing everything
//! the process binds to: work items, signals, message triggers and
//! sub-processes.
//!
//! ## Core Workflow
//!
//! The compiler is format-agnostic. It operates on a canonical model of a
//! process definition. The primary workflow is:
//!
//! 1.  **Load Your Data**: Parse your process format (BPMN, JSON, YAML, ...) into your own Rust structs.
//! 2.  **Convert to Nagare's Model**: Implement the `IntoProcess` trait for your structs, or deserialize a `ProcessDefinition` directly from JSON.
//! 3.  **Compile**: Use `ProcessCompiler::builder` to configure a compiler and compile the definition into a `CompiledProcess` plus its `ProcessMetaData`.
//! 4.  **Ship**: Save the compiled model with `CompiledProcess::save` and hand the metadata to your deployment tooling.
//!
//! ## Quick Start
//!
//! ```rust
//! use nagare::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut process = ProcessDefinition::new("org.acme.orders", "Orders");
//!     process.variables.push(Variable::new("order", "org.acme.Order"));
//!     process.nodes = vec![
//!         NodeDefinition::new("1", "", NodeKind::Start { interrupting: true, event: None }),
//!         NodeDefinition::new("2", "Review", NodeKind::HumanTask(HumanTask {
//!             work: Work::new("review"),
//!             ..HumanTask::default()
//!         })),
//!         NodeDefinition::new("3", "", NodeKind::End { terminate: false }),
//!     ];
//!     process.connections = vec![
//!         ConnectionDefinition::new("c1", "1", "2"),
//!         ConnectionDefinition::new("c2", "2", "3"),
//!     ];
//!
//!     let compiler = ProcessCompiler::builder().build();
//!     let artifacts = compiler.compile(&process)?;
//!
//!     assert!(artifacts.metadata.startable);
//!     assert!(artifacts.metadata.work_items.contains("review"));
//!     println!("{}", Listing(&artifacts.model));
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod model;
pub mod prelude;
pub mod process;

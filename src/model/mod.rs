//! The executable process model produced by the compiler.

pub mod artifact;
pub mod instruction;
pub mod value;
pub mod visualizer;

pub use instruction::*;
pub use value::Value;

use serde::{Deserialize, Serialize};

/// A compiled process: the flat instruction stream a runtime replays to
/// build its in-memory process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProcess {
    pub process_id: String,
    pub instructions: Vec<Instruction>,
}

impl CompiledProcess {
    pub fn new(process_id: String, instructions: Vec<Instruction>) -> Self {
        Self {
            process_id,
            instructions,
        }
    }

    /// All emitted connections, in emission order.
    pub fn connections(&self) -> impl Iterator<Item = &CompiledConnection> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Connection(c) => Some(c),
            _ => None,
        })
    }

    /// All emitted variable declarations, in emission order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDecl> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Variable(v) => Some(v),
            _ => None,
        })
    }

    /// Ids of all compiled nodes, in emission order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::BeginNode { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }

    /// The instructions configuring the first node with the given id, from
    /// its `BeginNode` up to and including its matching `Done`.
    pub fn node(&self, id: &str) -> Option<&[Instruction]> {
        let start = self
            .instructions
            .iter()
            .position(|i| matches!(i, Instruction::BeginNode { id: node_id, .. } if node_id == id))?;
        let mut depth = 0usize;
        for (offset, instruction) in self.instructions[start..].iter().enumerate() {
            match instruction {
                Instruction::BeginNode { .. } => depth += 1,
                Instruction::Done => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.instructions[start..=start + offset]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

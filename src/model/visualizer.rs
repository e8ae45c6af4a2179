use super::{CompiledProcess, Instruction, NodeField};
use itertools::Itertools;
use std::fmt;

/// Formats a `CompiledProcess` into a human-readable listing for debugging.
///
/// Nested nodes are indented under their container.
pub struct Listing<'a>(pub &'a CompiledProcess);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "======== PROCESS MODEL for: {} ========",
            self.0.process_id
        )?;

        let mut depth = 0usize;
        for (i, instruction) in self.0.instructions.iter().enumerate() {
            if matches!(instruction, Instruction::Done) {
                depth = depth.saturating_sub(1);
            }
            writeln!(
                f,
                "{:04}: {}{}",
                i,
                "  ".repeat(depth),
                describe(instruction)
            )?;
            if matches!(instruction, Instruction::BeginNode { .. }) {
                depth += 1;
            }
        }

        writeln!(f, "================ END OF MODEL ================")
    }
}

fn describe(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Header(header) => format!(
            "Header {} '{}' v{}",
            header.id,
            header.name,
            header.version.as_deref().unwrap_or("-")
        ),
        Instruction::Variable(var) => {
            let tags = if var.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", var.tags.iter().join(", "))
            };
            format!("Variable {}: {}{}", var.name, var.data_type, tags)
        }
        Instruction::BeginNode { id, node_type } => format!("{:<20} -> #{}", node_type, id),
        Instruction::Meta { key, value } => format!("Meta {} = {}", key, value),
        Instruction::Field(NodeField::Constraint(c)) => format!(
            "Constraint {:<12} -> #{} [{}] {}",
            c.connection_id, c.to, c.dialect, c.expression
        ),
        Instruction::Connection(c) => format!("Connection {:<10} #{} -> #{}", c.id, c.from, c.to),
        Instruction::InAssociation(a) | Instruction::OutAssociation(a) => {
            let direction = if matches!(instruction, Instruction::InAssociation(_)) {
                "In"
            } else {
                "Out"
            };
            format!(
                "{}Association [{}] -> {}",
                direction,
                a.sources.iter().map(|s| s.id.as_str()).join(", "),
                a.target.id
            )
        }
        // Default formatting for everything else.
        other => format!("{:?}", other),
    }
}

use crate::model::{Value, VariableDecl};
use crate::process::Variable;
use ahash::AHashSet;
use tracing::trace;

/// Compiles variable declarations for one scope.
///
/// `declared` holds every name already declared anywhere in the current
/// traversal; names found there are skipped and new names are added, so a
/// variable re-declared by a nested scope is emitted only once.
pub fn compile_scope<'v>(
    variables: impl IntoIterator<Item = &'v Variable>,
    declared: &mut AHashSet<String>,
) -> Vec<VariableDecl> {
    let mut declarations = Vec::new();
    for variable in variables {
        if !declared.insert(variable.name.clone()) {
            trace!(variable = %variable.name, "variable already declared in an enclosing scope");
            continue;
        }
        declarations.push(compile_variable(variable));
    }
    declarations
}

fn compile_variable(variable: &Variable) -> VariableDecl {
    VariableDecl {
        name: variable.name.clone(),
        data_type: variable.data_type.clone(),
        default_value: variable.default_value.clone(),
        tags: variable.tags.iter().map(|t| t.as_str().to_string()).collect(),
        metadata: variable
            .metadata
            .iter()
            .filter_map(|(k, v)| Value::from_json(v).map(|value| (k.clone(), value)))
            .collect(),
    }
}

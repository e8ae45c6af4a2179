use crate::error::CompileError;
use crate::model::CompiledAssociation;
use crate::process::{DataAssociation, ExpressionLanguage};

/// Packages the data associations of one node for the runtime, in order.
///
/// Transformations and assignments are not evaluated here; only their
/// languages are checked so an unsupported one fails at compile time.
pub fn compile_associations(
    node_id: &str,
    associations: &[DataAssociation],
) -> Result<Vec<CompiledAssociation>, CompileError> {
    associations
        .iter()
        .map(|association| compile_association(node_id, association))
        .collect()
}

fn compile_association(
    node_id: &str,
    association: &DataAssociation,
) -> Result<CompiledAssociation, CompileError> {
    if let Some(transformation) = &association.transformation {
        check_language(node_id, "transformation language", &transformation.language)?;
    }
    for assignment in association.assignments.iter().flatten() {
        check_language(node_id, "assignment dialect", &assignment.dialect)?;
    }

    Ok(CompiledAssociation {
        sources: association.sources.clone(),
        target: association.target.clone(),
        transformation: association.transformation.clone(),
        assignments: association.assignments.clone(),
    })
}

/// Fails with `UnsupportedFeature` unless `language` is an expression
/// language the runtime understands.
pub fn check_language(
    node_id: &str,
    feature: &'static str,
    language: &str,
) -> Result<ExpressionLanguage, CompileError> {
    ExpressionLanguage::parse(language).ok_or_else(|| CompileError::UnsupportedFeature {
        node_id: node_id.to_string(),
        feature,
        value: language.to_string(),
    })
}

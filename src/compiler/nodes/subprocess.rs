use super::{emit_mappings, unexpected_kind};
use crate::compiler::context::CompileContext;
use crate::compiler::naming::{artifact_handle, extract_process_id};
use crate::compiler::validator::Validator;
use crate::error::CompileError;
use crate::model::NodeField;
use crate::process::{NodeDefinition, NodeKind};

pub(super) fn compile_sub_process<'a>(
    node: &'a NodeDefinition,
    cx: &mut CompileContext<'a>,
) -> Result<(), CompileError> {
    let NodeKind::SubProcess(call) = &node.kind else {
        return Err(unexpected_kind(node, "sub-process node"));
    };

    Validator::of("Call Activity", &node.id)
        .not_empty("process id", &call.process_id)
        .validate()?;
    if !cx.catalog().knows_process(&call.process_id) {
        return Err(CompileError::ReferenceResolution {
            node_id: node.id.clone(),
            reference: "process",
            name: call.process_id.clone(),
        });
    }

    cx.begin_node(node, "Call Activity");
    cx.field(NodeField::ProcessId(call.process_id.clone()));
    if let Some(name) = call.process_name.as_deref().filter(|n| !n.is_empty()) {
        cx.field(NodeField::ProcessName(name.to_string()));
    }
    cx.field(NodeField::WaitForCompletion(call.wait_for_completion));
    cx.field(NodeField::Independent(call.independent));
    emit_mappings(cx, node, &call.in_mappings, &call.out_mappings)?;

    let handle = artifact_handle(&extract_process_id(&call.process_id, None));
    cx.metadata_mut()
        .add_sub_process(call.process_id.clone(), handle);
    cx.close_node(node);
    Ok(())
}

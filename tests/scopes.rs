//! Tests for variable scoping: declarations, shadowing and script bindings.
mod common;
use common::*;
use nagare::model::{CompiledAction, Value, VariableBinding};
use nagare::prelude::*;
use nagare::process::{ForEach, VariableTag};

fn declared_names(model: &CompiledProcess) -> Vec<&str> {
    model.variables().map(|v| v.name.as_str()).collect()
}

fn bindings(model: &CompiledProcess, node_id: &str) -> Vec<VariableBinding> {
    fields(model, node_id)
        .into_iter()
        .find_map(|field| match field {
            NodeField::Action(CompiledAction::Script { bindings, .. }) => Some(bindings.clone()),
            _ => None,
        })
        .expect("script action")
}

fn binding(name: &str, data_type: &str) -> VariableBinding {
    VariableBinding {
        name: name.to_string(),
        data_type: data_type.to_string(),
    }
}

#[test]
fn test_redeclared_variable_is_emitted_once() {
    let inner = graph_of(
        vec![Variable::new("x", "Integer"), Variable::new("y", "String")],
        vec![start("a"), end("b")],
    );
    let mut process = process_of(vec![start("1"), composite("5", inner), end("2")]);
    process.variables.push(Variable::new("x", "String"));

    let artifacts = compile(&process);
    assert_eq!(declared_names(&artifacts.model), vec!["x", "y"]);

    let x = artifacts.model.variables().next().unwrap();
    assert_eq!(x.data_type, "String");
}

#[test]
fn test_variables_are_declared_once_across_sibling_containers() {
    let first = graph_of(vec![Variable::new("tmp", "String")], vec![script("s", "")]);
    let second = graph_of(vec![Variable::new("tmp", "String")], vec![script("s", "")]);
    let process = process_of(vec![
        start("1"),
        composite("5", first),
        composite("6", second),
        end("2"),
    ]);

    let artifacts = compile(&process);
    assert_eq!(declared_names(&artifacts.model), vec!["tmp"]);
}

#[test]
fn test_nested_declarations_appear_inside_their_container() {
    let inner = graph_of(vec![Variable::new("local", "String")], vec![script("s", "")]);
    let process = process_of(vec![start("1"), composite("5", inner), end("2")]);

    let artifacts = compile(&process);
    let container = artifacts.model.node("5").unwrap();
    assert!(container.iter().any(|i| matches!(
        i,
        Instruction::Variable(v) if v.name == "local"
    )));
}

#[test]
fn test_variable_tags_and_metadata_are_compiled() {
    let mut variable = Variable::new("order", "org.acme.Order")
        .with_tag(VariableTag::Input)
        .with_tag(VariableTag::Custom("business-relevant".to_string()));
    variable.default_value = Some("{}".to_string());
    variable
        .metadata
        .insert("customTags".to_string(), "input".into());
    variable
        .metadata
        .insert("schema".to_string(), serde_json::json!({ "type": "object" }));

    let mut process = process_of(vec![start("1"), end("2")]);
    process.variables.push(variable);

    let artifacts = compile(&process);
    let decl = artifacts.model.variables().next().unwrap();
    assert_eq!(decl.tags, vec!["input", "business-relevant"]);
    assert_eq!(decl.default_value.as_deref(), Some("{}"));
    // Only literal metadata values are carried over.
    assert_eq!(
        decl.metadata,
        vec![("customTags".to_string(), Value::Text("input".to_string()))]
    );
}

#[test]
fn test_container_without_variables_sees_enclosing_scope() {
    let inner = graph_of(vec![], vec![script("s", "order.approve();")]);
    let mut process = process_of(vec![start("1"), composite("5", inner), end("2")]);
    process
        .variables
        .push(Variable::new("order", "org.acme.Order"));

    let artifacts = compile(&process);
    assert_eq!(
        bindings(&artifacts.model, "s"),
        vec![binding("order", "org.acme.Order")]
    );
}

#[test]
fn test_script_binds_only_referenced_variables() {
    let mut process = process_of(vec![
        start("1"),
        script("s", "total = order.total + count; // unused stays out"),
        end("2"),
    ]);
    process.variables = [
        Variable::new("order", "org.acme.Order"),
        Variable::new("count", "Integer"),
        Variable::new("unused_var", "String"),
        Variable::new("total", "Double"),
    ]
    .into_iter()
    .collect();

    let artifacts = compile(&process);
    assert_eq!(
        bindings(&artifacts.model, "s"),
        vec![
            binding("order", "org.acme.Order"),
            binding("count", "Integer"),
            binding("total", "Double"),
        ]
    );
}

#[test]
fn test_member_access_does_not_bind_field_names() {
    let mut process = process_of(vec![start("1"), script("s", "order.count += 1;"), end("2")]);
    process.variables = [
        Variable::new("order", "org.acme.Order"),
        Variable::new("count", "Integer"),
    ]
    .into_iter()
    .collect();

    let artifacts = compile(&process);
    assert_eq!(
        bindings(&artifacts.model, "s"),
        vec![binding("order", "org.acme.Order")]
    );
}

#[test]
fn test_inner_variable_shadows_outer_in_bindings() {
    let inner = graph_of(
        vec![Variable::new("amount", "Double")],
        vec![script("s", "amount * rate")],
    );
    let mut process = process_of(vec![start("1"), composite("5", inner), end("2")]);
    process.variables = [
        Variable::new("amount", "Integer"),
        Variable::new("rate", "Double"),
    ]
    .into_iter()
    .collect();

    let artifacts = compile(&process);
    // Innermost scope first; the process-level `amount` is hidden.
    assert_eq!(
        bindings(&artifacts.model, "s"),
        vec![binding("amount", "Double"), binding("rate", "Double")]
    );
}

fn for_each(graph: SubGraph) -> NodeDefinition {
    NodeDefinition::new(
        "loop",
        "",
        NodeKind::ForEach(ForEach {
            collection_expression: "#{items}".to_string(),
            variable: Variable::new("item", "org.acme.Item"),
            output_collection_expression: Some("results".to_string()),
            output_variable: Some(Variable::new("result", "String")),
            completion_condition: None,
            linked_incoming: "a".to_string(),
            linked_outgoing: "a".to_string(),
            graph,
        }),
    )
}

#[test]
fn test_loop_variables_are_declared_and_visible() {
    let body = graph_of(vec![], vec![script("a", "result = item.name();")]);
    let mut process = process_of(vec![start("1"), for_each(body), end("2")]);
    process.variables = [
        Variable::new("items", "java.util.List"),
        Variable::new("results", "java.util.List"),
    ]
    .into_iter()
    .collect();

    let artifacts = compile(&process);
    assert_eq!(
        declared_names(&artifacts.model),
        vec!["items", "results", "item", "result"]
    );
    assert_eq!(
        bindings(&artifacts.model, "a"),
        vec![binding("item", "org.acme.Item"), binding("result", "String")]
    );

    let loop_fields = fields(&artifacts.model, "loop");
    assert_eq!(
        loop_fields[0],
        &NodeField::CollectionExpression("items".to_string())
    );
    assert!(loop_fields.contains(&&NodeField::LoopVariable {
        name: "item".to_string(),
        data_type: "org.acme.Item".to_string(),
    }));
}

#[test]
fn test_loop_collection_must_resolve() {
    let body = graph_of(vec![], vec![script("a", "")]);
    let mut process = process_of(vec![start("1"), for_each(body), end("2")]);
    process
        .variables
        .push(Variable::new("results", "java.util.List"));

    match compile_err(&process) {
        CompileError::ReferenceResolution { name, .. } => assert_eq!(name, "items"),
        other => panic!("Expected ReferenceResolution error, got {:?}", other),
    }
}

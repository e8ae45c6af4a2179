//! Identifier helpers shared by the node compilers.

/// Replaces every character that is not alphanumeric or `_` with `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Encodes an id as an identifier segment without losing information.
///
/// Alphanumeric characters are kept. Every other character, `_` included,
/// becomes `__` followed by its code point as six hex digits, so a lone `_`
/// is free to separate segments: in a joined sequence of non-empty segments
/// a run of one underscore is a separator, two start an escape and three are
/// a separator followed by an escape.
///
/// ```
/// use nagare::compiler::naming::escape_identifier;
///
/// assert_eq!(escape_identifier("task7"), "task7");
/// assert_eq!(escape_identifier("a-b"), "a__00002db");
/// assert_eq!(escape_identifier("a_b"), "a__00005fb");
/// ```
pub fn escape_identifier(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_alphanumeric() {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("__{:06x}", c as u32));
        }
    }
    escaped
}

/// The short process id: the last dot-separated segment of the id, with the
/// version appended when present.
///
/// `org.acme.orders` with version `1.0` becomes `orders_1_0`.
pub fn extract_process_id(process_id: &str, version: Option<&str>) -> String {
    let short = process_id.rsplit('.').next().unwrap_or(process_id);
    match version.filter(|v| !v.is_empty()) {
        Some(version) => sanitize_identifier(&format!("{}_{}", short, version)),
        None => sanitize_identifier(short),
    }
}

/// The handle under which the compiled model of a process is registered,
/// e.g. `OrdersProcess`.
pub fn artifact_handle(extracted_process_id: &str) -> String {
    let mut chars = extracted_process_id.chars();
    match chars.next() {
        Some(first) => format!("{}{}Process", first.to_uppercase(), chars.as_str()),
        None => "Process".to_string(),
    }
}

/// The last segment of a dotted type name, e.g. `org.acme.OrderService` -> `OrderService`.
pub fn simple_type_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// Strips the `#{...}` wrapper of an expression, if any.
pub fn strip_expression(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed
        .strip_prefix("#{")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed)
}

/// Whether the text is a plain identifier rather than an expression.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

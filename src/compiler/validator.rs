use crate::error::CompileError;

/// Collects missing required fields of a single node and reports them
/// together.
///
/// ```
/// use nagare::compiler::validator::Validator;
///
/// let result = Validator::of("Service Task", "7")
///     .not_empty("interface name", "")
///     .not_empty("operation name", "approve")
///     .validate();
/// assert_eq!(
///     result.unwrap_err().to_string(),
///     "Invalid parameters for Service Task \"7\": interface name should not be empty"
/// );
/// ```
#[derive(Debug)]
pub struct Validator<'a> {
    node_type: &'a str,
    node_id: &'a str,
    problems: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn of(node_type: &'a str, node_id: &'a str) -> Self {
        Self {
            node_type,
            node_id,
            problems: Vec::new(),
        }
    }

    pub fn not_empty(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing(field)
        } else {
            self
        }
    }

    /// Like `not_empty`, for optional values. `None` counts as empty.
    pub fn present(self, field: &str, value: Option<&str>) -> Self {
        self.not_empty(field, value.unwrap_or_default())
    }

    /// Unwraps a value the node cannot do without, failing with every
    /// problem collected so far when it is absent.
    ///
    /// ```
    /// use nagare::compiler::validator::Validator;
    ///
    /// let kind = Validator::of("EndNode", "2").required("trigger type", Some("ProduceSignal"));
    /// assert_eq!(kind.unwrap(), "ProduceSignal");
    ///
    /// let missing = Validator::of("EndNode", "2").required::<&str>("trigger type", None);
    /// assert_eq!(
    ///     missing.unwrap_err().to_string(),
    ///     "Invalid parameters for EndNode \"2\": trigger type should not be empty"
    /// );
    /// ```
    pub fn required<T>(self, field: &str, value: Option<T>) -> Result<T, CompileError> {
        match value {
            Some(value) => self.validate().map(|()| value),
            None => Err(self.missing(field).into_error()),
        }
    }

    pub fn validate(self) -> Result<(), CompileError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn missing(mut self, field: &str) -> Self {
        self.problems.push(format!("{} should not be empty", field));
        self
    }

    fn into_error(self) -> CompileError {
        CompileError::InvalidParameters {
            node_type: self.node_type.to_string(),
            node_id: self.node_id.to_string(),
            problems: self.problems,
        }
    }
}

use std::fmt;

/// Expression languages the runtime can interpret for scripts, constraints,
/// transformations and assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionLanguage {
    Java,
    Mvel,
    Feel,
    Jq,
    JsonPath,
    XPath,
}

impl ExpressionLanguage {
    /// Accepts both short names and the URIs used by BPMN authoring tools.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "java" | "http://www.java.com/java" => Some(Self::Java),
            "mvel" | "http://www.mvel.org/2.0" => Some(Self::Mvel),
            "feel" | "http://www.omg.org/spec/feel/20140401" => Some(Self::Feel),
            "jq" => Some(Self::Jq),
            "jsonpath" => Some(Self::JsonPath),
            "xpath" | "http://www.w3.org/1999/xpath" => Some(Self::XPath),
            _ => None,
        }
    }
}

impl fmt::Display for ExpressionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Java => "java",
            Self::Mvel => "mvel",
            Self::Feel => "feel",
            Self::Jq => "jq",
            Self::JsonPath => "jsonpath",
            Self::XPath => "xpath",
        };
        f.write_str(name)
    }
}

/// Rule languages a rule-set node can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleLanguage {
    Drl,
    Dmn,
}

impl RuleLanguage {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "drl" | "http://www.jboss.org/drools/rule" => Some(Self::Drl),
            "dmn" | "http://www.jboss.org/drools/dmn" => Some(Self::Dmn),
            _ => None,
        }
    }
}

impl fmt::Display for RuleLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drl => f.write_str("DRL"),
            Self::Dmn => f.write_str("DMN"),
        }
    }
}

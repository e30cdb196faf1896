use std::fmt;

/// An operator received with one call and applied on the next.
///
/// Symbols outside `+ - * / =` are kept verbatim as [`Operator::Unrecognized`]
/// and behave as a no-op when they come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    Unrecognized(String),
}

impl Operator {
    /// Parses an operator symbol.
    ///
    /// Returns `None` for the empty symbol, which callers treat as "nothing
    /// pending".
    pub fn parse(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "" => return None,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "=" => Self::Equals,
            other => Self::Unrecognized(other.to_string()),
        };
        Some(op)
    }

    pub fn is_equals(&self) -> bool {
        matches!(self, Self::Equals)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("+"),
            Self::Subtract => f.write_str("-"),
            Self::Multiply => f.write_str("*"),
            Self::Divide => f.write_str("/"),
            Self::Equals => f.write_str("="),
            Self::Unrecognized(symbol) => f.write_str(symbol),
        }
    }
}

use crate::domain::accumulator::MAX_SIGNIFICANT_DIGITS;
use thiserror::Error;

/// Errors raised by the accumulator itself.
///
/// Every variant is recoverable: the call that produced it is rejected and
/// the accumulator is left exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid operand: {0:?}")]
    InvalidOperand(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("exponent out of range")]
    Overflow,
    #[error("precision must be between 1 and {max} significant digits, got {0}", max = MAX_SIGNIFICANT_DIGITS)]
    InvalidPrecision(u32),
}

impl CalculatorError {
    /// Error URI reported to remote callers.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::InvalidOperand(_) => "com.example.calculator.error.invalid_operand",
            Self::DivisionByZero => "com.example.calculator.error.division_by_zero",
            Self::Overflow => "com.example.calculator.error.overflow",
            Self::InvalidPrecision(_) => "com.example.calculator.error.invalid_precision",
        }
    }
}

/// Errors raised by the procedure router and its wire endpoint.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("no such procedure: {0}")]
    NoSuchProcedure(String),
    #[error("procedure already registered: {0}")]
    ProcedureAlreadyExists(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RpcError {
    pub fn uri(&self) -> &'static str {
        match self {
            Self::NoSuchProcedure(_) => "wamp.error.no_such_procedure",
            Self::ProcedureAlreadyExists(_) => "wamp.error.procedure_already_exists",
            Self::InvalidArgument(_) => "wamp.error.invalid_argument",
            Self::Calculator(e) => e.uri(),
            Self::Io(_) => "wamp.error.runtime_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

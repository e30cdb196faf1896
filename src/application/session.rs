use crate::domain::accumulator::{AccumulatorState, Precision};
use crate::domain::ports::{Procedure, ProcedureBox, ProcedureRegistry, SessionLifecycle};
use crate::error::{Result, RpcError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CLEAR_PROCEDURE: &str = "com.example.calculator.clear";
pub const CALC_PROCEDURE: &str = "com.example.calculator.calc";

type SharedState = Arc<Mutex<AccumulatorState>>;

/// One calculator session.
///
/// Owns a single accumulator for its whole lifetime. Calls are serialized
/// through the mutex, so the router may dispatch from any number of tasks.
pub struct CalculatorSession {
    state: SharedState,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new(Precision::DEFAULT)
    }
}

impl CalculatorSession {
    pub fn new(precision: Precision) -> Self {
        Self {
            state: Arc::new(Mutex::new(AccumulatorState::new(precision))),
        }
    }

    /// The registration table: every procedure this session exposes.
    pub fn procedures(&self) -> Vec<(&'static str, ProcedureBox)> {
        let clear: ProcedureBox = Arc::new(ClearProcedure {
            state: Arc::clone(&self.state),
        });
        let calc: ProcedureBox = Arc::new(CalcProcedure {
            state: Arc::clone(&self.state),
        });
        vec![(CLEAR_PROCEDURE, clear), (CALC_PROCEDURE, calc)]
    }

    /// Copy of the current accumulator state.
    pub async fn snapshot(&self) -> AccumulatorState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl SessionLifecycle for CalculatorSession {
    async fn on_join(&self, registry: &dyn ProcedureRegistry) -> Result<()> {
        self.state.lock().await.reset();

        for (uri, procedure) in self.procedures() {
            registry.register(uri, procedure).await?;
            tracing::debug!(uri, "registered procedure");
        }

        tracing::info!("calculator procedures registered");
        Ok(())
    }
}

/// `clear(arg?)`: resets the accumulator. A single argument is accepted and
/// ignored.
pub struct ClearProcedure {
    state: SharedState,
}

#[async_trait]
impl Procedure for ClearProcedure {
    async fn call(&self, args: Vec<Value>) -> Result<Value> {
        if args.len() > 1 {
            return Err(RpcError::InvalidArgument(format!(
                "clear takes at most 1 argument, got {}",
                args.len()
            )));
        }

        let result = self.state.lock().await.reset();
        tracing::debug!("accumulator cleared");
        Ok(Value::String(result))
    }
}

/// `calc(op, num)`: feeds one operator/operand pair into the accumulator.
pub struct CalcProcedure {
    state: SharedState,
}

#[async_trait]
impl Procedure for CalcProcedure {
    async fn call(&self, args: Vec<Value>) -> Result<Value> {
        let [op, num] = <[Value; 2]>::try_from(args).map_err(|args| {
            RpcError::InvalidArgument(format!("calc takes 2 arguments, got {}", args.len()))
        })?;
        let op = op
            .as_str()
            .ok_or_else(|| RpcError::InvalidArgument(format!("operator must be a string: {op}")))?;
        let num = operand_text(&num)?;

        let mut state = self.state.lock().await;
        match state.apply(op, &num) {
            Ok(result) => {
                tracing::debug!(op, num = %num, result = %result, "calc");
                Ok(Value::String(result))
            }
            Err(e) => {
                tracing::warn!(op, num = %num, error = %e, "calc rejected");
                Err(e.into())
            }
        }
    }
}

// Only integer JSON numbers are exact; fractional ones were already parsed
// into f64 by the decoder and must be sent as strings instead
fn operand_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Value::Number(n) => Err(RpcError::InvalidArgument(format!(
            "fractional operand {n} must be sent as a string"
        ))),
        other => Err(RpcError::InvalidArgument(format!(
            "operand must be a string or number: {other}"
        ))),
    }
}

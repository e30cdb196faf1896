use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A callable exposed to remote callers under a procedure URI.
#[async_trait]
pub trait Procedure: Send + Sync {
    async fn call(&self, args: Vec<Value>) -> Result<Value>;
}

pub type ProcedureBox = Arc<dyn Procedure>;

/// Maps procedure URIs to callables and makes them reachable by callers.
#[async_trait]
pub trait ProcedureRegistry: Send + Sync {
    async fn register(&self, uri: &str, procedure: ProcedureBox) -> Result<()>;
}

/// Hook run once the session has been established on the router.
#[async_trait]
pub trait SessionLifecycle: Send + Sync {
    async fn on_join(&self, registry: &dyn ProcedureRegistry) -> Result<()>;
}

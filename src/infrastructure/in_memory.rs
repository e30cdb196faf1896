use crate::domain::ports::{ProcedureBox, ProcedureRegistry};
use crate::error::{Result, RpcError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-process procedure router.
///
/// Uses `Arc<RwLock<HashMap<String, ProcedureBox>>>` so that the wire endpoint
/// can dispatch calls from many connections concurrently. Cloning yields a
/// handle to the same registration table.
#[derive(Default, Clone)]
pub struct InMemoryRouter {
    procedures: Arc<RwLock<HashMap<String, ProcedureBox>>>,
}

impl InMemoryRouter {
    /// Creates a router with no procedures registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a registration.
    pub async fn unregister(&self, uri: &str) -> Result<()> {
        let mut procedures = self.procedures.write().await;
        procedures
            .remove(uri)
            .map(|_| ())
            .ok_or_else(|| RpcError::NoSuchProcedure(uri.to_string()))
    }

    /// Invokes the procedure registered under `uri`.
    ///
    /// The table lock is released before the call runs, so a slow procedure
    /// never blocks registration or other callers.
    pub async fn call(&self, uri: &str, args: Vec<Value>) -> Result<Value> {
        let procedure = {
            let procedures = self.procedures.read().await;
            procedures
                .get(uri)
                .cloned()
                .ok_or_else(|| RpcError::NoSuchProcedure(uri.to_string()))?
        };
        procedure.call(args).await
    }

    /// Registered procedure URIs, sorted.
    pub async fn procedures(&self) -> Vec<String> {
        let procedures = self.procedures.read().await;
        let mut uris: Vec<String> = procedures.keys().cloned().collect();
        uris.sort();
        uris
    }
}

#[async_trait]
impl ProcedureRegistry for InMemoryRouter {
    async fn register(&self, uri: &str, procedure: ProcedureBox) -> Result<()> {
        let mut procedures = self.procedures.write().await;
        if procedures.contains_key(uri) {
            return Err(RpcError::ProcedureAlreadyExists(uri.to_string()));
        }
        procedures.insert(uri.to_string(), procedure);
        Ok(())
    }
}

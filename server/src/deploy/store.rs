//! Deployment record storage

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::deployment::Deployment;

/// Capability for persisting deployment records.
///
/// The shipped implementation is in-memory; the deployment service relies
/// only on this contract, so a database-backed store can be injected
/// without touching the workflow.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    /// Persist a new record
    async fn insert(&self, deployment: Deployment) -> Result<(), ServiceError>;

    /// Replace an existing record
    async fn update(&self, deployment: Deployment) -> Result<(), ServiceError>;

    /// Fetch a record by id
    async fn get(&self, id: &str) -> Result<Option<Deployment>, ServiceError>;

    /// All records, in insertion order
    async fn list(&self) -> Result<Vec<Deployment>, ServiceError>;
}

#[derive(Default)]
struct Records {
    by_id: HashMap<String, Deployment>,
    order: Vec<String>,
}

/// In-memory deployment store; records live for the process lifetime
#[derive(Default)]
pub struct InMemoryDeploymentStore {
    records: RwLock<Records>,
}

impl InMemoryDeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeploymentStore for InMemoryDeploymentStore {
    async fn insert(&self, deployment: Deployment) -> Result<(), ServiceError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if records.by_id.contains_key(&deployment.id) {
            return Err(ServiceError::StorageError(format!(
                "duplicate deployment id {}",
                deployment.id
            )));
        }
        records.order.push(deployment.id.clone());
        records.by_id.insert(deployment.id.clone(), deployment);
        Ok(())
    }

    async fn update(&self, deployment: Deployment) -> Result<(), ServiceError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if !records.by_id.contains_key(&deployment.id) {
            return Err(ServiceError::StorageError(format!(
                "unknown deployment id {}",
                deployment.id
            )));
        }
        records.by_id.insert(deployment.id.clone(), deployment);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Deployment>, ServiceError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.by_id.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Deployment>, ServiceError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .order
            .iter()
            .filter_map(|id| records.by_id.get(id).cloned())
            .collect())
    }
}

//! Auto-deploy and preview-deploy binding lookup

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ServiceError;
use crate::models::deployment::DeploymentConfig;

/// A stored deployment rule: configuration plus the credential to use
#[derive(Debug, Clone, Deserialize)]
pub struct BindingEntry {
    pub access_token: String,
    pub config: DeploymentConfig,
}

/// Read-only lookup of deployment rules consulted on webhook events
pub trait DeployBindings: Send + Sync {
    /// Rule for pushes to (repository, branch)
    fn auto_deploy(&self, repository: &str, branch: &str) -> Option<BindingEntry>;

    /// Rule for preview deployments of a repository's pull requests
    fn preview_deploy(&self, repository: &str) -> Option<BindingEntry>;
}

#[derive(Debug, Deserialize)]
struct AutoDeployRule {
    repository: String,
    branch: String,
    #[serde(flatten)]
    entry: BindingEntry,
}

#[derive(Debug, Deserialize)]
struct PreviewDeployRule {
    repository: String,
    #[serde(flatten)]
    entry: BindingEntry,
}

#[derive(Debug, Default, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    auto_deploy: Vec<AutoDeployRule>,
    #[serde(default)]
    preview_deploy: Vec<PreviewDeployRule>,
}

/// Bindings seeded once from a JSON file
#[derive(Default)]
pub struct StaticBindings {
    auto: HashMap<(String, String), BindingEntry>,
    preview: HashMap<String, BindingEntry>,
}

impl StaticBindings {
    /// No bindings configured
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load bindings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let raw = std::fs::read_to_string(path)?;
        let file: BindingsFile = serde_json::from_str(&raw)?;

        let auto = file
            .auto_deploy
            .into_iter()
            .map(|rule| ((rule.repository, rule.branch), rule.entry))
            .collect();
        let preview = file
            .preview_deploy
            .into_iter()
            .map(|rule| (rule.repository, rule.entry))
            .collect();

        Ok(Self { auto, preview })
    }
}

impl DeployBindings for StaticBindings {
    fn auto_deploy(&self, repository: &str, branch: &str) -> Option<BindingEntry> {
        self.auto
            .get(&(repository.to_string(), branch.to_string()))
            .cloned()
    }

    fn preview_deploy(&self, repository: &str) -> Option<BindingEntry> {
        self.preview.get(repository).cloned()
    }
}

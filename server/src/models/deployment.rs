//! Deployment models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target AWS service for a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwsService {
    Lambda,
    #[serde(rename = "s3-static")]
    S3Static,
    Ec2,
    Ecs,
}

impl AwsService {
    pub fn as_str(&self) -> &'static str {
        match self {
            AwsService::Lambda => "lambda",
            AwsService::S3Static => "s3-static",
            AwsService::Ec2 => "ec2",
            AwsService::Ecs => "ecs",
        }
    }
}

/// Deployment lifecycle state
///
/// `Deploying` exists in the wire schema but the implemented publisher
/// variants transition straight from `Building` to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Deploying,
    Success,
    Failed,
}

impl DeploymentStatus {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failed)
    }
}

/// Configuration for one deployment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Repository in "<owner>/<repo>" form
    pub repository_name: String,

    /// Branch to deploy
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Target AWS service
    pub aws_service: AwsService,

    /// Environment label, namespaces the target resource name
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Runtime identifier for serverless targets
    #[serde(default)]
    pub runtime: Option<String>,

    /// Optional build command
    #[serde(default)]
    pub build_command: Option<String>,

    /// Environment variables passed to the serverless runtime
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

impl DeploymentConfig {
    /// Target resource name: "<owner>-<repo>-<environment>"
    pub fn target_name(&self) -> String {
        format!(
            "{}-{}",
            self.repository_name.replace('/', "-"),
            self.environment
        )
    }
}

/// One tracked deployment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub repository_name: String,
    pub branch: String,
    pub commit_sha: String,
    pub aws_service: AwsService,
    pub status: DeploymentStatus,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,

    /// Append-only stage log
    pub logs: String,
}

impl Deployment {
    /// Create a new record in pending state
    pub fn new(config: &DeploymentConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            repository_name: config.repository_name.clone(),
            branch: config.branch.clone(),
            commit_sha: "latest".to_string(),
            aws_service: config.aws_service,
            status: DeploymentStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            deployment_url: None,
            logs: String::new(),
        }
    }

    /// Append a line to the stage log
    pub fn append_log(&mut self, line: &str) {
        self.logs.push_str(line);
    }

    /// Enter the building state and start the stage log
    pub fn mark_building(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = DeploymentStatus::Building;
        self.logs = "Downloading repository...\n".to_string();
    }

    /// Record completion; the url and completion time are set with the status
    pub fn mark_success(&mut self, deployment_url: String) {
        if self.status.is_terminal() {
            return;
        }
        self.status = DeploymentStatus::Success;
        self.completed_at = Some(Utc::now());
        self.deployment_url = Some(deployment_url);
    }

    /// Record failure with an explanatory log line
    pub fn mark_failed(&mut self, message: &str) {
        if self.status.is_terminal() {
            return;
        }
        self.status = DeploymentStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.append_log(&format!("{}\n", message));
    }
}

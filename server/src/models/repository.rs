//! GitHub repository models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository as returned by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub name: String,
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub default_branch: String,

    #[serde(default)]
    pub language: Option<String>,

    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! GitHub API integration

pub mod client;

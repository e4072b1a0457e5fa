//! Skylift Backend Library
//!
//! Core modules for the Skylift AWS dashboard and deployment backend.

pub mod app;
pub mod aws;
pub mod bindings;
pub mod deploy;
pub mod errors;
pub mod github;
pub mod logs;
pub mod models;
pub mod server;
pub mod workers;

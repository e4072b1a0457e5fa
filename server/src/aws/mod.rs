//! AWS service integration

pub mod clients;
pub mod functions;
pub mod objects;

//! Daily, weekly, project and meeting note workflows over a markdown vault.

pub mod config;
pub mod error;
pub mod models;
pub mod notes;
pub mod workflow;

pub use error::{StoreError, WorkflowError, WorkflowResult};

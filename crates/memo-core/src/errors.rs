//! Errores específicos del core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    #[error("execution failed: {0}")] Execution(String),
    #[error("store operation failed: {0}")] Store(String),
    #[error("cycle detected while resolving {fingerprint}")] CycleDetected { fingerprint: String },
    #[error("internal: {0}")] Internal(String),
}

//! Errores de persistencia.
//! Mapea fallos de IO / parseo a variantes semánticas; hacia el core todo
//! fallo del store viaja como `CoreError::Store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io failure: {0}")]
    Io(String),
    #[error("corrupt entry {key}: {detail}")]
    Corrupt { key: String, detail: String },
    #[error("entry not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<PersistenceError> for memo_core::CoreError {
    fn from(err: PersistenceError) -> Self {
        memo_core::CoreError::Store(err.to_string())
    }
}

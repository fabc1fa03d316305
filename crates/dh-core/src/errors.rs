//! Errores del core: fallos de colaboradores externos y fallos de paso.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallo reportado por un colaborador externo (token, secretos, warehouse,
/// base relacional, HTTP). Los adaptadores concretos mapean sus errores
/// nativos a estas variantes.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CollabError {
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    Access(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Fallo inesperado dentro de la acción de un paso. El runner lo convierte en
/// un `StepResult` FAILED; nunca se propaga fuera de `FlowRunner::run`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StepFault {
    #[error(transparent)]
    Collaborator(#[from] CollabError),
    #[error("step panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_fault_keeps_message() {
        let fault: StepFault = CollabError::Transport("connection refused".into()).into();
        assert_eq!(fault.to_string(), "transport error: connection refused");
    }

    #[test]
    fn panicked_variant_format() {
        assert_eq!(StepFault::Panicked("boom".into()).to_string(), "step panicked: boom");
    }
}

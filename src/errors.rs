use serde::Serialize;
use thiserror::Error;

/// Errores internos del motor de progreso.
/// Nunca llegan a la UI: el motor los absorbe y los registra en el log.
#[derive(Debug, Error, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum ProgressError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for ProgressError {
    fn from(e: serde_json::Error) -> Self {
        ProgressError::Serialization(e.to_string())
    }
}

impl From<gloo_net::Error> for ProgressError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ProgressError::Parse(e.to_string()),
            other => ProgressError::Network(other.to_string()),
        }
    }
}

impl ProgressError {
    /// Errores de transporte o de servidor (el modo offline se activa)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ProgressError::Network(_) | ProgressError::Http { .. } | ProgressError::Parse(_)
        )
    }

    /// La petición no llegó al servidor (sin red, CORS, DNS)
    pub fn is_transport(&self) -> bool {
        matches!(self, ProgressError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_transport() {
        assert!(ProgressError::Network("Failed to fetch".to_string()).is_transport());
        let rejected = ProgressError::Http {
            status: 422,
            message: "Validation error".to_string(),
        };
        assert!(rejected.is_remote());
        assert!(!rejected.is_transport());
        assert!(!ProgressError::Parse("eof".to_string()).is_transport());
    }
}

pub type ProgressResult<T> = Result<T, ProgressError>;

//! Errores de los adaptadores y su traducción a `CollabError`.

use dh_core::CollabError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),
    #[error("jwt: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid header: {0}")]
    Header(String),
    #[error("invalid key material: {0}")]
    KeyMaterial(String),
    /// Respuesta HTTP no exitosa del warehouse.
    #[error("warehouse responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Protocol(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<AdapterError> for CollabError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Http(e) => CollabError::Transport(e.to_string()),
            AdapterError::Jwt(e) => CollabError::Auth(e.to_string()),
            AdapterError::KeyMaterial(msg) => CollabError::Auth(msg),
            AdapterError::Status { status, body } => match status {
                401 => CollabError::Auth(format!("status {status}: {body}")),
                403 => CollabError::Access(format!("status {status}: {body}")),
                404 => CollabError::NotFound(format!("status {status}: {body}")),
                400..=499 => CollabError::Query(format!("status {status}: {body}")),
                _ => CollabError::Transport(format!("status {status}: {body}")),
            },
            AdapterError::Config(msg) => CollabError::Config(msg),
            other @ (AdapterError::Json(_) | AdapterError::Header(_) | AdapterError::Protocol(_)) => {
                CollabError::Query(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_collaborator_kinds() {
        let st = |status| CollabError::from(AdapterError::Status { status, body: "x".into() });
        assert!(matches!(st(401), CollabError::Auth(_)));
        assert!(matches!(st(403), CollabError::Access(_)));
        assert!(matches!(st(404), CollabError::NotFound(_)));
        assert!(matches!(st(422), CollabError::Query(_)));
        assert!(matches!(st(503), CollabError::Transport(_)));
    }

    #[test]
    fn config_stays_config() {
        let c: CollabError = AdapterError::Config("missing fingerprint".into()).into();
        assert_eq!(c, CollabError::Config("missing fingerprint".into()));
    }
}

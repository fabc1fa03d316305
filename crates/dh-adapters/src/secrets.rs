//! Almacenes de secretos.
//!
//! `EnvSecretStore` resuelve cada secreto como variable de entorno
//! `DH_SECRET_<NOMBRE>` (nombre en mayúsculas, todo lo no alfanumérico pasa a
//! `_`). La ubicación `vault` sólo se usa para trazas: en este backend no hay
//! más de un almacén.

use std::collections::HashMap;
use std::env;

use dh_core::{CollabError, SecretStore};
use log::debug;

pub const SECRET_ENV_PREFIX: &str = "DH_SECRET_";

/// Nombre de variable de entorno que respalda el secreto `name`.
pub fn secret_env_var(name: &str) -> String {
    let normalized: String = name.chars()
                                 .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                                 .collect();
    format!("{SECRET_ENV_PREFIX}{normalized}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, name: &str, vault: &str) -> Result<String, CollabError> {
        let var = secret_env_var(name);
        debug!("resolving secret '{name}' (vault {vault}) from {var}");
        env::var(&var).map_err(|_| CollabError::NotFound(format!("secret '{name}' not found in {vault} (expected env {var})")))
    }
}

/// Secretos fijos en memoria, indexados por nombre.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretStore for StaticSecretStore {
    fn get_secret(&self, name: &str, vault: &str) -> Result<String, CollabError> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| CollabError::NotFound(format!("secret '{name}' not found in {vault}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_name_is_normalized() {
        assert_eq!(secret_env_var("datahive-private-key"), "DH_SECRET_DATAHIVE_PRIVATE_KEY");
        assert_eq!(secret_env_var("apim.sub key"), "DH_SECRET_APIM_SUB_KEY");
    }

    #[test]
    fn env_store_reads_prefixed_variable() {
        env::set_var("DH_SECRET_UNIT_TEST_ENV_STORE", "s3cr3t");
        let store = EnvSecretStore::new();
        assert_eq!(store.get_secret("unit-test-env-store", "local").unwrap(), "s3cr3t");
        let missing = store.get_secret("unit-test-env-store-missing", "local").unwrap_err();
        assert!(matches!(missing, CollabError::NotFound(_)));
    }

    #[test]
    fn static_store_lookup() {
        let store = StaticSecretStore::new().with("apim", "key-1");
        assert_eq!(store.get_secret("apim", "v").unwrap(), "key-1");
        assert!(store.get_secret("other", "v").is_err());
    }
}

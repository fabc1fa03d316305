use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::AdapterError;

pub const AUTHORIZATION: &str = "Authorization";
pub const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";
pub const KEYPAIR_JWT: &str = "KEYPAIR_JWT";

/// Cabeceras de autenticación para el warehouse, en orden de inserción.
///
/// Un token o una clave de suscripción en blanco no generan cabecera, de
/// modo que `contains` refleja lo que realmente se enviaría.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders {
    entries: Vec<(String, String)>,
}

impl AuthHeaders {
    pub fn build(token: &str, gateway_header: &str, subscription_key: &str) -> Self {
        let mut h = Self::default();
        if !token.trim().is_empty() {
            h.insert(AUTHORIZATION, format!("Bearer {token}"));
        }
        h.insert(TOKEN_TYPE_HEADER, KEYPAIR_JWT.to_string());
        if !gateway_header.trim().is_empty() && !subscription_key.trim().is_empty() {
            h.insert(gateway_header, subscription_key.to_string());
        }
        h
    }

    fn insert(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, AdapterError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| AdapterError::Header(format!("{k}: {e}")))?;
            let mut value = HeaderValue::from_str(v).map_err(|e| AdapterError::Header(format!("{k}: {e}")))?;
            value.set_sensitive(name.as_str() != "x-snowflake-authorization-token-type");
            map.insert(name, value);
        }
        Ok(map)
    }
}

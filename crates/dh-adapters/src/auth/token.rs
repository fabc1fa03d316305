use std::rc::Rc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use dh_core::{CollabError, SecretStore, TokenIssuer};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AdapterError;

/// Claims del token de par de claves:
/// `iss = <CUENTA>.<USUARIO>.<huella>`, `sub = <CUENTA>.<USUARIO>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub account: String,
    pub user: String,
    /// Nombre del secreto con la clave privada RSA en PEM.
    pub private_key_secret: String,
    pub vault_url: String,
    /// Huella `SHA256:<base64>` de la clave pública registrada.
    pub public_key_fp: Option<String>,
    pub ttl_secs: i64,
}

impl JwtSettings {
    pub fn qualified_user(&self) -> String {
        format!("{}.{}", self.account.to_uppercase(), self.user.to_uppercase())
    }
}

/// Emisor RS256. La clave privada se lee del `SecretStore` en cada emisión.
pub struct JwtTokenIssuer {
    settings: JwtSettings,
    secrets: Rc<dyn SecretStore>,
}

impl JwtTokenIssuer {
    pub fn new(settings: JwtSettings, secrets: Rc<dyn SecretStore>) -> Self {
        Self { settings, secrets }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    pub fn claims(&self, fingerprint: &str, now: i64) -> Claims {
        let qualified = self.settings.qualified_user();
        Claims { iss: format!("{qualified}.{fingerprint}"),
                 sub: qualified,
                 iat: now,
                 exp: now + self.settings.ttl_secs }
    }

    fn issue(&self) -> Result<String, CollabError> {
        let fingerprint = self.settings
                              .public_key_fp
                              .as_deref()
                              .filter(|fp| !fp.trim().is_empty())
                              .ok_or_else(|| AdapterError::Config("public key fingerprint not configured".into()))?;
        let pem = self.secrets
                      .get_secret(&self.settings.private_key_secret, &self.settings.vault_url)?;
        // Los PEM que llegan por variables de entorno suelen traer "\n" literales.
        let pem = pem.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(AdapterError::from)?;
        let claims = self.claims(fingerprint, Utc::now().timestamp());
        let token = encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(AdapterError::from)?;
        debug!("jwt issued for {} ({} chars)", claims.sub, token.len());
        Ok(token)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate_token(&self) -> Result<String, CollabError> {
        self.issue()
    }
}

/// Huella `SHA256:<base64>` del DER contenido en un PEM de clave pública
/// (se espera `BEGIN PUBLIC KEY`, es decir SubjectPublicKeyInfo).
pub fn public_key_fingerprint(pem: &str) -> Result<String, AdapterError> {
    let body: String = pem.lines()
                          .map(str::trim)
                          .filter(|l| !l.is_empty() && !l.starts_with("-----"))
                          .collect();
    if body.is_empty() {
        return Err(AdapterError::KeyMaterial("empty public key PEM".into()));
    }
    let der = STANDARD.decode(body.as_bytes())
                      .map_err(|e| AdapterError::KeyMaterial(format!("public key base64: {e}")))?;
    Ok(format!("SHA256:{}", STANDARD.encode(Sha256::digest(&der))))
}

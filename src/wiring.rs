//! Construcción de colaboradores concretos a partir de `AppConfig`.

use std::rc::Rc;

use dh_adapters::{public_key_fingerprint, AuthCollaborators, AuthSettings, BlockingHttpClient, EnvSecretStore,
                  JwtSettings, JwtTokenIssuer, ScenarioCollaborators, SqlApiWarehouseClient, WarehouseSettings};
use dh_core::{RelationalStore, SecretStore, TokenIssuer, WarehouseClient};
use dh_persistence::{build_pool, PgRelationalStore};
use log::{info, warn};
use once_cell::unsync::OnceCell;

use crate::config::{AppConfig, JwtConfig};
use crate::errors::AppError;

/// Colaboradores compartidos por todos los flujos de una ejecución. El pool
/// de base de datos se crea recién cuando un escenario lo pide.
pub struct Harness {
    config: AppConfig,
    secrets: Rc<dyn SecretStore>,
    tokens: Rc<dyn TokenIssuer>,
    warehouse: Rc<dyn WarehouseClient>,
    store: OnceCell<Rc<dyn RelationalStore>>,
}

impl Harness {
    /// Secretos resueltos desde variables de entorno.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        Self::with_secrets(config, Rc::new(EnvSecretStore::new()))
    }

    pub fn with_secrets(config: AppConfig, secrets: Rc<dyn SecretStore>) -> Result<Self, AppError> {
        let jwt = JwtSettings { account: config.jwt.account.clone(),
                                user: config.jwt.user.clone(),
                                private_key_secret: config.secrets.private_key.clone(),
                                vault_url: config.secrets.vault_url.clone(),
                                public_key_fp: resolve_fingerprint(&config.jwt)?,
                                ttl_secs: config.jwt.ttl_secs };
        if jwt.public_key_fp.is_none() {
            warn!("no public key fingerprint configured; token generation will fail");
        }
        let tokens: Rc<dyn TokenIssuer> = Rc::new(JwtTokenIssuer::new(jwt, secrets.clone()));
        let w = &config.warehouse;
        let settings = WarehouseSettings { base_url: w.base_url.clone(),
                                           statements_path: w.statements_path.clone(),
                                           database: w.database.clone(),
                                           schema: w.schema.clone(),
                                           warehouse: w.warehouse.clone(),
                                           role: w.role.clone(),
                                           poll_interval: w.poll_interval,
                                           max_poll_attempts: w.max_poll_attempts,
                                           gateway_header: w.gateway_header.clone(),
                                           subscription_secret: config.secrets.subscription_key.clone(),
                                           vault_url: config.secrets.vault_url.clone(),
                                           timeout: config.api.timeout };
        let warehouse: Rc<dyn WarehouseClient> =
            Rc::new(SqlApiWarehouseClient::new(settings, tokens.clone(), secrets.clone())?);
        Ok(Self { config,
                  secrets,
                  tokens,
                  warehouse,
                  store: OnceCell::new() })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings { account: self.config.jwt.account.clone(),
                       user: self.config.jwt.user.clone(),
                       private_key_secret: self.config.secrets.private_key.clone(),
                       subscription_secret: self.config.secrets.subscription_key.clone(),
                       vault_url: self.config.secrets.vault_url.clone(),
                       gateway_header: self.config.warehouse.gateway_header.clone() }
    }

    pub fn auth_collaborators(&self) -> AuthCollaborators {
        AuthCollaborators { tokens: self.tokens.clone(),
                            secrets: self.secrets.clone(),
                            warehouse: self.warehouse.clone() }
    }

    /// Requiere `DATABASE_URL`.
    pub fn scenario_collaborators(&self) -> Result<ScenarioCollaborators, AppError> {
        let store = self.store.get_or_try_init(|| -> Result<Rc<dyn RelationalStore>, AppError> {
                                  let db = self.config
                                               .database
                                               .as_ref()
                                               .ok_or_else(|| AppError::Config("DATABASE_URL not set".into()))?;
                                  let pool = build_pool(&db.url, db.min_connections, db.max_connections)?;
                                  info!("relational store ready (schema {})", db.schema);
                                  Ok(Rc::new(PgRelationalStore::with_pool(pool, db.schema.clone())))
                              })?;
        let http = BlockingHttpClient::new(self.config.api.base_url.clone(), self.config.api.timeout)?;
        Ok(ScenarioCollaborators { store: store.clone(),
                                   http: Rc::new(http),
                                   warehouse: self.warehouse.clone() })
    }
}

/// Huella configurada o, en su defecto, calculada desde el PEM público.
pub fn resolve_fingerprint(jwt: &JwtConfig) -> Result<Option<String>, AppError> {
    match (&jwt.public_key_fp, &jwt.public_key_pem) {
        (Some(fp), _) => Ok(Some(fp.clone())),
        (None, Some(pem)) => Ok(Some(public_key_fingerprint(&pem.replace("\\n", "\n"))?)),
        (None, None) => Ok(None),
    }
}

//! Configuración central del harness.
//! Carga variables de entorno (.env) una sola vez y arma una estructura
//! inmutable con las secciones de API, JWT, warehouse, secretos y base.

use std::env;
use std::time::Duration;

use dh_persistence::config::DEFAULT_SCHEMA;
use dh_persistence::DbConfig;
use once_cell::sync::Lazy;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API bajo prueba.
    pub api: ApiConfig,
    pub jwt: JwtConfig,
    pub warehouse: WarehouseConfig,
    pub secrets: SecretNames,
    /// `None` si falta `DATABASE_URL`; sólo los escenarios la necesitan.
    pub database: Option<DbConfig>,
    /// Interruptor general; en `false` la CLI no ejecuta flujos.
    pub test_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub account: String,
    pub user: String,
    /// Huella `SHA256:<base64>`; si falta se calcula desde el PEM público.
    pub public_key_fp: Option<String>,
    pub public_key_pem: Option<String>,
    pub ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub base_url: String,
    pub statements_path: String,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    pub role: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub gateway_header: String,
}

/// Nombres de los secretos y ubicación del almacén.
#[derive(Debug, Clone)]
pub struct SecretNames {
    pub private_key: String,
    pub subscription_key: String,
    pub vault_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, con una fuente de valores arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| get(key).ok_or_else(|| AppError::Config(format!("{key} not set")));
        let number = |key: &str, default: u64| -> Result<u64, AppError> {
            match get(key) {
                Some(v) => v.parse().map_err(|_| AppError::Config(format!("{key} must be a number, got '{v}'"))),
                None => Ok(default),
            }
        };

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DbConfig { url,
                                         min_connections: number("DATABASE_MIN_CONNECTIONS", 2)? as u32,
                                         max_connections: number("DATABASE_MAX_CONNECTIONS", 16)? as u32,
                                         schema: or("DATAHIVE_DB_SCHEMA", DEFAULT_SCHEMA) }),
            None => None,
        };
        let test_enabled = match get("DATAHIVE_TEST_ENABLED") {
            None => true,
            Some(v) => parse_flag(&v).ok_or_else(|| AppError::Config(format!("DATAHIVE_TEST_ENABLED: '{v}'")))?,
        };

        Ok(Self { api: ApiConfig { base_url: or("DATAHIVE_API_BASE_URL", "http://localhost:8080"),
                                   timeout: Duration::from_secs(number("DATAHIVE_HTTP_TIMEOUT_SECS", 30)?) },
                  jwt: JwtConfig { account: required("DATAHIVE_ACCOUNT")?,
                                   user: required("DATAHIVE_USER")?,
                                   public_key_fp: get("DATAHIVE_PUBLIC_KEY_FP"),
                                   public_key_pem: get("DATAHIVE_PUBLIC_KEY_PEM"),
                                   ttl_secs: number("DATAHIVE_JWT_TTL_SECS", 3600)? as i64 },
                  warehouse: WarehouseConfig { base_url: required("DATAHIVE_WAREHOUSE_URL")?,
                                               statements_path: or("DATAHIVE_STATEMENTS_PATH", "/api/v2/statements"),
                                               database: or("DATAHIVE_DATABASE", "URA_OCMS_DEV"),
                                               schema: or("DATAHIVE_SCHEMA", "PUBLIC"),
                                               warehouse: or("DATAHIVE_WAREHOUSE", "URA_OCMS_WH"),
                                               role: or("DATAHIVE_ROLE", "OCMS_SERVICE_ROLE"),
                                               poll_interval:
                                                   Duration::from_millis(number("DATAHIVE_POLL_INTERVAL_MS", 1000)?),
                                               max_poll_attempts: number("DATAHIVE_MAX_POLL_ATTEMPTS", 60)? as u32,
                                               gateway_header: or("DATAHIVE_APIM_HEADER", "Ocp-Apim-Subscription-Key") },
                  secrets: SecretNames { private_key: or("DATAHIVE_PRIVATE_KEY_SECRET", "snowflake-private-key"),
                                         subscription_key: or("DATAHIVE_APIM_SECRET", "apim-subscription-key"),
                                         vault_url: or("DATAHIVE_KEYVAULT_URL", "env") },
                  database,
                  test_enabled })
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Cliente del SQL API del warehouse.
//!
//! Protocolo:
//! 1. `POST <base><statements_path>` con `{statement, database, schema,
//!    warehouse, role}` → `statementHandle`.
//! 2. `GET <base><statements_path>/<handle>` hasta que `status` deje de ser
//!    `"running"` (con `max_poll_attempts` como techo).
//!
//! Cada llamada lleva un JWT recién emitido y la clave de suscripción de la
//! pasarela.

use std::rc::Rc;
use std::thread;
use std::time::Duration;

use dh_core::{CollabError, SecretStore, TokenIssuer, WarehouseClient};
use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;

use crate::auth::AuthHeaders;
use crate::error::AdapterError;

/// Sentencia liviana usada como sonda de disponibilidad.
pub const HEALTH_STATEMENT: &str = "SELECT CURRENT_TIMESTAMP()";

#[derive(Debug, Clone)]
pub struct WarehouseSettings {
    pub base_url: String,
    pub statements_path: String,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    pub role: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub gateway_header: String,
    pub subscription_secret: String,
    pub vault_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    database: &'a str,
    schema: &'a str,
    warehouse: &'a str,
    role: &'a str,
}

pub struct SqlApiWarehouseClient {
    http: Client,
    settings: WarehouseSettings,
    tokens: Rc<dyn TokenIssuer>,
    secrets: Rc<dyn SecretStore>,
}

impl SqlApiWarehouseClient {
    pub fn new(settings: WarehouseSettings,
               tokens: Rc<dyn TokenIssuer>,
               secrets: Rc<dyn SecretStore>)
               -> Result<Self, AdapterError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { http,
                  settings,
                  tokens,
                  secrets })
    }

    pub fn settings(&self) -> &WarehouseSettings {
        &self.settings
    }

    fn statements_url(&self) -> String {
        format!("{}{}",
                self.settings.base_url.trim_end_matches('/'),
                self.settings.statements_path)
    }

    fn auth_headers(&self) -> Result<AuthHeaders, CollabError> {
        let token = self.tokens.generate_token()?;
        // Sin clave de suscripción se intenta igual; la pasarela responderá 401.
        let key = match self.secrets
                            .get_secret(&self.settings.subscription_secret, &self.settings.vault_url)
        {
            Ok(k) => k,
            Err(e) => {
                warn!("gateway subscription key unavailable: {e}");
                String::new()
            }
        };
        Ok(AuthHeaders::build(&token, &self.settings.gateway_header, &key))
    }

    fn request_body(&self, statement: &str) -> Result<Value, CollabError> {
        let req = StatementRequest { statement,
                                     database: &self.settings.database,
                                     schema: &self.settings.schema,
                                     warehouse: &self.settings.warehouse,
                                     role: &self.settings.role };
        Ok(serde_json::to_value(req).map_err(AdapterError::from)?)
    }

    fn start(&self, sql: &str, headers: &AuthHeaders) -> Result<String, CollabError> {
        let resp = self.http
                       .post(self.statements_url())
                       .headers(headers.to_header_map()?)
                       .json(&self.request_body(sql)?)
                       .send()
                       .map_err(AdapterError::from)?;
        let body = json_body(resp)?;
        let handle = body.get("statementHandle")
                         .and_then(Value::as_str)
                         .ok_or_else(|| AdapterError::Protocol("response without statementHandle".into()))?;
        debug!("statement started: {handle}");
        Ok(handle.to_string())
    }

    fn poll(&self, handle: &str, headers: &AuthHeaders) -> Result<Value, CollabError> {
        let url = format!("{}/{}", self.statements_url(), handle);
        let header_map = headers.to_header_map()?;
        for attempt in 1..=self.settings.max_poll_attempts {
            let resp = self.http
                           .get(&url)
                           .headers(header_map.clone())
                           .send()
                           .map_err(AdapterError::from)?;
            let body = json_body(resp)?;
            match body.get("status").and_then(Value::as_str) {
                Some("running") => {
                    debug!("statement {handle} still running (attempt {attempt})");
                    thread::sleep(self.settings.poll_interval);
                }
                _ => return Ok(body),
            }
        }
        Err(CollabError::Transport(format!("query execution timed out after {} polling attempts",
                                           self.settings.max_poll_attempts)))
    }
}

fn json_body(resp: Response) -> Result<Value, AdapterError> {
    let status = resp.status();
    let text = resp.text()?;
    if !status.is_success() {
        return Err(AdapterError::Status { status: status.as_u16(),
                                          body: text.chars().take(500).collect() });
    }
    Ok(serde_json::from_str(&text)?)
}

impl WarehouseClient for SqlApiWarehouseClient {
    /// La sentencia se envía tal cual, incluso vacía: validarla es cosa del
    /// warehouse.
    fn execute_query(&self, sql: &str) -> Result<Value, CollabError> {
        let headers = self.auth_headers()?;
        let handle = self.start(sql, &headers)?;
        self.poll(&handle, &headers)
    }

    fn is_service_available(&self) -> bool {
        let probe = || -> Result<u16, CollabError> {
            let headers = self.auth_headers()?;
            let resp = self.http
                           .post(self.statements_url())
                           .headers(headers.to_header_map()?)
                           .json(&self.request_body(HEALTH_STATEMENT)?)
                           .send()
                           .map_err(AdapterError::from)?;
            Ok(resp.status().as_u16())
        };
        match probe() {
            Ok(status) if (200..300).contains(&status) => {
                info!("warehouse health check ok ({status})");
                true
            }
            Ok(status) => {
                warn!("warehouse health check failed with status {status}");
                false
            }
            Err(e) => {
                warn!("warehouse health check error: {e}");
                false
            }
        }
    }
}

/// Número de filas de una respuesta del SQL API: `resultSetMetaData.numRows`
/// o, en su defecto, el largo de `data`.
pub fn row_count(result: &Value) -> Option<u64> {
    result.pointer("/resultSetMetaData/numRows")
          .and_then(Value::as_u64)
          .or_else(|| result.get("data").and_then(Value::as_array).map(|rows| rows.len() as u64))
}

/// Primera celda de la primera fila como entero (resultado de `COUNT(*)`).
/// El SQL API entrega las celdas como texto.
pub fn first_cell_count(result: &Value) -> Option<i64> {
    match result.pointer("/data/0/0")? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

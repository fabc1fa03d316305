//! Contratos de los colaboradores externos.
//!
//! El runner y los flujos sólo conocen estos traits; las implementaciones
//! concretas (Postgres, HTTP bloqueante, JWT, secretos) viven en otros crates
//! y se inyectan explícitamente al construir cada flujo.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CollabError;

/// Fila devuelta por el store relacional: columna -> valor JSON.
pub type Row = Map<String, Value>;

/// Emisor de tokens firmados para el warehouse.
pub trait TokenIssuer {
    fn generate_token(&self) -> Result<String, CollabError>;
}

/// Almacén de secretos con nombre, ubicado por `vault`.
pub trait SecretStore {
    fn get_secret(&self, name: &str, vault: &str) -> Result<String, CollabError>;
}

/// Cliente de consultas contra el warehouse analítico.
pub trait WarehouseClient {
    fn execute_query(&self, sql: &str) -> Result<Value, CollabError>;

    /// Sonda de disponibilidad. No devuelve error: cualquier fallo es `false`.
    fn is_service_available(&self) -> bool;
}

/// Respuesta de una llamada HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Cliente HTTP bloqueante con URL base configurable.
pub trait HttpClient {
    fn base_url(&self) -> &str;

    fn get(&self, path: &str) -> Result<HttpResponse, CollabError>;

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), path)
    }
}

/// Valor de columna para fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FixtureValue {
    Text(String),
    Int(i64),
    /// Numérico exacto en forma textual ("250.00").
    Decimal(String),
    /// Marca de tiempo relativa al momento de la escritura.
    DaysFromNow(i32),
    Null,
}

impl FixtureValue {
    pub fn text(s: impl Into<String>) -> Self {
        FixtureValue::Text(s.into())
    }

    pub fn now() -> Self {
        FixtureValue::DaysFromNow(0)
    }
}

/// Fila de fixture con semántica reset-or-insert: si existe una fila con las
/// columnas `key`, se actualizan las columnas `values`; si no, se inserta
/// `key` + `values` (+ `insert_only`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRow {
    pub table: String,
    pub label: String,
    pub key: Vec<(String, FixtureValue)>,
    pub values: Vec<(String, FixtureValue)>,
    /// Columnas que sólo se escriben al insertar (auditoría de creación).
    pub insert_only: Vec<(String, FixtureValue)>,
}

impl FixtureRow {
    pub fn new(table: impl Into<String>, label: impl Into<String>) -> Self {
        Self { table: table.into(),
               label: label.into(),
               key: Vec::new(),
               values: Vec::new(),
               insert_only: Vec::new() }
    }

    pub fn key(mut self, column: &str, value: FixtureValue) -> Self {
        self.key.push((column.to_string(), value));
        self
    }

    pub fn set(mut self, column: &str, value: FixtureValue) -> Self {
        self.values.push((column.to_string(), value));
        self
    }

    pub fn on_insert(mut self, column: &str, value: FixtureValue) -> Self {
        self.insert_only.push((column.to_string(), value));
        self
    }
}

/// Resultado de un upsert de fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertOutcome {
    Inserted { rows: usize },
    Reset { rows: usize },
}

/// Operaciones parametrizadas sobre la base operacional, acotadas a un
/// esquema fijo.
pub trait RelationalStore {
    fn schema(&self) -> &str;

    /// `SELECT COUNT(*) FROM <schema>.<table> WHERE <column> = value`.
    fn count(&self, table: &str, column: &str, value: &str) -> Result<i64, CollabError>;

    /// Filas proyectadas a `columns` con `<column> = value`.
    fn select_rows(&self, table: &str, columns: &[&str], column: &str, value: &str) -> Result<Vec<Row>, CollabError>;

    fn upsert_fixture(&self, fixture: &FixtureRow) -> Result<UpsertOutcome, CollabError>;
}

/// Resultado de una llamada sondeada cuyo fallo es la señal esperada.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Ok(Value),
    Faulted(CollabError),
}

impl Probe {
    pub fn faulted(&self) -> bool {
        matches!(self, Probe::Faulted(_))
    }
}

/// Envuelve `execute_query` en un `Probe`, para casos negativos.
pub fn probe_query(client: &dyn WarehouseClient, sql: &str) -> Probe {
    match client.execute_query(sql) {
        Ok(v) => Probe::Ok(v),
        Err(e) => Probe::Faulted(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;
    impl WarehouseClient for Echo {
        fn execute_query(&self, sql: &str) -> Result<Value, CollabError> {
            if sql.is_empty() {
                Err(CollabError::Query("empty statement".into()))
            } else {
                Ok(json!({ "data": [] }))
            }
        }
        fn is_service_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn probe_maps_error_to_faulted() {
        assert!(probe_query(&Echo, "").faulted());
        assert!(!probe_query(&Echo, "SELECT 1").faulted());
    }

    #[test]
    fn fixture_builder_keeps_column_order() {
        let f = FixtureRow::new("t", "T").key("id", FixtureValue::text("1"))
                                         .set("a", FixtureValue::Int(1))
                                         .set("b", FixtureValue::Null);
        let cols: Vec<&str> = f.values.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cols, ["a", "b"]);
    }

    struct Base;
    impl HttpClient for Base {
        fn base_url(&self) -> &str {
            "http://localhost:8080/"
        }
        fn get(&self, _path: &str) -> Result<HttpResponse, CollabError> {
            unreachable!()
        }
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        assert_eq!(Base.url_for("/api/x"), "http://localhost:8080/api/x");
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StepStatus;
use crate::constants::EXECUTION_TIME_KEY;

/// Resultado de un paso: título, estado, líneas de diagnóstico (append-only,
/// en orden de inserción) y un payload estructurado opcional.
///
/// Se serializa con la forma que consumen los reportes:
/// `{ "title", "status", "details", "jsonData"? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    title: String,
    status: StepStatus,
    details: Vec<String>,
    #[serde(rename = "jsonData", default, skip_serializing_if = "Option::is_none")]
    structured_data: Option<Map<String, Value>>,
    // Se marca con `fail`; impide que `finalize` deje el paso en SUCCESS.
    #[serde(skip)]
    failure_recorded: bool,
}

impl StepResult {
    pub fn new(title: impl Into<String>, initial_status: StepStatus) -> Self {
        Self { title: title.into(),
               status: initial_status,
               details: Vec::new(),
               structured_data: None,
               failure_recorded: initial_status == StepStatus::Failed }
    }

    /// Resultado en estado `Info`, listo para acumular detalles.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(title, StepStatus::Info)
    }

    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut r = Self::new(title, StepStatus::Success);
        r.add_detail(detail);
        r
    }

    pub fn failed(title: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut r = Self::new(title, StepStatus::Failed);
        r.add_detail(detail);
        r
    }

    pub fn skipped(title: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut r = Self::new(title, StepStatus::Skipped);
        r.add_detail(detail);
        r
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn structured_data(&self) -> Option<&Map<String, Value>> {
        self.structured_data.as_ref()
    }

    /// Entrada concreta de `structured_data`, si existe.
    pub fn structured(&self, key: &str) -> Option<&Value> {
        self.structured_data.as_ref().and_then(|m| m.get(key))
    }

    pub fn failure_recorded(&self) -> bool {
        self.failure_recorded
    }

    pub fn add_detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }

    /// Sobrescribe el estado. La última escritura antes de devolver el
    /// resultado es la que cuenta.
    pub fn set_status(&mut self, status: StepStatus) {
        if status == StepStatus::Failed {
            self.failure_recorded = true;
        }
        self.status = status;
    }

    /// Registra un fallo: añade la línea y marca el paso como FAILED. Las
    /// aserciones posteriores del mismo paso siguen ejecutándose.
    pub fn fail(&mut self, line: impl Into<String>) {
        self.add_detail(line);
        self.set_status(StepStatus::Failed);
    }

    pub fn set_structured_data(&mut self, key: impl Into<String>, value: Value) {
        self.structured_data.get_or_insert_with(Map::new).insert(key.into(), value);
    }

    /// Igual que `set_structured_data`, salvo que si el valor existente y el
    /// nuevo son objetos JSON se fusionan clave a clave (gana el nuevo).
    pub fn merge_structured_data(&mut self, key: impl Into<String>, value: Value) {
        let map = self.structured_data.get_or_insert_with(Map::new);
        let key = key.into();
        match (map.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            (_, value) => {
                map.insert(key, value);
            }
        }
    }

    /// Guarda la duración del cuerpo del paso en milisegundos.
    pub fn record_elapsed(&mut self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.set_structured_data(EXECUTION_TIME_KEY, Value::from(ms));
    }

    /// Lleva el resultado a un estado terminal coherente:
    /// - `Info` pasa a `Success`, o a `Failed` si se registró algún fallo.
    /// - `Success` con un fallo registrado se degrada a `Failed`.
    /// - Un resultado terminal sin detalles recibe una línea genérica.
    pub fn finalize(&mut self) {
        self.status = match self.status {
            StepStatus::Info | StepStatus::Success if self.failure_recorded => StepStatus::Failed,
            StepStatus::Info => StepStatus::Success,
            other => other,
        };
        if self.details.is_empty() {
            let line = format!("step finished with status {}", self.status);
            self.details.push(line);
        }
    }
}

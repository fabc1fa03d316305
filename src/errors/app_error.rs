use dh_adapters::AdapterError;
use dh_persistence::PersistenceError;
use thiserror::Error;

/// Errores de arranque de la CLI. Los fallos dentro de un flujo nunca llegan
/// aquí: quedan como pasos FAILED en el reporte.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Escenario desconocido: {0} (disponibles: {1})")]
    UnknownScenario(String, String),
    #[error("Los flujos de prueba están deshabilitados (DATAHIVE_TEST_ENABLED=false)")]
    Disabled,
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error de adaptador: {0}")]
    Adapter(#[from] AdapterError),
    #[error("Error serializando el reporte: {0}")]
    Report(#[from] serde_json::Error),
}

impl AppError {
    /// Código de salida para errores de configuración o uso.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

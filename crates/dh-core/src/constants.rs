//! Constantes del runner.

/// Versión lógica del harness. Entra en el hash de cada `FlowDefinition`, de
/// modo que un cambio incompatible en la semántica del runner produce hashes
/// distintos aunque los pasos no cambien.
pub const HARNESS_VERSION: &str = "DH1.0";

/// Clave de `structured_data` donde cada paso deja su duración.
pub const EXECUTION_TIME_KEY: &str = "executionTimeMs";

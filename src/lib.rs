//! DataHive Harness
//!
//! Librería de la CLI del harness:
//! - `config`: carga de `.env` y variables de entorno en `AppConfig`.
//! - `wiring`: colaboradores concretos (JWT, secretos, warehouse, base, HTTP).
//! - `commands`: selección de flujos, ejecución y código de salida.
//! - `errors`: errores de arranque (`AppError`).

pub mod commands;
pub mod config;
pub mod errors;
pub mod wiring;

pub use commands::{exit_code, flows_for, run_flows, Target};
pub use config::AppConfig;
pub use errors::AppError;
pub use wiring::Harness;

//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad acción + aserción que produce exactamente un
//! `StepResult`. Este módulo define:
//! - `StepStatus`: resultado del paso (SUCCESS / FAILED / SKIPPED / INFO).
//! - `StepResult`: valor acumulado con detalles legibles y datos estructurados.
//! - `StepSpec` y `Gating`: declaración de un paso y su política de salto.

pub mod definition;
mod result;
mod status;

pub use definition::{ExecutionContext, Gating, StepAction, StepSpec};
pub use result::StepResult;
pub use status::StepStatus;

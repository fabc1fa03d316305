//! Runner lineal de flujos.
//!
//! Ejecuta los pasos de una `FlowDefinition` en orden, aplica la política de
//! salto sobre el predecesor inmediato y devuelve siempre un resultado por
//! paso declarado.

pub mod runner;

pub use runner::FlowRunner;

pub use crate::flow::FlowDefinition;
pub use crate::report::{FlowReport, RunSummary};
pub use crate::step::{StepResult, StepStatus};

//! dh-core: runner lineal de pasos de verificación y modelo de resultados.
//!
//! - `step`: `StepResult`, `StepStatus`, `StepSpec`, `Gating`.
//! - `flow`: `FlowDefinition` inmutable + builder.
//! - `engine`: `FlowRunner` con salto sobre el predecesor inmediato.
//! - `report`: resumen por estado y documento de reporte.
//! - `collab`: contratos de colaboradores externos (token, secretos,
//!   warehouse, base relacional, HTTP).
pub mod collab;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod flow;
pub mod hashing;
pub mod report;
pub mod step;

pub use collab::{probe_query, FixtureRow, FixtureValue, HttpClient, HttpResponse, Probe, RelationalStore, Row,
                 SecretStore, TokenIssuer, UpsertOutcome, WarehouseClient};
pub use engine::FlowRunner;
pub use errors::{CollabError, StepFault};
pub use flow::{FlowBuilder, FlowDefinition};
pub use report::{FlowReport, RunSummary};
pub use step::{ExecutionContext, Gating, StepResult, StepSpec, StepStatus};

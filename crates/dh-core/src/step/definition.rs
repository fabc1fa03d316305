use std::fmt;

use serde::{Deserialize, Serialize};

use super::StepResult;
use crate::errors::StepFault;

/// Política de ejecución de un paso respecto a su predecesor inmediato.
///
/// La propagación de saltos es lineal: un paso sólo mira el resultado del
/// paso declarado justo antes que él, nunca un grafo de dependencias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gating {
    /// Se ejecuta siempre que el flujo llegue a él; no mira al predecesor.
    Independent,
    /// Se salta (SKIPPED) si el resultado previo no es SUCCESS.
    DependsOnPrior,
    /// Validaciones que corren aunque todo lo anterior haya fallado; su
    /// estado depende sólo de sus propias comprobaciones.
    AlwaysRun,
}

/// Contexto entregado a la acción de un paso.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub flow_name: &'a str,
    pub step_index: usize,
    pub step_name: &'a str,
}

/// Acción de un paso. Los fallos de validación esperados se devuelven como
/// `Ok(StepResult)` con estado FAILED; `Err` queda para fallos inesperados de
/// colaboradores.
pub type StepAction = Box<dyn Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault>>;

/// Declaración de un paso dentro de una `FlowDefinition`.
pub struct StepSpec {
    name: String,
    gating: Gating,
    action: StepAction,
}

impl StepSpec {
    pub fn new<F>(name: impl Into<String>, gating: Gating, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        Self { name: name.into(),
               gating,
               action: Box::new(action) }
    }

    pub fn independent<F>(name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        Self::new(name, Gating::Independent, action)
    }

    pub fn depends_on_prior<F>(name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        Self::new(name, Gating::DependsOnPrior, action)
    }

    pub fn always_run<F>(name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        Self::new(name, Gating::AlwaysRun, action)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gating(&self) -> Gating {
        self.gating
    }

    pub(crate) fn invoke(&self, ctx: &ExecutionContext<'_>) -> Result<StepResult, StepFault> {
        (self.action)(ctx)
    }
}

impl fmt::Debug for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSpec")
         .field("name", &self.name)
         .field("gating", &self.gating)
         .finish_non_exhaustive()
    }
}

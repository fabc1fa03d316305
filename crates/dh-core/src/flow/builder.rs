//! Builder para `FlowDefinition`.
//!
//! Permite declarar los pasos en el mismo orden en que se ejecutan:
//!
//! ```ignore
//! let flow = FlowDefinition::builder("auth")
//!     .independent("jwt", jwt_step)
//!     .then("secrets", secrets_step)
//!     .always("errors", error_step)
//!     .build();
//! ```

use super::FlowDefinition;
use crate::errors::StepFault;
use crate::step::{ExecutionContext, Gating, StepResult, StepSpec};

#[derive(Debug)]
pub struct FlowBuilder {
    name: String,
    steps: Vec<StepSpec>,
}

impl FlowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               steps: Vec::new() }
    }

    /// Añade un paso ya construido.
    pub fn step(mut self, step: StepSpec) -> Self {
        self.steps.push(step);
        self
    }

    /// Paso sin dependencia del anterior.
    pub fn independent<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        self.step(StepSpec::new(name, Gating::Independent, action))
    }

    /// Paso que sólo corre si el anterior terminó en SUCCESS.
    pub fn then<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        self.step(StepSpec::new(name, Gating::DependsOnPrior, action))
    }

    /// Paso que corre siempre, sin importar el estado previo.
    pub fn always<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&ExecutionContext<'_>) -> Result<StepResult, StepFault> + 'static
    {
        self.step(StepSpec::new(name, Gating::AlwaysRun, action))
    }

    pub fn build(self) -> FlowDefinition {
        FlowDefinition::new(self.name, self.steps)
    }
}

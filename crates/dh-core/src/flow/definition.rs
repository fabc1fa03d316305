//! `FlowDefinition`: secuencia ordenada de `StepSpec`.
//!
//! Se construye una vez (configuración estática del escenario) y se ejecuta
//! cualquier número de veces; cada ejecución produce resultados nuevos sin
//! estado mutable compartido entre corridas.
use serde_json::json;

use crate::constants::HARNESS_VERSION;
use crate::hashing::hash_value;
use crate::step::{Gating, StepSpec};

#[derive(Debug)]
pub struct FlowDefinition {
    name: String,
    steps: Vec<StepSpec>,
    definition_hash: String,
}

impl FlowDefinition {
    /// Crea la definición y calcula su hash a partir del nombre del flujo y
    /// de los (nombre, gating) de cada paso, en orden.
    pub fn new(name: impl Into<String>, steps: Vec<StepSpec>) -> Self {
        let name = name.into();
        let definition_hash = compute_definition_hash(&name, &steps);
        Self { name, steps, definition_hash }
    }

    pub fn builder(name: impl Into<String>) -> super::FlowBuilder {
        super::FlowBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn compute_definition_hash(name: &str, steps: &[StepSpec]) -> String {
    let step_json: Vec<_> = steps.iter()
                                 .map(|s| json!({ "name": s.name(), "gating": gating_tag(s.gating()) }))
                                 .collect();
    hash_value(&json!({
        "harness_version": HARNESS_VERSION,
        "flow": name,
        "steps": step_json,
    }))
}

fn gating_tag(g: Gating) -> &'static str {
    match g {
        Gating::Independent => "independent",
        Gating::DependsOnPrior => "depends_on_prior",
        Gating::AlwaysRun => "always_run",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepResult;

    fn noop(name: &str, gating: Gating) -> StepSpec {
        StepSpec::new(name, gating, |_| Ok(StepResult::success("noop", "ok")))
    }

    #[test]
    fn hash_depends_on_step_order_and_gating() {
        let a = FlowDefinition::new("f", vec![noop("x", Gating::Independent), noop("y", Gating::DependsOnPrior)]);
        let b = FlowDefinition::new("f", vec![noop("x", Gating::Independent), noop("y", Gating::DependsOnPrior)]);
        let c = FlowDefinition::new("f", vec![noop("y", Gating::DependsOnPrior), noop("x", Gating::Independent)]);
        let d = FlowDefinition::new("f", vec![noop("x", Gating::Independent), noop("y", Gating::AlwaysRun)]);
        assert_eq!(a.definition_hash(), b.definition_hash());
        assert_ne!(a.definition_hash(), c.definition_hash());
        assert_ne!(a.definition_hash(), d.definition_hash());
        assert_eq!(a.len(), 2);
    }
}

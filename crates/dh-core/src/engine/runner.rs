//! `FlowRunner`: la máquina de estados paso a paso.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use log::{debug, info, warn};

use crate::errors::StepFault;
use crate::flow::FlowDefinition;
use crate::report::{FlowReport, RunSummary};
use crate::step::{ExecutionContext, Gating, StepResult, StepSpec, StepStatus};

/// Ejecutor secuencial y bloqueante de flujos.
///
/// No guarda estado entre corridas: el vector de resultados pertenece a la
/// llamada a `run` y se devuelve por valor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowRunner;

impl FlowRunner {
    pub fn new() -> Self {
        Self
    }

    /// Ejecuta el flujo completo. Nunca falla: cualquier fallo de un paso se
    /// convierte en un `StepResult` FAILED y los dependientes en SKIPPED.
    pub fn run(&self, flow: &FlowDefinition) -> Vec<StepResult> {
        info!("flow '{}' started ({} steps, definition {})",
              flow.name(),
              flow.len(),
              flow.definition_hash());

        let mut results: Vec<StepResult> = Vec::with_capacity(flow.len());
        for (index, spec) in flow.steps().iter().enumerate() {
            let result = match (spec.gating(), results.last()) {
                (Gating::DependsOnPrior, Some(prev)) if prev.status() != StepStatus::Success => skip(spec, prev),
                _ => execute(flow.name(), index, spec),
            };
            debug!("flow '{}' step {} '{}' -> {}", flow.name(), index, spec.name(), result.status());
            results.push(result);
        }

        let summary = RunSummary::from_results(&results);
        info!("flow '{}' completed: {} steps, {} success, {} failed, {} skipped",
              flow.name(),
              summary.total_steps,
              summary.success_count,
              summary.failed_count,
              summary.skipped_count);
        results
    }

    /// Ejecuta el flujo y empaqueta resultados, resumen y marcas de tiempo.
    pub fn run_report(&self, flow: &FlowDefinition) -> FlowReport {
        let started_at = Utc::now();
        let test_results = self.run(flow);
        let summary = RunSummary::from_results(&test_results);
        FlowReport { flow: flow.name().to_string(),
                     definition_hash: flow.definition_hash().to_string(),
                     started_at,
                     finished_at: Utc::now(),
                     test_results,
                     summary }
    }
}

fn skip(spec: &StepSpec, prev: &StepResult) -> StepResult {
    warn!("skipping step '{}': prior step '{}' ended {}", spec.name(), prev.title(), prev.status());
    StepResult::skipped(spec.name(),
                        format!("Skipped due to failure of prior step '{}' (status: {})",
                                prev.title(),
                                prev.status()))
}

fn execute(flow_name: &str, index: usize, spec: &StepSpec) -> StepResult {
    let ctx = ExecutionContext { flow_name,
                                 step_index: index,
                                 step_name: spec.name() };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| spec.invoke(&ctx)));
    let mut result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(fault)) => fault_result(spec, fault),
        Err(payload) => fault_result(spec, StepFault::Panicked(panic_message(payload.as_ref()))),
    };
    result.finalize();
    result
}

fn fault_result(spec: &StepSpec, fault: StepFault) -> StepResult {
    warn!("step '{}' faulted: {}", spec.name(), fault);
    StepResult::failed(spec.name(), format!("❌ {} failed: {}", spec.name(), fault))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CollabError;
    use crate::step::StepSpec;

    #[test]
    fn first_step_with_gating_still_runs() {
        let flow = FlowDefinition::new("solo",
                                       vec![StepSpec::depends_on_prior("only", |_| Ok(StepResult::success("only", "ran")))]);
        let results = FlowRunner::new().run(&flow);
        assert_eq!(results[0].status(), StepStatus::Success);
    }

    #[test]
    fn fault_becomes_failed_result_with_message() {
        let flow = FlowDefinition::new("fault",
                                       vec![StepSpec::independent("db", |_| {
                                           Err(CollabError::Database("connection refused".into()).into())
                                       })]);
        let results = FlowRunner::new().run(&flow);
        assert_eq!(results[0].status(), StepStatus::Failed);
        assert_eq!(results[0].title(), "db");
        assert!(results[0].details()[0].contains("connection refused"));
    }

    #[test]
    fn panic_is_contained() {
        let flow = FlowDefinition::new("panic",
                                       vec![StepSpec::independent("boom", |_| panic!("null pointer")),
                                            StepSpec::independent("after", |_| Ok(StepResult::success("after", "ok")))]);
        let results = FlowRunner::new().run(&flow);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status(), StepStatus::Failed);
        assert!(results[0].details()[0].contains("null pointer"));
        assert_eq!(results[1].status(), StepStatus::Success);
    }

    #[test]
    fn context_carries_index_and_names() {
        let flow = FlowDefinition::new("ctx",
                                       vec![StepSpec::independent("a", |_| Ok(StepResult::success("a", "ok"))),
                                            StepSpec::independent("b", |ctx| {
                                                Ok(StepResult::success(ctx.step_name,
                                                                       format!("{}#{}", ctx.flow_name, ctx.step_index)))
                                            })]);
        let results = FlowRunner::new().run(&flow);
        assert_eq!(results[1].title(), "b");
        assert_eq!(results[1].details()[0], "ctx#1");
    }
}

//! Resumen y reporte de una ejecución.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::step::{StepResult, StepStatus};

/// Conteos por estado y veredicto global (FAILED si algún paso falló).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_steps: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    pub overall_status: StepStatus,
}

impl RunSummary {
    pub fn from_results(results: &[StepResult]) -> Self {
        let count = |s: StepStatus| results.iter().filter(|r| r.status() == s).count();
        let failed_count = count(StepStatus::Failed);
        Self { total_steps: results.len(),
               success_count: count(StepStatus::Success),
               failed_count,
               skipped_count: count(StepStatus::Skipped),
               overall_status: if failed_count > 0 { StepStatus::Failed } else { StepStatus::Success } }
    }

    pub fn passed(&self) -> bool {
        self.overall_status == StepStatus::Success
    }
}

/// Documento que se entrega al llamador para reportar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub flow: String,
    pub definition_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub test_results: Vec<StepResult>,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_steps_do_not_fail_the_run() {
        let results = vec![StepResult::success("a", "ok"), StepResult::skipped("b", "skip")];
        let s = RunSummary::from_results(&results);
        assert_eq!((s.total_steps, s.success_count, s.failed_count, s.skipped_count), (2, 1, 0, 1));
        assert!(s.passed());
    }

    #[test]
    fn any_failure_fails_the_run() {
        let results = vec![StepResult::failed("a", "no"), StepResult::skipped("b", "skip")];
        let s = RunSummary::from_results(&results);
        assert_eq!(s.overall_status, StepStatus::Failed);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["overallStatus"], "FAILED");
        assert_eq!(v["failedCount"], 1);
    }
}

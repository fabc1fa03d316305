//! Selección y ejecución de flujos para la CLI.

use dh_adapters::{auth_flow, health_check_only, jwt_only, scenario_flow, unwired_scenario_flow, ScenarioCatalogue};
use dh_core::{FlowDefinition, FlowReport, FlowRunner};
use log::{info, warn};

use crate::errors::AppError;
use crate::wiring::Harness;

/// Qué ejecutar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Auth,
    Health,
    Jwt,
    Scenario(String),
    /// Autenticación y luego cada escenario del catálogo. Un escenario sin
    /// colaboradores (p. ej. sin `DATABASE_URL`) se reporta FAILED sin
    /// tumbar el resto de la corrida.
    All,
}

/// Arma las definiciones pedidas. Un escenario desconocido es error de uso.
pub fn flows_for(target: &Target, harness: &Harness, catalogue: &ScenarioCatalogue)
                 -> Result<Vec<FlowDefinition>, AppError> {
    let flows = match target {
        Target::Auth => vec![auth_flow(harness.auth_collaborators(), harness.auth_settings())],
        Target::Health => vec![health_check_only(harness.auth_collaborators())],
        Target::Jwt => vec![jwt_only(harness.auth_collaborators(), harness.auth_settings())],
        Target::Scenario(key) => {
            let cfg = catalogue.get(key)
                               .ok_or_else(|| AppError::UnknownScenario(key.clone(), catalogue.keys().join(", ")))?;
            vec![scenario_flow(cfg.clone(), harness.scenario_collaborators()?)]
        }
        Target::All => {
            let mut flows = vec![auth_flow(harness.auth_collaborators(), harness.auth_settings())];
            for cfg in catalogue.iter() {
                let flow = match harness.scenario_collaborators() {
                    Ok(c) => scenario_flow(cfg.clone(), c),
                    Err(e) => {
                        warn!("scenario '{}' not wired: {e}", cfg.key);
                        unwired_scenario_flow(cfg, e.to_string())
                    }
                };
                flows.push(flow);
            }
            flows
        }
    };
    Ok(flows)
}

pub fn run_flows(flows: &[FlowDefinition]) -> Vec<FlowReport> {
    let runner = FlowRunner::new();
    flows.iter()
         .map(|flow| {
             let report = runner.run_report(flow);
             info!("flow '{}' finished {}", report.flow, report.summary.overall_status);
             report
         })
         .collect()
}

/// 0 si todos los reportes pasaron, 1 si alguno falló.
pub fn exit_code(reports: &[FlowReport]) -> i32 {
    if reports.iter().all(|r| r.summary.passed()) {
        0
    } else {
        1
    }
}

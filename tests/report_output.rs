//! Forma del reporte JSON que imprime la CLI.

use std::rc::Rc;

use datahive_harness::{exit_code, flows_for, run_flows, AppConfig, Harness, Target};
use dh_adapters::{ScenarioCatalogue, StaticSecretStore};

fn harness() -> Harness {
    let config = AppConfig::from_lookup(|k| match k {
                     "DATAHIVE_ACCOUNT" => Some("acct".into()),
                     "DATAHIVE_USER" => Some("svc".into()),
                     "DATAHIVE_PUBLIC_KEY_FP" => Some("SHA256:abc".into()),
                     "DATAHIVE_WAREHOUSE_URL" => Some("http://127.0.0.1:9".into()),
                     _ => None,
                 }).unwrap();
    Harness::with_secrets(config, Rc::new(StaticSecretStore::new())).unwrap()
}

#[test]
fn jwt_report_serializes_results_and_summary() {
    let flows = flows_for(&Target::Jwt, &harness(), &ScenarioCatalogue::builtin()).unwrap();
    let reports = run_flows(&flows);
    let v = serde_json::to_value(&reports[0]).unwrap();

    assert_eq!(v["flow"], "datahive-jwt");
    assert!(v["definitionHash"].as_str().is_some_and(|h| !h.is_empty()));
    assert_eq!(v["summary"]["totalSteps"], 1);
    // sin clave privada en el almacén el paso falla, pero el reporte existe
    assert_eq!(v["testResults"][0]["status"], "FAILED");
    assert_eq!(v["summary"]["overallStatus"], "FAILED");
    assert!(v["testResults"][0]["details"][0].as_str().unwrap().contains("not found"));
    assert_eq!(exit_code(&reports), 1);
}

//! Plantilla de verificación por entidad.
//!
//! Un único flujo parametrizado por `ScenarioConfig`:
//! 1. Setup Test Data (independiente): siembra de fixtures.
//! 2. Call DataHive API: dispara la sincronización para la UEN.
//! 3. Query Warehouse Directly: consulta de referencia (sólo se registra).
//! 4. Verify Data Processing: aserciones positivas y negativas contra la base
//!    operacional.

use std::rc::Rc;

use dh_core::{CollabError, FlowDefinition, StepResult, UpsertOutcome};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::entity::{EntityTable, WarehouseView};
use super::fixtures::notice_fixtures;
use super::ScenarioCollaborators;
use crate::warehouse::{first_cell_count, row_count};

pub const SETUP_STEP: &str = "Setup Test Data";
pub const API_STEP: &str = "Call DataHive API";
pub const WAREHOUSE_STEP: &str = "Query Warehouse Directly";
pub const VERIFY_STEP: &str = "Verify Data Processing";

const VERIFICATION_ERROR: &str = "❌ VERIFICATION ERROR";
const BUSINESS_LOGIC: &str = "BUSINESS_LOGIC";
const OWNER_DRIVER_TABLE: &str = "ocms_offence_notice_owner_driver";
const SUSPENDED_NOTICE_TABLE: &str = "ocms_suspended_notice";

/// Valores sembrados en las tablas del aviso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeFixture {
    pub vehicle_no: String,
    pub pp_code: String,
    pub pp_name: String,
    /// Importe exacto en texto ("250.00").
    pub composition_amount: String,
    pub computer_rule_code: i64,
    pub chassis_number: String,
    pub make_description: String,
    pub primary_colour: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Nombre corto para la CLI ("board-only").
    pub key: String,
    pub label: String,
    pub uen: String,
    pub id_type: String,
    pub notice_no: String,
    /// Tablas que deben tener al menos una fila para la UEN.
    pub expected_populated: Vec<EntityTable>,
    pub expected_empty: Vec<EntityTable>,
    /// Vista de referencia; `None` consulta conteos en todas las vistas.
    pub reference_view: Option<WarehouseView>,
    /// Contenido esperado en la vista de referencia.
    pub expected_view_description: String,
    /// Campos que deben venir no nulos en la primera fila de la tabla
    /// poblada que los contiene.
    pub required_fields: Vec<String>,
    pub fixture: NoticeFixture,
}

impl ScenarioConfig {
    pub fn api_path(&self) -> String {
        format!("/api/datahive/test/uen/{}?noticeNumber={}", self.uen, self.notice_no)
    }

    /// Líneas con el resultado esperado por vista, en el orden de la respuesta.
    pub fn expected_warehouse_view(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            WarehouseView::ALL.iter()
                              .map(|v| {
                                  if Some(*v) == self.reference_view {
                                      format!("  - {}: ✅ {}", v.response_label(), self.expected_view_description)
                                  } else {
                                      format!("  - {}: ❌ Empty result set", v.response_label())
                                  }
                              })
                              .collect();
        if self.reference_view.is_none() {
            lines.push("  - All views return empty result sets".to_string());
        }
        lines
    }
}

/// Construye el flujo de cuatro pasos para un escenario.
pub fn scenario_flow(scenario: ScenarioConfig, collaborators: ScenarioCollaborators) -> FlowDefinition {
    let cfg = Rc::new(scenario);
    let c = Rc::new(collaborators);
    let name = format!("datahive-uen-{}", cfg.key);

    let (c1, s1) = (c.clone(), cfg.clone());
    let (c2, s2) = (c.clone(), cfg.clone());
    let (c3, s3) = (c.clone(), cfg.clone());
    let (c4, s4) = (c, cfg);
    FlowDefinition::builder(name).independent(SETUP_STEP, move |_| Ok(setup_test_data(&c1, &s1)))
                                 .then(API_STEP, move |_| Ok(call_api(&c2, &s2)))
                                 .then(WAREHOUSE_STEP, move |_| Ok(query_warehouse(&c3, &s3)))
                                 .then(VERIFY_STEP, move |_| Ok(verify_data_processing(&c4, &s4)))
                                 .build()
}

/// Flujo de un solo paso para un escenario cuyos colaboradores no se
/// pudieron armar: el setup falla con `reason` y el reporte queda FAILED.
pub fn unwired_scenario_flow(scenario: &ScenarioConfig, reason: impl Into<String>) -> FlowDefinition {
    let reason = reason.into();
    let uen = scenario.uen.clone();
    let name = format!("datahive-uen-{}", scenario.key);
    FlowDefinition::builder(name).independent(SETUP_STEP, move |_| Ok(wiring_failed(&uen, &reason)))
                                 .build()
}

fn wiring_failed(uen: &str, reason: &str) -> StepResult {
    let mut r = StepResult::failed(SETUP_STEP, format!("🔧 Setting up test data for UEN: {uen}"));
    r.add_detail(format!("❌ Scenario wiring failed: {reason}"));
    r
}

pub fn setup_test_data(c: &ScenarioCollaborators, cfg: &ScenarioConfig) -> StepResult {
    let mut r = StepResult::info(SETUP_STEP);
    r.add_detail(format!("🔧 Setting up test data for UEN: {}", cfg.uen));
    r.add_detail(format!("📝 Notice Number: {}", cfg.notice_no));
    r.add_detail(format!("🧪 Processing Type: {}", cfg.label));

    for fixture in notice_fixtures(cfg) {
        match c.store.upsert_fixture(&fixture) {
            Ok(UpsertOutcome::Reset { rows }) => {
                r.add_detail(format!("🔄 {} record reset: {} ({} rows updated)", fixture.label, cfg.notice_no, rows))
            }
            Ok(UpsertOutcome::Inserted { rows }) => {
                r.add_detail(format!("✅ {} record inserted: {} ({} rows inserted)",
                                     fixture.label, cfg.notice_no, rows))
            }
            Err(e) => {
                warn!("fixture '{}' failed: {e}", fixture.label);
                r.fail(format!("❌ Test data setup failed: {} ({e})", fixture.label));
                return r;
            }
        }
    }
    r.add_detail("✅ Test data setup completed successfully");
    r
}

pub fn call_api(c: &ScenarioCollaborators, cfg: &ScenarioConfig) -> StepResult {
    let mut r = StepResult::info(API_STEP);
    let path = cfg.api_path();
    r.add_detail(format!("🌐 Calling DataHive API for UEN: {}", cfg.uen));
    r.add_detail(format!("📡 API URL: {}", c.http.url_for(&path)));

    match c.http.get(&path) {
        Ok(resp) => {
            info!("DataHive API responded {} for {}", resp.status, cfg.uen);
            r.add_detail(format!("📊 Response Status: {}", resp.status));
            r.add_detail(format!("📄 Response Body: {}", resp.body));
            r.set_structured_data("apiResponse", json!({ "status": resp.status }));
        }
        Err(e) => {
            r.fail(format!("❌ DataHive API call failed: {e}"));
            return r;
        }
    }
    r.add_detail("🔍 Expected DataHive Response:");
    for line in cfg.expected_warehouse_view() {
        r.add_detail(line);
    }
    r
}

pub fn query_warehouse(c: &ScenarioCollaborators, cfg: &ScenarioConfig) -> StepResult {
    let mut r = StepResult::info(WAREHOUSE_STEP);
    r.add_detail(format!("🔍 Querying warehouse for UEN: {}", cfg.uen));

    match cfg.reference_view {
        Some(view) => {
            let Some(query) = view.select_query(&cfg.uen) else {
                r.fail(format!("❌ UEN '{}' cannot be used in a warehouse query", cfg.uen));
                return r;
            };
            r.add_detail(format!("📝 Warehouse Query: {query}"));
            match c.warehouse.execute_query(&query) {
                Ok(result) => {
                    r.add_detail("✅ Warehouse query executed successfully");
                    let rows = row_count(&result);
                    if let Some(n) = rows {
                        r.add_detail(format!("📊 Rows returned: {n}"));
                    }
                    r.set_structured_data("warehouseQuery",
                                          json!({ "view": view.name(), "query": query, "rowCount": rows }));
                }
                Err(e) => r.fail(format!("❌ Warehouse query failed: {e}")),
            }
            r.add_detail(format!("🔍 Expected Results: {}", cfg.expected_view_description));
        }
        None => {
            for view in WarehouseView::ALL {
                let Some(query) = view.count_query(&cfg.uen) else {
                    r.fail(format!("❌ UEN '{}' cannot be used in a warehouse query", cfg.uen));
                    return r;
                };
                r.add_detail(format!("📝 Warehouse Query: {query}"));
                match c.warehouse.execute_query(&query) {
                    Ok(result) => {
                        let count = first_cell_count(&result);
                        match count {
                            Some(n) => r.add_detail(format!("📊 {}: {n} record(s)", view.name())),
                            None => r.add_detail(format!("📊 {}: count not reported", view.name())),
                        }
                        r.merge_structured_data("warehouseCounts", json!({ view.name(): count }));
                    }
                    Err(e) => r.fail(format!("❌ Warehouse query failed for {}: {e}", view.name())),
                }
            }
            r.add_detail("🔍 Expected Results: 0 records in all views");
        }
    }
    // TODO: comparar estas filas con las leídas en la verificación en lugar de sólo registrarlas.
    r.add_detail("ℹ️ Warehouse rows are recorded for reference; they are not compared with the operational tables");
    r
}

pub fn verify_data_processing(c: &ScenarioCollaborators, cfg: &ScenarioConfig) -> StepResult {
    let mut r = StepResult::info(VERIFY_STEP);
    r.add_detail(format!("🔍 Starting comprehensive data verification for UEN: {}", cfg.uen));

    for table in &cfg.expected_populated {
        guarded(&mut r, table.category(), |r| verify_populated(c, cfg, *table, r));
    }
    for table in &cfg.expected_empty {
        guarded(&mut r, table.category(), |r| verify_empty(c, cfg, *table, r));
    }
    guarded(&mut r, BUSINESS_LOGIC, |r| verify_gazetted_flag(c, cfg, r));
    guarded(&mut r, BUSINESS_LOGIC, |r| verify_no_suspension(c, cfg, r));

    r.add_detail(format!("✅ Data processing verification completed for {} scenario", cfg.key));
    r
}

/// Ejecuta una aserción; un fallo del colaborador queda registrado con su
/// categoría y no corta las aserciones siguientes.
fn guarded<F>(r: &mut StepResult, category: &str, check: F)
    where F: FnOnce(&mut StepResult) -> Result<(), CollabError>
{
    if let Err(e) = check(r) {
        warn!("verification error [{category}]: {e}");
        r.fail(format!("{VERIFICATION_ERROR} [{category}]: {e}"));
    }
}

fn verify_populated(c: &ScenarioCollaborators,
                    cfg: &ScenarioConfig,
                    table: EntityTable,
                    r: &mut StepResult)
                    -> Result<(), CollabError> {
    r.add_detail(format!("🔍 Verifying {} information data", table.noun()));
    let columns = table.columns();
    let rows = c.store.select_rows(table.table(), &columns, table.key_column(), &cfg.uen)?;
    if rows.is_empty() {
        r.fail(format!("❌ [{}] No {} records found in database (expected at least 1)",
                       table.category(),
                       table.noun()));
        r.merge_structured_data(table.structured_key(), json!({ "recordCount": 0, "status": "missing" }));
        return Ok(());
    }
    r.add_detail(format!("✅ Found {} {} record(s)", rows.len(), table.noun()));

    for (i, row) in rows.iter().enumerate() {
        r.add_detail(format!("📋 {} {}:", table.record_label(), i + 1));
        for (col, label) in table.fields() {
            match row.get(*col) {
                Some(v) => r.add_detail(format!("  - {label}: {}", display(v))),
                None => r.fail(format!("❌ {} {}: field '{col}' missing from result", table.record_label(), i + 1)),
            }
        }
    }
    for field in cfg.required_fields.iter().filter(|f| columns.contains(&f.as_str())) {
        match rows[0].get(field.as_str()) {
            Some(Value::Null) | None => {
                r.fail(format!("❌ [{}] {field} not found - expected for {} scenario", table.category(), cfg.key))
            }
            Some(v) => r.add_detail(format!("✅ {field} found: {}", display(v))),
        }
    }
    r.merge_structured_data(table.structured_key(),
                            json!({ "recordCount": rows.len(), "records": rows, "status": "verified" }));
    r.add_detail(format!("✅ {} data comparison completed", table.record_label()));
    Ok(())
}

fn verify_empty(c: &ScenarioCollaborators,
                cfg: &ScenarioConfig,
                table: EntityTable,
                r: &mut StepResult)
                -> Result<(), CollabError> {
    r.add_detail(format!("🔍 Verifying no {} data for {} scenario", table.noun(), cfg.key));
    let count = c.store.count(table.table(), table.key_column(), &cfg.uen)?;
    r.merge_structured_data("noDataVerification", json!({ table.category(): count }));
    if count > 0 {
        r.fail(format!("❌ [{}] Unexpected {} records found: {count} (expected 0)",
                       table.category(),
                       table.noun()));
    } else {
        r.add_detail(format!("✅ No {} records found as expected", table.noun()));
    }
    Ok(())
}

fn verify_gazetted_flag(c: &ScenarioCollaborators, cfg: &ScenarioConfig, r: &mut StepResult) -> Result<(), CollabError> {
    r.add_detail("🔍 Verifying no business logic updates");
    let rows = c.store.select_rows(OWNER_DRIVER_TABLE, &["gazetted_flag"], "notice_no", &cfg.notice_no)?;
    let flag = rows.first().and_then(|row| row.get("gazetted_flag")).cloned().unwrap_or(Value::Null);
    r.merge_structured_data("businessLogicVerification", json!({ "gazettedFlag": flag }));
    match rows.first() {
        None => r.add_detail(format!("ℹ️ No owner/driver record found for notice {}", cfg.notice_no)),
        Some(_) if flag == Value::from("Y") => {
            r.fail("❌ Unexpected gazetted flag update found (expected no business logic changes)")
        }
        Some(_) => r.add_detail("✅ Gazetted flag unchanged as expected"),
    }
    Ok(())
}

fn verify_no_suspension(c: &ScenarioCollaborators, cfg: &ScenarioConfig, r: &mut StepResult) -> Result<(), CollabError> {
    let count = c.store.count(SUSPENDED_NOTICE_TABLE, "sr_no", &cfg.uen)?;
    r.merge_structured_data("businessLogicVerification", json!({ "suspensionCount": count, "status": "verified" }));
    if count > 0 {
        r.fail(format!("❌ Unexpected suspension records found: {count} (expected 0)"));
    } else {
        r.add_detail("✅ No suspension records found as expected");
    }
    Ok(())
}

fn display(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

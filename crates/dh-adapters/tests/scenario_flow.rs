//! Plantilla de escenarios por entidad con base, API y warehouse stub.

mod stubs;

use dh_adapters::{scenario_flow, EntityTable, ScenarioCatalogue, ScenarioConfig};
use dh_core::{CollabError, FlowRunner, StepResult, StepStatus};
use serde_json::json;
use stubs::*;

const BOARD: &str = "ocms_dh_acra_board_info";
const COMPANY: &str = "ocms_dh_acra_company_detail";
const SHAREHOLDER: &str = "ocms_dh_acra_shareholder_info";
const OWNER: &str = "ocms_offence_notice_owner_driver";

fn scenario(key: &str) -> ScenarioConfig {
    ScenarioCatalogue::builtin().get(key).cloned().unwrap()
}

fn board_row(person: &str) -> serde_json::Value {
    json!({ "person_id_no": person,
            "position_held_code": "D",
            "position_appointment_date": "2020-01-01",
            "position_withdrawn_date": null })
}

fn run(cfg: ScenarioConfig, store: FakeStore) -> Vec<StepResult> {
    let collab = scenario_collaborators(store, FakeApi::ok(200, "{\"ok\":true}"), FakeWarehouse::returning(json!({
                                            "resultSetMetaData": { "numRows": 3 },
                                            "data": [["S1"], ["S2"], ["S3"]]
                                        })));
    FlowRunner::new().run(&scenario_flow(cfg, collab))
}

fn has_line(r: &StepResult, needle: &str) -> bool {
    r.details().iter().any(|l| l.contains(needle))
}

#[test]
fn board_scenario_with_three_rows_succeeds() {
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1"), board_row("S2"), board_row("S3")]);
    let results = run(scenario("board-only"), store);

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.status() == StepStatus::Success), "{results:#?}");
    let verify = &results[3];
    assert!(has_line(verify, "✅ Found 3 board member record(s)"));
    assert!(has_line(verify, "📋 Board Member 3:"));
    assert!(has_line(verify, "✅ No company records found as expected"));
    assert_eq!(verify.structured("boardVerification").unwrap()["recordCount"], json!(3));
    assert_eq!(verify.structured("businessLogicVerification").unwrap()["suspensionCount"], json!(0));
}

#[test]
fn missing_expected_rows_fail_naming_the_category() {
    let results = run(scenario("board-only"), FakeStore::default());
    let verify = &results[3];
    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "❌ [BOARD] No board member records found in database (expected at least 1)"));
}

#[test]
fn unexpected_row_fails_but_later_assertions_still_run() {
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1")]).with_count(COMPANY, 1);
    let results = run(scenario("board-only"), store);
    let verify = &results[3];

    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "❌ [COMPANY] Unexpected company records found: 1 (expected 0)"));
    // las aserciones posteriores siguen apareciendo
    assert!(has_line(verify, "✅ No shareholder records found as expected"));
    assert!(has_line(verify, "✅ No suspension records found as expected"));
}

#[test]
fn collaborator_fault_in_one_assertion_is_reported_with_its_category() {
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1")])
                                    .broken(SHAREHOLDER, CollabError::Database("relation does not exist".into()));
    let results = run(scenario("board-only"), store);
    let verify = &results[3];
    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "❌ VERIFICATION ERROR [SHAREHOLDER]: database error: relation does not exist"));
    assert!(has_line(verify, "✅ No suspension records found as expected"));
}

#[test]
fn gazetted_flag_set_fails_business_logic_check() {
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1")])
                                    .with_rows(OWNER, vec![json!({ "gazetted_flag": "Y" })]);
    let results = run(scenario("board-only"), store);
    let verify = &results[3];
    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "❌ Unexpected gazetted flag update found"));
    assert_eq!(verify.structured("businessLogicVerification").unwrap()["gazettedFlag"], json!("Y"));
}

#[test]
fn deregistered_scenario_requires_deregistration_date() {
    let company = json!({ "entity_name": "DEREGISTERED TEST COMPANY PTE LTD",
                          "entity_type": "LC",
                          "registration_date": "2012-03-04",
                          "deregistration_date": null,
                          "entity_status_code": "D" });
    let results = run(scenario("deregistered-only"), FakeStore::default().with_rows(COMPANY, vec![company]));
    let verify = &results[3];
    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "deregistration_date not found"));
}

fn board_and_shareholder() -> ScenarioConfig {
    ScenarioConfig { key: "mixed-corporate".into(),
                     expected_populated: vec![EntityTable::BoardInfo, EntityTable::ShareholderInfo],
                     expected_empty: vec![EntityTable::CompanyDetail],
                     required_fields: vec!["share_allotted_no".into()],
                     ..scenario("board-only") }
}

#[test]
fn several_populated_tables_are_each_verified() {
    let shareholder = json!({ "person_id_no": "S9", "category": "1", "share_allotted_no": 1000 });
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1"), board_row("S2")])
                                    .with_rows(SHAREHOLDER, vec![shareholder]);
    let results = run(board_and_shareholder(), store);
    let verify = &results[3];

    assert_eq!(verify.status(), StepStatus::Success, "{verify:#?}");
    assert_eq!(verify.structured("boardVerification").unwrap()["recordCount"], json!(2));
    assert_eq!(verify.structured("shareholderVerification").unwrap()["recordCount"], json!(1));
    // el campo requerido sólo se exige en la tabla que lo tiene
    assert!(has_line(verify, "✅ share_allotted_no found: 1000"));
    assert!(has_line(verify, "✅ No company records found as expected"));
}

#[test]
fn one_missing_table_among_several_fails_only_its_category() {
    let store = FakeStore::default().with_rows(BOARD, vec![board_row("S1")]);
    let results = run(board_and_shareholder(), store);
    let verify = &results[3];

    assert_eq!(verify.status(), StepStatus::Failed);
    assert!(has_line(verify, "❌ [SHAREHOLDER] No shareholder records found in database (expected at least 1)"));
    assert_eq!(verify.structured("boardVerification").unwrap()["status"], json!("verified"));
    assert!(!has_line(verify, "[BOARD]"));
}

#[test]
fn not_found_scenario_counts_every_view_and_expects_nothing() {
    let cfg = scenario("not-found");
    assert!(cfg.expected_populated.is_empty());
    assert_eq!(cfg.expected_empty, EntityTable::ALL);

    let warehouse = FakeWarehouse::returning(json!({ "data": [["0"]] }));
    let collab = scenario_collaborators(FakeStore::default(), FakeApi::ok(404, "not found"), warehouse.clone());
    let results = FlowRunner::new().run(&scenario_flow(cfg, collab));

    assert!(results.iter().all(|r| r.status() == StepStatus::Success), "{results:#?}");
    assert_eq!(warehouse.queries.borrow().len(), 4);
    assert!(warehouse.queries.borrow().iter().all(|q| q.starts_with("SELECT COUNT(*)")));
    assert!(has_line(&results[1], "📊 Response Status: 404"));
    assert!(has_line(&results[1], "  - All views return empty result sets"));
}

#[test]
fn api_transport_failure_skips_the_rest() {
    let collab = scenario_collaborators(FakeStore::default(), FakeApi::down(), FakeWarehouse::new(true, false));
    let results = FlowRunner::new().run(&scenario_flow(scenario("shareholder-only"), collab));

    assert_eq!(results[0].status(), StepStatus::Success);
    assert_eq!(results[1].status(), StepStatus::Failed);
    assert!(has_line(&results[1], "❌ DataHive API call failed"));
    assert_eq!(results[2].status(), StepStatus::Skipped);
    assert_eq!(results[3].status(), StepStatus::Skipped);
}

#[test]
fn setup_failure_stops_after_first_fixture() {
    let store = FakeStore { fail_upsert: Some(CollabError::Database("connection reset".into())),
                            ..FakeStore::default() };
    let results = run(scenario("board-only"), store);
    assert_eq!(results[0].status(), StepStatus::Failed);
    assert!(has_line(&results[0], "❌ Test data setup failed"));
    assert!(results[1..].iter().all(|r| r.status() == StepStatus::Skipped));
}

#[test]
fn api_is_called_with_uen_and_notice() {
    let api = FakeApi::ok(200, "{}");
    let collab = scenario_collaborators(FakeStore::default().with_rows(BOARD, vec![board_row("S1")]),
                                        api.clone(),
                                        FakeWarehouse::new(true, false));
    FlowRunner::new().run(&scenario_flow(scenario("board-only"), collab));
    assert_eq!(*api.paths.borrow(), ["/api/datahive/test/uen/201234571E?noticeNumber=DHUEN005"]);
}

//! Catálogo de escenarios predefinidos, uno por tipo de entidad.

use super::entity::{EntityTable, WarehouseView};
use super::scenario::{NoticeFixture, ScenarioConfig};

#[derive(Debug, Clone)]
pub struct ScenarioCatalogue {
    scenarios: Vec<ScenarioConfig>,
}

impl ScenarioCatalogue {
    pub fn new(scenarios: Vec<ScenarioConfig>) -> Self {
        Self { scenarios }
    }

    /// Los cuatro escenarios de sincronización: sólo directorio, sólo
    /// accionistas, empresa dada de baja y UEN inexistente.
    pub fn builtin() -> Self {
        Self::new(vec![board_only(), shareholder_only(), deregistered_only(), not_found()])
    }

    pub fn get(&self, key: &str) -> Option<&ScenarioConfig> {
        self.scenarios.iter().find(|s| s.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioConfig> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

struct Seed {
    key: &'static str,
    label: &'static str,
    uen: &'static str,
    notice: &'static str,
    serial: u8,
    pp_name: &'static str,
    amount: &'static str,
    make: &'static str,
    colour: &'static str,
    owner: &'static str,
}

fn scenario(seed: Seed) -> ScenarioConfig {
    ScenarioConfig { key: seed.key.to_string(),
                     label: seed.label.to_string(),
                     uen: seed.uen.to_string(),
                     id_type: "B".to_string(),
                     notice_no: seed.notice.to_string(),
                     expected_populated: Vec::new(),
                     expected_empty: Vec::new(),
                     reference_view: None,
                     expected_view_description: String::new(),
                     required_fields: Vec::new(),
                     fixture: NoticeFixture { vehicle_no: format!("DHTEST{:03}", seed.serial),
                                              pp_code: format!("PP{:03}", seed.serial),
                                              pp_name: seed.pp_name.to_string(),
                                              composition_amount: seed.amount.to_string(),
                                              computer_rule_code: 10_000 + i64::from(seed.serial),
                                              chassis_number: format!("DHTEST{}", seed.uen),
                                              make_description: seed.make.to_string(),
                                              primary_colour: seed.colour.to_string(),
                                              owner_name: seed.owner.to_string() } }
}

fn board_only() -> ScenarioConfig {
    ScenarioConfig { expected_populated: vec![EntityTable::BoardInfo],
                     expected_empty: vec![EntityTable::CompanyDetail, EntityTable::ShareholderInfo],
                     reference_view: Some(WarehouseView::BoardInfoFull),
                     expected_view_description: "Board members with POSITION_HELD_CODE, APPOINTMENT_DATE".into(),
                     ..scenario(Seed { key: "board-only",
                                       label: "👔 Board Member Data Only",
                                       uen: "201234571E",
                                       notice: "DHUEN005",
                                       serial: 5,
                                       pp_name: "BOARD ONLY OFFENCE",
                                       amount: "250.00",
                                       make: "HONDA",
                                       colour: "BLUE",
                                       owner: "BOARD TEST COMPANY PTE LTD" }) }
}

fn shareholder_only() -> ScenarioConfig {
    ScenarioConfig { expected_populated: vec![EntityTable::ShareholderInfo],
                     expected_empty: vec![EntityTable::CompanyDetail, EntityTable::BoardInfo],
                     reference_view: Some(WarehouseView::ShareholderGz),
                     expected_view_description: "Multiple shareholders with PERSON_ID_NO, SHARE_ALLOTED_NO".into(),
                     ..scenario(Seed { key: "shareholder-only",
                                       label: "👥 Shareholder Data Only",
                                       uen: "201234570D",
                                       notice: "DHUEN004",
                                       serial: 4,
                                       pp_name: "SHAREHOLDER ONLY OFFENCE",
                                       amount: "200.00",
                                       make: "TOYOTA",
                                       colour: "WHITE",
                                       owner: "SHAREHOLDER TEST COMPANY PTE LTD" }) }
}

fn deregistered_only() -> ScenarioConfig {
    ScenarioConfig { expected_populated: vec![EntityTable::CompanyDetail],
                     expected_empty: vec![EntityTable::ShareholderInfo, EntityTable::BoardInfo],
                     reference_view: Some(WarehouseView::FirmInfoDeregistered),
                     expected_view_description: "Deregistered company with DEREG_DATE, DEREG_REASON".into(),
                     required_fields: vec!["deregistration_date".into()],
                     ..scenario(Seed { key: "deregistered-only",
                                       label: "🏢 Deregistered Company Only",
                                       uen: "201234569C",
                                       notice: "DHUEN003",
                                       serial: 3,
                                       pp_name: "DEREGISTERED COMPANY OFFENCE",
                                       amount: "150.00",
                                       make: "BMW",
                                       colour: "BLACK",
                                       owner: "DEREGISTERED TEST COMPANY PTE LTD" }) }
}

fn not_found() -> ScenarioConfig {
    ScenarioConfig { expected_empty: EntityTable::ALL.to_vec(),
                     ..scenario(Seed { key: "not-found",
                                       label: "🔍 Not Found Scenario (Graceful Handling)",
                                       uen: "201234574H",
                                       notice: "DHUEN008",
                                       serial: 8,
                                       pp_name: "NOT FOUND OFFENCE",
                                       amount: "50.00",
                                       make: "UNKNOWN",
                                       colour: "UNKNOWN",
                                       owner: "UNKNOWN COMPANY" }) }
}

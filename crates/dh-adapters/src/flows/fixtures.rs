//! Filas de fixture del aviso de infracción usadas por todos los escenarios.
//!
//! Cada escenario siembra tres filas (cabecera del aviso, detalle y
//! propietario/conductor) con semántica reset-or-insert.

use dh_core::{FixtureRow, FixtureValue};

use super::scenario::ScenarioConfig;

const AUDIT_USER: &str = "TEST_USER";

fn audited(row: FixtureRow) -> FixtureRow {
    row.set("upd_user_id", FixtureValue::text(AUDIT_USER))
       .set("upd_date", FixtureValue::now())
       .on_insert("cre_user_id", FixtureValue::text(AUDIT_USER))
       .on_insert("cre_date", FixtureValue::now())
}

/// Cabecera del aviso vigente (etapa ROV → RD1).
pub fn valid_offence_notice(cfg: &ScenarioConfig) -> FixtureRow {
    let f = &cfg.fixture;
    let row = FixtureRow::new("ocms_valid_offence_notice", "VON").key("notice_no", FixtureValue::text(&cfg.notice_no))
                                                                 .set("vehicle_no", FixtureValue::text(&f.vehicle_no))
                                                                 .set("offence_notice_type", FixtureValue::text("O"))
                                                                 .set("last_processing_stage", FixtureValue::text("ROV"))
                                                                 .set("next_processing_stage", FixtureValue::text("RD1"))
                                                                 .set("last_processing_date", FixtureValue::now())
                                                                 .set("next_processing_date", FixtureValue::DaysFromNow(1))
                                                                 .set("notice_date_and_time", FixtureValue::DaysFromNow(-1))
                                                                 .set("pp_code", FixtureValue::text(&f.pp_code))
                                                                 .set("pp_name", FixtureValue::text(&f.pp_name))
                                                                 .set("composition_amount", FixtureValue::Decimal(f.composition_amount.clone()))
                                                                 .set("computer_rule_code", FixtureValue::Int(f.computer_rule_code))
                                                                 .set("vehicle_category", FixtureValue::text("T"));
    audited(row)
}

pub fn offence_notice_detail(cfg: &ScenarioConfig) -> FixtureRow {
    let f = &cfg.fixture;
    let row = FixtureRow::new("ocms_offence_notice_detail", "OND").key("notice_no", FixtureValue::text(&cfg.notice_no))
                                                                  .set("lta_chassis_number", FixtureValue::text(&f.chassis_number))
                                                                  .set("lta_make_description", FixtureValue::text(&f.make_description))
                                                                  .set("lta_primary_colour", FixtureValue::text(&f.primary_colour));
    audited(row)
}

/// Propietario identificado por la UEN del escenario.
pub fn owner_driver(cfg: &ScenarioConfig) -> FixtureRow {
    let row = FixtureRow::new("ocms_offence_notice_owner_driver", "Owner/driver").key("notice_no", FixtureValue::text(&cfg.notice_no))
                                                                                 .key("owner_driver_indicator", FixtureValue::text("O"))
                                                                                 .key("id_type", FixtureValue::text(&cfg.id_type))
                                                                                 .key("id_no", FixtureValue::text(&cfg.uen))
                                                                                 .set("name", FixtureValue::text(&cfg.fixture.owner_name))
                                                                                 .on_insert("offender_indicator", FixtureValue::text("Y"));
    audited(row)
}

pub fn notice_fixtures(cfg: &ScenarioConfig) -> Vec<FixtureRow> {
    vec![valid_offence_notice(cfg), offence_notice_detail(cfg), owner_driver(cfg)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::catalogue::ScenarioCatalogue;

    #[test]
    fn owner_driver_is_keyed_by_notice_and_uen() {
        let cat = ScenarioCatalogue::builtin();
        let cfg = cat.get("board-only").unwrap();
        let row = owner_driver(cfg);
        let key: Vec<_> = row.key.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(key, ["notice_no", "owner_driver_indicator", "id_type", "id_no"]);
        assert_eq!(row.key[3].1, FixtureValue::text("201234571E"));
        assert!(row.insert_only.iter().any(|(c, _)| c == "cre_date"));
    }

    #[test]
    fn one_row_per_notice_table() {
        let cat = ScenarioCatalogue::builtin();
        let tables: Vec<_> = notice_fixtures(cat.get("not-found").unwrap()).into_iter().map(|f| f.table).collect();
        assert_eq!(tables,
                   ["ocms_valid_offence_notice", "ocms_offence_notice_detail", "ocms_offence_notice_owner_driver"]);
    }
}

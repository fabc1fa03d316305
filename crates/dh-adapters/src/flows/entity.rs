//! Tablas de registro corporativo (base operacional) y vistas del warehouse
//! de las que se alimentan.

use serde::{Deserialize, Serialize};

/// Tabla operacional poblada por el proceso de sincronización.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTable {
    CompanyDetail,
    ShareholderInfo,
    BoardInfo,
}

impl EntityTable {
    pub const ALL: [EntityTable; 3] = [EntityTable::CompanyDetail, EntityTable::ShareholderInfo, EntityTable::BoardInfo];

    pub fn table(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "ocms_dh_acra_company_detail",
            EntityTable::ShareholderInfo => "ocms_dh_acra_shareholder_info",
            EntityTable::BoardInfo => "ocms_dh_acra_board_info",
        }
    }

    /// Columna que guarda la clave de negocio (UEN).
    pub fn key_column(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "uen",
            EntityTable::ShareholderInfo => "company_uen",
            EntityTable::BoardInfo => "entity_uen",
        }
    }

    /// Columnas proyectadas al verificar filas, con su etiqueta de detalle.
    pub fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntityTable::CompanyDetail => &[("entity_name", "Entity Name"),
                                            ("entity_type", "Entity Type"),
                                            ("registration_date", "Registration Date"),
                                            ("deregistration_date", "Deregistration Date"),
                                            ("entity_status_code", "Status Code")],
            EntityTable::ShareholderInfo => &[("person_id_no", "Person ID"),
                                              ("category", "Category"),
                                              ("share_allotted_no", "Share Allotted")],
            EntityTable::BoardInfo => &[("person_id_no", "Person ID"),
                                        ("position_held_code", "Position Code"),
                                        ("position_appointment_date", "Appointment Date"),
                                        ("position_withdrawn_date", "Withdrawal Date")],
        }
    }

    pub fn columns(self) -> Vec<&'static str> {
        self.fields().iter().map(|(col, _)| *col).collect()
    }

    /// Categoría usada en las líneas de error de verificación.
    pub fn category(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "COMPANY",
            EntityTable::ShareholderInfo => "SHAREHOLDER",
            EntityTable::BoardInfo => "BOARD",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "company",
            EntityTable::ShareholderInfo => "shareholder",
            EntityTable::BoardInfo => "board member",
        }
    }

    pub fn record_label(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "Company",
            EntityTable::ShareholderInfo => "Shareholder",
            EntityTable::BoardInfo => "Board Member",
        }
    }

    pub fn structured_key(self) -> &'static str {
        match self {
            EntityTable::CompanyDetail => "companyVerification",
            EntityTable::ShareholderInfo => "shareholderVerification",
            EntityTable::BoardInfo => "boardVerification",
        }
    }
}

/// Vista del warehouse consultada como referencia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarehouseView {
    FirmInfoRegistered,
    FirmInfoDeregistered,
    ShareholderGz,
    BoardInfoFull,
}

impl WarehouseView {
    pub const ALL: [WarehouseView; 4] = [WarehouseView::FirmInfoRegistered,
                                         WarehouseView::FirmInfoDeregistered,
                                         WarehouseView::ShareholderGz,
                                         WarehouseView::BoardInfoFull];

    pub fn name(self) -> &'static str {
        match self {
            WarehouseView::FirmInfoRegistered => "V_DH_ACRA_FIRMINFO_R",
            WarehouseView::FirmInfoDeregistered => "V_DH_ACRA_FIRMINFO_D",
            WarehouseView::ShareholderGz => "V_DH_ACRA_SHAREHOLDER_GZ",
            WarehouseView::BoardInfoFull => "V_DH_ACRA_BOARD_INFO_FULL",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            WarehouseView::FirmInfoRegistered | WarehouseView::FirmInfoDeregistered => "UEN",
            WarehouseView::ShareholderGz => "COMPANY_UEN",
            WarehouseView::BoardInfoFull => "ENTITY_UEN",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            WarehouseView::FirmInfoRegistered | WarehouseView::FirmInfoDeregistered => {
                &["ENTITY_NAME",
                  "ENTITY_TYPE",
                  "REGISTRATION_DATE",
                  "DEREGISTRATION_DATE",
                  "ENTITY_STATUS_CODE",
                  "COMPANY_TYPE_CODE",
                  "UEN"]
            }
            WarehouseView::ShareholderGz => &["COMPANY_UEN",
                                              "SHAREHOLDER_CATEGORY",
                                              "SHAREHOLDER_COMPANY_PROFILE_UEN",
                                              "SHAREHOLDER_PERSON_ID_NO",
                                              "SHAREHOLDER_SHARE_ALLOTTED_NO"],
            WarehouseView::BoardInfoFull => &["POSITION_APPOINTMENT_DATE",
                                              "POSITION_WITHDRAWN_WITHDRAWAL_DATE",
                                              "PERSON_IDENTIFICATION_NUMBER",
                                              "ENTITY_UEN",
                                              "POSITION_HELD_CODE",
                                              "REFERENCE_PERIOD"],
        }
    }

    /// Nombre del bloque en la respuesta de la API bajo prueba.
    pub fn response_label(self) -> &'static str {
        match self {
            WarehouseView::FirmInfoRegistered => "Company Registration",
            WarehouseView::FirmInfoDeregistered => "Deregistered Info",
            WarehouseView::ShareholderGz => "Shareholder Info",
            WarehouseView::BoardInfoFull => "Board Info",
        }
    }

    /// El SQL API no admite parámetros enlazados en este uso; la UEN se
    /// interpola, por eso sólo se aceptan UEN alfanuméricas.
    pub fn select_query(self, uen: &str) -> Option<String> {
        safe_literal(uen).then(|| {
                             format!("SELECT {} FROM {} WHERE {} = '{}'",
                                     self.columns().join(", "),
                                     self.name(),
                                     self.key_column(),
                                     uen)
                         })
    }

    pub fn count_query(self, uen: &str) -> Option<String> {
        safe_literal(uen).then(|| {
                             format!("SELECT COUNT(*) as record_count FROM {} WHERE {} = '{}'",
                                     self.name(),
                                     self.key_column(),
                                     uen)
                         })
    }
}

fn safe_literal(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

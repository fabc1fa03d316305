//! Flujos de verificación construidos sobre `dh-core`.

use std::rc::Rc;

use dh_core::{HttpClient, RelationalStore, SecretStore, TokenIssuer, WarehouseClient};

pub mod auth;
pub mod catalogue;
pub mod entity;
pub mod fixtures;
pub mod scenario;

pub use auth::{auth_flow, health_check_only, jwt_only, AuthSettings};
pub use catalogue::ScenarioCatalogue;
pub use entity::{EntityTable, WarehouseView};
pub use scenario::{scenario_flow, unwired_scenario_flow, NoticeFixture, ScenarioConfig};

/// Colaboradores del flujo de autenticación.
#[derive(Clone)]
pub struct AuthCollaborators {
    pub tokens: Rc<dyn TokenIssuer>,
    pub secrets: Rc<dyn SecretStore>,
    pub warehouse: Rc<dyn WarehouseClient>,
}

/// Colaboradores de los escenarios por entidad.
#[derive(Clone)]
pub struct ScenarioCollaborators {
    pub store: Rc<dyn RelationalStore>,
    pub http: Rc<dyn HttpClient>,
    pub warehouse: Rc<dyn WarehouseClient>,
}

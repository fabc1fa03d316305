//! dh-adapters: colaboradores concretos y flujos de verificación.
//!
//! - `auth`: emisión de JWT RS256 y armado de cabeceras de autenticación.
//! - `secrets`: almacenes de secretos (variables de entorno / memoria).
//! - `warehouse`: cliente del SQL API del warehouse (POST + sondeo).
//! - `http`: cliente HTTP bloqueante para la API bajo prueba.
//! - `flows`: flujo de autenticación, plantilla de escenarios por entidad y
//!   catálogo de escenarios.
//!
//! Los flujos sólo dependen de los traits de `dh-core`; los tests los
//! ejercitan con colaboradores stub.

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod secrets;
pub mod warehouse;

pub use auth::{public_key_fingerprint, AuthHeaders, JwtSettings, JwtTokenIssuer};
pub use error::AdapterError;
pub use flows::{auth_flow, health_check_only, jwt_only, scenario_flow, unwired_scenario_flow, AuthCollaborators,
                AuthSettings, EntityTable, ScenarioCatalogue, ScenarioCollaborators, ScenarioConfig, WarehouseView};
pub use http::BlockingHttpClient;
pub use secrets::{EnvSecretStore, StaticSecretStore};
pub use warehouse::{SqlApiWarehouseClient, WarehouseSettings};

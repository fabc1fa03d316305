//! dh-persistence
//!
//! Implementación Postgres (Diesel + r2d2) del `RelationalStore` del core:
//! conteos, lecturas proyectadas y upserts de fixtures, todo acotado a un
//! esquema fijo de la base operacional.
//!
//! Módulos:
//! - `pg`: pool de conexiones, reintentos y `PgRelationalStore`.
//! - `sql`: construcción de sentencias parametrizadas (sin IO).
//! - `config`: carga de configuración desde .env.

pub mod config;
pub mod error;
pub mod pg;
pub mod sql;

pub use config::DbConfig;
pub use error::PersistenceError;
pub use pg::{build_pool, ConnectionProvider, PgPool, PgRelationalStore, PoolProvider};

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Text};
use dh_core::{CollabError, FixtureRow, RelationalStore, Row, UpsertOutcome};
use log::debug;

use super::{with_retry, ConnectionProvider, PgPool, PoolProvider};
use crate::error::PersistenceError;
use crate::sql::{self, Bind, Statement};

#[derive(QueryableByName, Debug)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName, Debug)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    row: String,
}

fn prepare(st: &Statement) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    st.binds
      .iter()
      .fold(diesel::sql_query(st.sql.clone()).into_boxed::<Pg>(), |q, b| match b {
          Bind::Text(s) => q.bind::<Text, _>(s.clone()),
          Bind::Int(i) => q.bind::<BigInt, _>(*i),
      })
}

/// `RelationalStore` sobre Postgres, acotado a un esquema.
pub struct PgRelationalStore<P: ConnectionProvider> {
    provider: P,
    schema: String,
}

impl<P: ConnectionProvider> PgRelationalStore<P> {
    pub fn new(provider: P, schema: impl Into<String>) -> Self {
        Self { provider,
               schema: schema.into() }
    }
}

impl PgRelationalStore<PoolProvider> {
    pub fn with_pool(pool: PgPool, schema: impl Into<String>) -> Self {
        Self::new(PoolProvider { pool }, schema)
    }
}

impl<P: ConnectionProvider> PgRelationalStore<P> {
    fn count_rows(&self, st: &Statement) -> Result<i64, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            let row = prepare(st).get_result::<CountRow>(&mut conn)?;
            Ok(row.count)
        })
    }

    fn load_rows(&self, st: &Statement) -> Result<Vec<Row>, PersistenceError> {
        let raw = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(prepare(st).load::<JsonRow>(&mut conn)?)
        })?;
        raw.into_iter()
           .map(|r| serde_json::from_str::<Row>(&r.row).map_err(|e| PersistenceError::Unknown(format!("row decode: {e}"))))
           .collect()
    }

    fn upsert(&self, fixture: &FixtureRow) -> Result<UpsertOutcome, PersistenceError> {
        let exists = sql::fixture_exists(&self.schema, fixture)?;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.transaction::<_, PersistenceError, _>(|tx| {
                    let existing = prepare(&exists).get_result::<CountRow>(tx)?.count;
                    if existing > 0 {
                        let update = sql::fixture_update(&self.schema, fixture)?;
                        let rows = prepare(&update).execute(tx)?;
                        Ok(UpsertOutcome::Reset { rows })
                    } else {
                        let insert = sql::fixture_insert(&self.schema, fixture)?;
                        let rows = prepare(&insert).execute(tx)?;
                        Ok(UpsertOutcome::Inserted { rows })
                    }
                })
        })
    }
}

impl<P: ConnectionProvider> RelationalStore for PgRelationalStore<P> {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn count(&self, table: &str, column: &str, value: &str) -> Result<i64, CollabError> {
        let st = sql::count(&self.schema, table, column, value)?;
        debug!("count {table}.{column}={value}");
        Ok(self.count_rows(&st)?)
    }

    fn select_rows(&self, table: &str, columns: &[&str], column: &str, value: &str) -> Result<Vec<Row>, CollabError> {
        let st = sql::select_rows(&self.schema, table, columns, column, value)?;
        debug!("select {table}.{column}={value}");
        Ok(self.load_rows(&st)?)
    }

    fn upsert_fixture(&self, fixture: &FixtureRow) -> Result<UpsertOutcome, CollabError> {
        let outcome = self.upsert(fixture)?;
        debug!("fixture '{}' -> {:?}", fixture.label, outcome);
        Ok(outcome)
    }
}

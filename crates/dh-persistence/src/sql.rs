//! Construcción de sentencias parametrizadas.
//!
//! Los nombres de tabla y columna no se pueden bindear, así que se validan
//! como identificadores simples (`[A-Za-z_][A-Za-z0-9_]*`) antes de
//! interpolarlos. Los valores viajan siempre como parámetros `$n`, salvo las
//! marcas de tiempo relativas, que se renderizan como expresión SQL a partir
//! de un entero.

use dh_core::{FixtureRow, FixtureValue};

use crate::error::PersistenceError;

/// Valor a bindear en la posición `$n` correspondiente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Int(i64),
}

/// Sentencia lista para ejecutar: texto + binds en orden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Bind>,
}

pub fn validate_identifier(id: &str) -> Result<&str, PersistenceError> {
    let mut chars = id.chars();
    let valid_head = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(id)
    } else {
        Err(PersistenceError::InvalidIdentifier(id.to_string()))
    }
}

pub fn qualified(schema: &str, table: &str) -> Result<String, PersistenceError> {
    Ok(format!("{}.{}", validate_identifier(schema)?, validate_identifier(table)?))
}

pub fn count(schema: &str, table: &str, column: &str, value: &str) -> Result<Statement, PersistenceError> {
    Ok(Statement { sql: format!("SELECT COUNT(*) AS count FROM {} WHERE {} = $1",
                                qualified(schema, table)?,
                                validate_identifier(column)?),
                   binds: vec![Bind::Text(value.to_string())] })
}

/// Cada fila sale como un único texto JSON (`row_to_json`), para poder leer
/// proyecciones arbitrarias sin declarar structs por tabla.
pub fn select_rows(schema: &str,
                   table: &str,
                   columns: &[&str],
                   column: &str,
                   value: &str)
                   -> Result<Statement, PersistenceError> {
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.iter()
               .map(|c| validate_identifier(c))
               .collect::<Result<Vec<_>, _>>()?
               .join(", ")
    };
    Ok(Statement { sql: format!("SELECT row_to_json(q)::text AS row FROM (SELECT {} FROM {} WHERE {} = $1) q",
                                projection,
                                qualified(schema, table)?,
                                validate_identifier(column)?),
                   binds: vec![Bind::Text(value.to_string())] })
}

pub fn fixture_exists(schema: &str, fixture: &FixtureRow) -> Result<Statement, PersistenceError> {
    let mut binds = Vec::new();
    let predicate = where_clause(&fixture.key, &mut binds)?;
    Ok(Statement { sql: format!("SELECT COUNT(*) AS count FROM {} WHERE {}",
                                qualified(schema, &fixture.table)?,
                                predicate),
                   binds })
}

pub fn fixture_update(schema: &str, fixture: &FixtureRow) -> Result<Statement, PersistenceError> {
    if fixture.values.is_empty() {
        return Err(PersistenceError::Unknown(format!("fixture '{}' has no columns to reset", fixture.label)));
    }
    let mut binds = Vec::new();
    let assignments = fixture.values
                             .iter()
                             .map(|(col, v)| -> Result<String, PersistenceError> {
                                 Ok(format!("{} = {}", validate_identifier(col)?, render(v, &mut binds)))
                             })
                             .collect::<Result<Vec<_>, PersistenceError>>()?
                             .join(", ");
    let predicate = where_clause(&fixture.key, &mut binds)?;
    Ok(Statement { sql: format!("UPDATE {} SET {} WHERE {}",
                                qualified(schema, &fixture.table)?,
                                assignments,
                                predicate),
                   binds })
}

pub fn fixture_insert(schema: &str, fixture: &FixtureRow) -> Result<Statement, PersistenceError> {
    let mut binds = Vec::new();
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for (col, v) in fixture.key.iter().chain(&fixture.values).chain(&fixture.insert_only) {
        columns.push(validate_identifier(col)?);
        values.push(render(v, &mut binds));
    }
    Ok(Statement { sql: format!("INSERT INTO {} ({}) VALUES ({})",
                                qualified(schema, &fixture.table)?,
                                columns.join(", "),
                                values.join(", ")),
                   binds })
}

fn where_clause(key: &[(String, FixtureValue)], binds: &mut Vec<Bind>) -> Result<String, PersistenceError> {
    if key.is_empty() {
        return Err(PersistenceError::Unknown("fixture without key columns".into()));
    }
    key.iter()
       .map(|(col, v)| -> Result<String, PersistenceError> {
           let col = validate_identifier(col)?;
           Ok(match v {
               FixtureValue::Null => format!("{col} IS NULL"),
               other => format!("{col} = {}", render(other, binds)),
           })
       })
       .collect::<Result<Vec<_>, PersistenceError>>()
       .map(|parts| parts.join(" AND "))
}

fn render(value: &FixtureValue, binds: &mut Vec<Bind>) -> String {
    match value {
        FixtureValue::Text(s) => {
            binds.push(Bind::Text(s.clone()));
            format!("${}", binds.len())
        }
        FixtureValue::Int(i) => {
            binds.push(Bind::Int(*i));
            format!("${}", binds.len())
        }
        FixtureValue::Decimal(d) => {
            binds.push(Bind::Text(d.clone()));
            format!("CAST(${} AS NUMERIC)", binds.len())
        }
        FixtureValue::DaysFromNow(0) => "NOW()".to_string(),
        FixtureValue::DaysFromNow(days) => format!("NOW() + INTERVAL '{days} days'"),
        FixtureValue::Null => "NULL".to_string(),
    }
}

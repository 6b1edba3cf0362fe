//! Per-entity statements that are not expressed as a [`Query`](see_data::Query).

use see_data::{Dialect, Entity, QueryError, Value};

/// `id` followed by the entity's columns, the projection used by every fetch.
pub fn select_columns<E: Entity>() -> Vec<&'static str> {
    std::iter::once(E::id_column())
        .chain(E::columns().iter().copied())
        .collect()
}

/// Placeholder for `value`, or a literal `NULL`.
///
/// NULLs are written inline so the engine infers the column type; a bound NULL
/// would carry the driver's placeholder type instead.
fn operand(dialect: Dialect, value: Value, params: &mut Vec<Value>) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }
    params.push(value);
    dialect.placeholder(params.len())
}

/// `INSERT INTO table (columns) VALUES (...)`, optionally `RETURNING id`.
///
/// Returns the statement and its bound parameters.
pub fn insert<E: Entity>(
    dialect: Dialect,
    entity: &E,
    returning: bool,
) -> Result<(String, Vec<Value>), QueryError> {
    let table = dialect.quote_identifier(E::table_name())?;
    let mut params = Vec::new();
    let mut sql = if E::columns().is_empty() {
        match dialect {
            Dialect::MySql => format!("INSERT INTO {table} () VALUES ()"),
            Dialect::Sqlite | Dialect::Postgres => format!("INSERT INTO {table} DEFAULT VALUES"),
        }
    } else {
        let columns = E::columns()
            .iter()
            .map(|c| dialect.quote_identifier(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let values = entity
            .values()
            .into_iter()
            .map(|value| operand(dialect, value, &mut params))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {table} ({columns}) VALUES ({values})")
    };
    if returning {
        sql.push_str(" RETURNING ");
        sql.push_str(&dialect.quote_identifier(E::id_column())?);
    }
    Ok((sql, params))
}

/// Full-row replace by primary key.
pub fn update<E: Entity>(dialect: Dialect, entity: &E) -> Result<(String, Vec<Value>), QueryError> {
    let table = dialect.quote_identifier(E::table_name())?;
    let id = dialect.quote_identifier(E::id_column())?;
    let mut params = Vec::new();

    let assignments = if E::columns().is_empty() {
        format!("{id} = {}", operand(dialect, Value::Int(entity.id()), &mut params))
    } else {
        E::columns()
            .iter()
            .zip(entity.values())
            .map(|(c, value)| {
                let column = dialect.quote_identifier(c)?;
                Ok(format!("{column} = {}", operand(dialect, value, &mut params)))
            })
            .collect::<Result<Vec<_>, QueryError>>()?
            .join(", ")
    };
    let sql = format!(
        "UPDATE {table} SET {assignments} WHERE {id} = {}",
        operand(dialect, Value::Int(entity.id()), &mut params)
    );
    Ok((sql, params))
}

pub fn delete<E: Entity>(dialect: Dialect, entity: &E) -> Result<(String, Vec<Value>), QueryError> {
    let table = dialect.quote_identifier(E::table_name())?;
    let id = dialect.quote_identifier(E::id_column())?;
    let sql = format!("DELETE FROM {table} WHERE {id} = {}", dialect.placeholder(1));
    Ok((sql, vec![Value::Int(entity.id())]))
}

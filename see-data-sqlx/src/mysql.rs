//! MySQL backend. MySQL has no `RETURNING`, so the id comes from `LAST_INSERT_ID()`.

use see_data::{DataError, Dialect, Entity};
use sqlx::mysql::{MySql, MySqlConnection, MySqlRow};

use crate::error::SqlxErrorExt;
use crate::statement;

async fn insert_last_id<E: Entity>(
    conn: &mut MySqlConnection,
    mut entity: E,
) -> Result<E, DataError> {
    let (sql, values) = statement::insert(Dialect::MySql, &entity, false)?;
    tracing::debug!(table = E::table_name(), %sql, "Executing statement");
    let result = bind_values!(sqlx::query::<MySql>(&sql), &values)
        .execute(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_data_error)?;
    let id = i64::try_from(result.last_insert_id())
        .map_err(|_| DataError::Other(format!("Generated id out of range: {}", result.last_insert_id())))?;
    entity.set_id(id);
    Ok(entity)
}

impl_sqlx_provider!(MySql, MySqlRow, Dialect::MySql, insert_last_id);

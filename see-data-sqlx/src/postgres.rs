//! PostgreSQL backend.

use see_data::{DataError, Dialect, Entity};
use sqlx::postgres::{PgConnection, PgRow, Postgres};

use crate::error::SqlxErrorExt;
use crate::statement;

async fn insert_returning<E: Entity>(
    conn: &mut PgConnection,
    mut entity: E,
) -> Result<E, DataError> {
    let (sql, values) = statement::insert(Dialect::Postgres, &entity, true)?;
    tracing::debug!(table = E::table_name(), %sql, "Executing statement");
    let id: i64 = bind_values!(sqlx::query_scalar::<Postgres, i64>(&sql), &values)
        .fetch_one(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_data_error)?;
    entity.set_id(id);
    Ok(entity)
}

impl_sqlx_provider!(Postgres, PgRow, Dialect::Postgres, insert_returning);

use std::time::Duration;

use see_data::DataError;
use sqlx::pool::PoolOptions;
use sqlx::{Database, Pool};

use crate::error::SqlxErrorExt;

/// [`DataProvider`](see_data::DataProvider) over an `sqlx::Pool<DB>`.
///
/// Every operation checks a connection out of the pool and returns it before
/// completing; the provider itself is a cheap, cloneable handle.
///
/// # Example
///
/// ```ignore
/// let provider = SqlxDataProvider::<Sqlite>::connect("sqlite::memory:", 5).await?;
/// let repo = EntityRepository::<Member, _>::new(provider);
/// ```
pub struct SqlxDataProvider<DB: Database> {
    pool: Pool<DB>,
}

impl<DB: Database> Clone for SqlxDataProvider<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl<DB: Database> SqlxDataProvider<DB> {
    /// Open a pool for `url`.
    ///
    /// An in-memory SQLite database lives only as long as its connection, so
    /// `:memory:` URLs get a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DataError> {
        let options = if url.contains(":memory:") {
            PoolOptions::<DB>::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            PoolOptions::<DB>::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(Duration::from_secs(30))
        };
        let pool = options
            .connect(url)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        tracing::info!(
            backend = DB::NAME,
            max_connections = pool.options().get_max_connections(),
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: Pool<DB>) -> Self {
        Self { pool }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

/// Bind every [`Value`](see_data::Value) to an sqlx query, query_as or query_scalar.
macro_rules! bind_values {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for value in $params {
            query = match value {
                ::see_data::Value::Null => query.bind(None::<i64>),
                ::see_data::Value::Int(v) => query.bind(*v),
                ::see_data::Value::Float(v) => query.bind(*v),
                ::see_data::Value::Bool(v) => query.bind(*v),
                ::see_data::Value::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }};
}

/// Implement `DataProvider` and `EntityProvider<E>` for one concrete backend.
///
/// `$insert` inserts a single entity on a connection and returns it with its
/// generated id; it is the only step that differs between engines.
macro_rules! impl_sqlx_provider {
    ($db:ty, $row:ty, $dialect:expr, $insert:path) => {
        impl ::see_data::DataProvider for $crate::provider::SqlxDataProvider<$db> {
            type Tx = $crate::tx::Tx<$db>;

            async fn begin(&self) -> Result<Self::Tx, ::see_data::DataError> {
                let tx = self
                    .pool()
                    .begin()
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok($crate::tx::Tx::new(tx))
            }

            async fn commit(&self, tx: Self::Tx) -> Result<(), ::see_data::DataError> {
                tx.commit().await
            }

            async fn execute_raw(
                &self,
                sql: &str,
                params: &[::see_data::Value],
            ) -> Result<u64, ::see_data::DataError> {
                tracing::debug!(%sql, "Executing raw statement");
                let result = bind_values!(sqlx::query::<$db>(sql), params)
                    .execute(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok(result.rows_affected())
            }
        }

        impl<E> ::see_data::EntityProvider<E> for $crate::provider::SqlxDataProvider<$db>
        where
            E: ::see_data::Entity + for<'r> sqlx::FromRow<'r, $row>,
        {
            async fn insert(&self, entity: E) -> Result<E, ::see_data::DataError> {
                let mut conn = self
                    .pool()
                    .acquire()
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                $insert(&mut *conn, entity).await
            }

            async fn bulk_insert(
                &self,
                tx: &mut Self::Tx,
                entities: Vec<E>,
            ) -> Result<Vec<E>, ::see_data::DataError> {
                let mut inserted = Vec::with_capacity(entities.len());
                for entity in entities {
                    inserted.push($insert(tx.connection(), entity).await?);
                }
                Ok(inserted)
            }

            async fn update(&self, entity: &E) -> Result<u64, ::see_data::DataError> {
                let (sql, params) = $crate::statement::update($dialect, entity)?;
                tracing::debug!(table = E::table_name(), %sql, "Executing statement");
                let result = bind_values!(sqlx::query::<$db>(&sql), &params)
                    .execute(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok(result.rows_affected())
            }

            async fn bulk_update(&self, entities: &[E]) -> Result<u64, ::see_data::DataError> {
                let mut updated = 0;
                for entity in entities {
                    updated += ::see_data::EntityProvider::<E>::update(self, entity).await?;
                }
                Ok(updated)
            }

            async fn delete(&self, entity: &E) -> Result<u64, ::see_data::DataError> {
                let (sql, params) = $crate::statement::delete($dialect, entity)?;
                tracing::debug!(table = E::table_name(), %sql, "Executing statement");
                let result = bind_values!(sqlx::query::<$db>(&sql), &params)
                    .execute(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok(result.rows_affected())
            }

            async fn bulk_delete(
                &self,
                tx: &mut Self::Tx,
                entities: &[E],
            ) -> Result<u64, ::see_data::DataError> {
                let mut deleted = 0;
                for chunk in entities.chunks(::see_data::IN_LIST_CHUNK) {
                    let ids = chunk.iter().map(|entity| entity.id());
                    let predicate = ::see_data::Query::new().where_in(E::id_column(), ids);
                    deleted += ::see_data::EntityProvider::<E>::delete_where(self, tx, &predicate).await?;
                }
                Ok(deleted)
            }

            async fn delete_where(
                &self,
                tx: &mut Self::Tx,
                predicate: &::see_data::Query,
            ) -> Result<u64, ::see_data::DataError> {
                let (sql, params) = predicate.build_delete(E::table_name(), $dialect)?;
                tracing::debug!(table = E::table_name(), %sql, "Executing statement");
                let result = bind_values!(sqlx::query::<$db>(&sql), &params)
                    .execute(tx.connection())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok(result.rows_affected())
            }

            async fn count(&self, query: &::see_data::Query) -> Result<u64, ::see_data::DataError> {
                let (sql, params) = query.build_count(E::table_name(), $dialect)?;
                tracing::debug!(table = E::table_name(), %sql, "Executing statement");
                let count: i64 = bind_values!(sqlx::query_scalar::<$db, i64>(&sql), &params)
                    .fetch_one(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)?;
                Ok(u64::try_from(count).unwrap_or_default())
            }

            async fn fetch(&self, query: &::see_data::Query) -> Result<Vec<E>, ::see_data::DataError> {
                let columns = $crate::statement::select_columns::<E>();
                let (sql, params) = query.build_select(E::table_name(), &columns, $dialect)?;
                tracing::debug!(table = E::table_name(), %sql, "Executing statement");
                bind_values!(sqlx::query_as::<$db, E>(&sql), &params)
                    .fetch_all(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)
            }

            async fn query_raw(
                &self,
                sql: &str,
                params: &[::see_data::Value],
            ) -> Result<Vec<E>, ::see_data::DataError> {
                tracing::debug!(table = E::table_name(), %sql, "Executing raw query");
                bind_values!(sqlx::query_as::<$db, E>(sql), params)
                    .fetch_all(self.pool())
                    .await
                    .map_err($crate::error::SqlxErrorExt::into_data_error)
            }
        }
    };
}

use std::future::Future;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::DataError;
use crate::query::Query;
use crate::value::Value;

/// Owner of the physical database connection.
///
/// A provider is a cheap, cloneable handle (usually around a pool) and keeps no
/// state between calls: each operation obtains a connection, uses it, and
/// releases it before returning.
///
/// Multi-row writes run inside an explicit [`Tx`](DataProvider::Tx): the
/// caller obtains it with [`begin`](DataProvider::begin) and hands it back to
/// [`commit`](DataProvider::commit). Dropping an uncommitted `Tx` rolls it back.
pub trait DataProvider: Clone + Send + Sync + 'static {
    type Tx: Send;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, DataError>> + Send;

    fn commit(&self, tx: Self::Tx) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Execute a statement outside the entity model and return the affected row count.
    ///
    /// `params` are always bound, never spliced into `sql`; placeholders use the
    /// engine's native syntax.
    fn execute_raw(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<u64, DataError>> + Send {
        let _ = (sql, params);
        async { Err(DataError::NotImplemented("execute_raw")) }
    }
}

/// Entity operations of a [`DataProvider`] for one entity type.
///
/// Updates and deletes by primary key never fail on a missing row: they
/// report zero affected rows instead.
pub trait EntityProvider<E: Entity>: DataProvider {
    /// Insert one row and return the entity carrying its generated id.
    fn insert(&self, entity: E) -> impl Future<Output = Result<E, DataError>> + Send;

    /// Insert every entity inside `tx`, returning them with their ids.
    fn bulk_insert(
        &self,
        tx: &mut Self::Tx,
        entities: Vec<E>,
    ) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    /// Replace the row matching the entity's primary key.
    fn update(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Replace several rows, one statement each. Atomicity is whatever the
    /// engine gives a sequence of independent statements.
    fn bulk_update(&self, entities: &[E]) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn delete(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn bulk_delete(
        &self,
        tx: &mut Self::Tx,
        entities: &[E],
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Delete every row matching `predicate` and return how many were removed.
    fn delete_where(
        &self,
        tx: &mut Self::Tx,
        predicate: &Query,
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Count rows matching the query's predicate.
    fn count(&self, query: &Query) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Materialize the rows selected by `query`.
    fn fetch(&self, query: &Query) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    /// Run a raw `SELECT` and map every row to `E`. Parameters are bound.
    fn query_raw(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<E>, DataError>> + Send {
        let _ = (sql, params);
        async { Err(DataError::NotImplemented("query_raw")) }
    }

    /// A lazily evaluated view over every row of `E`'s table.
    fn table(&self) -> Table<'_, E, Self>
    where
        Self: Sized,
    {
        Table::new(self)
    }
}

/// Deferred query over one entity table.
///
/// Building a `Table` does no I/O; the query runs when [`count`](Table::count),
/// [`first`](Table::first) or [`to_list`](Table::to_list) is awaited.
pub struct Table<'p, E, P> {
    provider: &'p P,
    query: Query,
    _marker: PhantomData<fn() -> E>,
}

impl<'p, E, P> Table<'p, E, P>
where
    E: Entity,
    P: EntityProvider<E>,
{
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            query: Query::new(),
            _marker: PhantomData,
        }
    }

    /// Narrow the view with another query (conditions and ordering are appended).
    pub fn filter(mut self, query: Query) -> Self {
        self.query = self.query.and(query);
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.query = self.query.order_by(column, ascending);
        self
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.query = self.query.offset(count);
        self
    }

    pub fn take(mut self, count: u64) -> Self {
        self.query = self.query.limit(count);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Number of rows matching the predicate; skip and take are ignored.
    pub async fn count(&self) -> Result<u64, DataError> {
        self.provider.count(&self.query).await
    }

    /// First row in the view's order, if any.
    pub async fn first(self) -> Result<Option<E>, DataError> {
        let query = self.query.limit(1);
        Ok(self.provider.fetch(&query).await?.into_iter().next())
    }

    pub async fn to_list(self) -> Result<Vec<E>, DataError> {
        self.provider.fetch(&self.query).await
    }
}

impl<E, P> Clone for Table<'_, E, P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider,
            query: self.query.clone(),
            _marker: PhantomData,
        }
    }
}

use std::future::Future;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::DataError;
use crate::page::{PageRequest, PagedList};
use crate::provider::{EntityProvider, Table};
use crate::query::{Query, IN_LIST_CHUNK};

/// Generic async repository for CRUD operations over one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
pub trait Repository<E: Entity>: Send + Sync {
    /// `None` and `Some(0)` return `Ok(None)` without touching the database.
    fn get_by_id(&self, id: Option<i64>) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    /// `None` and an empty slice return an empty list without touching the database.
    /// Long id lists are fetched in chunks of [`IN_LIST_CHUNK`].
    fn get_by_ids(&self, ids: Option<&[i64]>) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    fn get_all(&self, filter: Option<Query>) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    fn get_all_paged(
        &self,
        filter: Option<Query>,
        page: PageRequest,
    ) -> impl Future<Output = Result<PagedList<E>, DataError>> + Send;

    fn insert(&self, entity: E) -> impl Future<Output = Result<E, DataError>> + Send;

    /// Insert all entities atomically: either every row lands or none does.
    fn insert_many(&self, entities: Vec<E>) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    fn update(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Update several entities. Not wrapped in a transaction.
    fn update_many(&self, entities: &[E]) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn delete(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn delete_many(&self, entities: &[E]) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Delete every row matching `predicate` atomically and return the count.
    fn delete_where(&self, predicate: Query) -> impl Future<Output = Result<u64, DataError>> + Send;
}

/// [`Repository`] implementation over any [`EntityProvider`].
///
/// The repository holds no state besides the provider handle; cloning it is
/// as cheap as cloning the provider.
pub struct EntityRepository<E, P> {
    provider: P,
    _marker: PhantomData<fn() -> E>,
}

impl<E, P: Clone> Clone for EntityRepository<E, P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E, P> EntityRepository<E, P>
where
    E: Entity,
    P: EntityProvider<E>,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _marker: PhantomData,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Queryable view over the whole table.
    pub fn table(&self) -> Table<'_, E, P> {
        self.provider.table()
    }
}

fn rolled_back<E: Entity>(operation: &'static str, err: &DataError) {
    tracing::warn!(table = E::table_name(), operation, error = %err, "Transaction rolled back");
}

fn ensure_persisted<E: Entity>(entity: &E) -> Result<(), DataError> {
    if entity.is_transient() {
        return Err(DataError::invalid_argument(format!(
            "{} entity has no id",
            E::table_name()
        )));
    }
    Ok(())
}

impl<E, P> Repository<E> for EntityRepository<E, P>
where
    E: Entity,
    P: EntityProvider<E>,
{
    async fn get_by_id(&self, id: Option<i64>) -> Result<Option<E>, DataError> {
        let Some(id) = id.filter(|id| *id != 0) else {
            tracing::debug!(table = E::table_name(), "get_by_id without an id");
            return Ok(None);
        };
        self.table()
            .filter(Query::new().where_eq(E::id_column(), id))
            .first()
            .await
    }

    async fn get_by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<E>, DataError> {
        let ids = match ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                tracing::debug!(table = E::table_name(), "get_by_ids without ids");
                return Ok(Vec::new());
            }
        };
        let mut found = Vec::new();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let rows = self
                .table()
                .filter(Query::new().where_in(E::id_column(), chunk.iter().copied()))
                .to_list()
                .await?;
            found.extend(rows);
        }
        Ok(found)
    }

    async fn get_all(&self, filter: Option<Query>) -> Result<Vec<E>, DataError> {
        self.table()
            .filter(filter.unwrap_or_else(Query::all))
            .to_list()
            .await
    }

    async fn get_all_paged(
        &self,
        filter: Option<Query>,
        page: PageRequest,
    ) -> Result<PagedList<E>, DataError> {
        self.table()
            .filter(filter.unwrap_or_else(Query::all))
            .to_paged_list(page.page_index, page.page_size, page.count_only)
            .await
    }

    async fn insert(&self, entity: E) -> Result<E, DataError> {
        self.provider.insert(entity).await
    }

    async fn insert_many(&self, entities: Vec<E>) -> Result<Vec<E>, DataError> {
        if entities.is_empty() {
            return Ok(entities);
        }
        let count = entities.len();
        let mut tx = self.provider.begin().await?;
        let inserted = self
            .provider
            .bulk_insert(&mut tx, entities)
            .await
            .inspect_err(|err| rolled_back::<E>("batch insert", err))?;
        self.provider.commit(tx).await?;
        tracing::debug!(table = E::table_name(), count, "Batch insert committed");
        Ok(inserted)
    }

    async fn update(&self, entity: &E) -> Result<u64, DataError> {
        ensure_persisted(entity)?;
        self.provider.update(entity).await
    }

    async fn update_many(&self, entities: &[E]) -> Result<u64, DataError> {
        if entities.is_empty() {
            return Ok(0);
        }
        entities.iter().try_for_each(ensure_persisted)?;
        self.provider.bulk_update(entities).await
    }

    async fn delete(&self, entity: &E) -> Result<u64, DataError> {
        ensure_persisted(entity)?;
        self.provider.delete(entity).await
    }

    async fn delete_many(&self, entities: &[E]) -> Result<u64, DataError> {
        if entities.is_empty() {
            return Ok(0);
        }
        entities.iter().try_for_each(ensure_persisted)?;
        let mut tx = self.provider.begin().await?;
        let deleted = self
            .provider
            .bulk_delete(&mut tx, entities)
            .await
            .inspect_err(|err| rolled_back::<E>("batch delete", err))?;
        self.provider.commit(tx).await?;
        Ok(deleted)
    }

    async fn delete_where(&self, predicate: Query) -> Result<u64, DataError> {
        let mut tx = self.provider.begin().await?;
        let deleted = self
            .provider
            .delete_where(&mut tx, &predicate)
            .await
            .inspect_err(|err| rolled_back::<E>("predicate delete", err))?;
        self.provider.commit(tx).await?;
        tracing::debug!(table = E::table_name(), deleted, "Predicate delete committed");
        Ok(deleted)
    }
}

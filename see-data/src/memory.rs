//! In-process [`DataProvider`] backed by ordered maps.
//!
//! Rows are kept per table and keyed by id, so unordered reads return rows in
//! insertion order. Queries are evaluated directly against entity values
//! through [`Entity::value_of`]. Raw SQL is not supported.
//!
//! Transactions work on a snapshot of every table and hold the provider's
//! write gate until they are committed or dropped, so writers are serialized
//! the way a single-writer engine like SQLite serializes them.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::entity::Entity;
use crate::error::DataError;
use crate::provider::{DataProvider, EntityProvider};
use crate::query::{Condition, Query, QueryError};
use crate::value::Value;

type Row = Arc<dyn Any + Send + Sync>;
type Tables = HashMap<&'static str, BTreeMap<i64, Row>>;

/// In-memory provider for tests and local runs.
///
/// # Example
/// ```ignore
/// let provider = MemoryDataProvider::new().with_unique("members", "name");
/// let repo = EntityRepository::<Member, _>::new(provider.clone());
/// repo.insert(Member::new("Ada")).await?;
/// assert_eq!(provider.round_trips(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryDataProvider {
    tables: Arc<RwLock<Tables>>,
    gate: Arc<Mutex<()>>,
    next_id: Arc<AtomicI64>,
    round_trips: Arc<AtomicU64>,
    unique: Arc<Vec<(&'static str, &'static str)>>,
}

/// Snapshot transaction of a [`MemoryDataProvider`].
pub struct MemoryTx {
    tables: Tables,
    _gate: OwnedMutexGuard<()>,
}

#[derive(Debug)]
struct UniqueViolation {
    table: &'static str,
    column: &'static str,
    value: Value,
}

impl std::fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "duplicate value '{}' for {}.{}",
            self.value, self.table, self.column
        )
    }
}

impl std::error::Error for UniqueViolation {}

impl MemoryDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inserts and updates that would duplicate a non-null `column` value in `table`.
    pub fn with_unique(mut self, table: &'static str, column: &'static str) -> Self {
        Arc::make_mut(&mut self.unique).push((table, column));
        self
    }

    /// Number of provider operations performed so far.
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(AtomicOrdering::SeqCst)
    }

    fn round_trip(&self) {
        self.round_trips.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    fn check_unique<E: Entity>(
        &self,
        rows: Option<&BTreeMap<i64, Row>>,
        entity: &E,
    ) -> Result<(), DataError> {
        let Some(rows) = rows else {
            return Ok(());
        };
        for &(table, column) in self.unique.iter() {
            if table != E::table_name() {
                continue;
            }
            let value = entity.value_of(column).unwrap_or(Value::Null);
            if value.is_null() {
                continue;
            }
            for (id, row) in rows {
                if *id == entity.id() {
                    continue;
                }
                let other = downcast::<E>(row)?.value_of(column).unwrap_or(Value::Null);
                if value.compare(&other) == Some(Ordering::Equal) {
                    return Err(DataError::constraint(UniqueViolation {
                        table,
                        column,
                        value,
                    }));
                }
            }
        }
        Ok(())
    }

    fn insert_into<E: Entity>(&self, tables: &mut Tables, mut entity: E) -> Result<E, DataError> {
        self.check_unique(tables.get(E::table_name()), &entity)?;
        entity.set_id(self.next_id());
        tables
            .entry(E::table_name())
            .or_default()
            .insert(entity.id(), Arc::new(entity.clone()));
        Ok(entity)
    }
}

fn downcast<E: Entity>(row: &Row) -> Result<&E, DataError> {
    row.downcast_ref::<E>().ok_or_else(|| {
        DataError::Other(format!(
            "table '{}' holds rows of another entity type",
            E::table_name()
        ))
    })
}

fn select<E: Entity>(rows: Option<&BTreeMap<i64, Row>>, query: &Query) -> Result<Vec<E>, DataError> {
    let mut matched = Vec::new();
    for row in rows.into_iter().flat_map(|rows| rows.values()) {
        let entity = downcast::<E>(row)?;
        if matches(entity, query)? {
            matched.push(entity.clone());
        }
    }
    Ok(matched)
}

fn matches<E: Entity>(entity: &E, query: &Query) -> Result<bool, DataError> {
    for cond in query.conditions() {
        let value = column_value(entity, cond.column())?;
        let hit = match cond {
            Condition::Eq(_, v) => value.compare(v) == Some(Ordering::Equal),
            Condition::NotEq(_, v) => matches!(value.compare(v), Some(o) if o != Ordering::Equal),
            Condition::Gt(_, v) => value.compare(v) == Some(Ordering::Greater),
            Condition::Lt(_, v) => value.compare(v) == Some(Ordering::Less),
            Condition::In(_, vs) => vs.iter().any(|v| value.compare(v) == Some(Ordering::Equal)),
            Condition::Like(_, pattern) => !value.is_null() && like(&value.to_string(), pattern),
            Condition::IsNull(_) => value.is_null(),
            Condition::IsNotNull(_) => !value.is_null(),
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

fn column_value<E: Entity>(entity: &E, column: &str) -> Result<Value, DataError> {
    entity
        .value_of(column)
        .ok_or_else(|| QueryError::UnknownColumn(column.to_string()).into())
}

/// Case-insensitive SQL `LIKE`: `%` matches any run, `_` exactly one character.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    // dp[j]: pattern[..i] matches text[..j]
    let mut dp = vec![false; text.len() + 1];
    dp[0] = true;
    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= dp[j];
                    next[j] = seen;
                }
            }
            '_' => {
                for j in 1..=text.len() {
                    next[j] = dp[j - 1];
                }
            }
            c => {
                for j in 1..=text.len() {
                    next[j] = dp[j - 1] && text[j - 1] == *c;
                }
            }
        }
        dp = next;
    }
    dp[text.len()]
}

fn sort_and_page<E: Entity>(mut rows: Vec<E>, query: &Query) -> Result<Vec<E>, DataError> {
    if !query.ordering().is_empty() {
        let mut keyed = Vec::with_capacity(rows.len());
        for row in rows {
            let key = query
                .ordering()
                .iter()
                .map(|(col, _)| column_value(&row, col))
                .collect::<Result<Vec<_>, _>>()?;
            keyed.push((key, row));
        }
        keyed.sort_by(|(a, _), (b, _)| {
            query
                .ordering()
                .iter()
                .zip(a.iter().zip(b))
                .map(|((_, asc), (x, y))| {
                    let ord = x.sort_cmp(y);
                    if *asc { ord } else { ord.reverse() }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        rows = keyed.into_iter().map(|(_, row)| row).collect();
    }

    let offset = usize::try_from(query.offset_value().unwrap_or(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(query.limit_value().unwrap_or(u64::MAX)).unwrap_or(usize::MAX);
    Ok(rows.into_iter().skip(offset).take(limit).collect())
}

impl DataProvider for MemoryDataProvider {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, DataError> {
        self.round_trip();
        let gate = self.gate.clone().lock_owned().await;
        let tables = self.tables.read().await.clone();
        Ok(MemoryTx {
            tables,
            _gate: gate,
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), DataError> {
        self.round_trip();
        *self.tables.write().await = tx.tables;
        Ok(())
    }
}

impl<E: Entity> EntityProvider<E> for MemoryDataProvider {
    async fn insert(&self, entity: E) -> Result<E, DataError> {
        self.round_trip();
        let _gate = self.gate.lock().await;
        let mut tables = self.tables.write().await;
        self.insert_into(&mut tables, entity)
    }

    async fn bulk_insert(&self, tx: &mut MemoryTx, entities: Vec<E>) -> Result<Vec<E>, DataError> {
        self.round_trip();
        entities
            .into_iter()
            .map(|entity| self.insert_into(&mut tx.tables, entity))
            .collect()
    }

    async fn update(&self, entity: &E) -> Result<u64, DataError> {
        self.round_trip();
        let _gate = self.gate.lock().await;
        let mut tables = self.tables.write().await;
        self.check_unique(tables.get(E::table_name()), entity)?;
        match tables
            .get_mut(E::table_name())
            .and_then(|rows| rows.get_mut(&entity.id()))
        {
            Some(row) => {
                *row = Arc::new(entity.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn bulk_update(&self, entities: &[E]) -> Result<u64, DataError> {
        let mut updated = 0;
        for entity in entities {
            updated += EntityProvider::<E>::update(self, entity).await?;
        }
        Ok(updated)
    }

    async fn delete(&self, entity: &E) -> Result<u64, DataError> {
        self.round_trip();
        let _gate = self.gate.lock().await;
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(E::table_name())
            .and_then(|rows| rows.remove(&entity.id()));
        Ok(u64::from(removed.is_some()))
    }

    async fn bulk_delete(&self, tx: &mut MemoryTx, entities: &[E]) -> Result<u64, DataError> {
        self.round_trip();
        let Some(rows) = tx.tables.get_mut(E::table_name()) else {
            return Ok(0);
        };
        Ok(entities
            .iter()
            .filter(|entity| rows.remove(&entity.id()).is_some())
            .count() as u64)
    }

    async fn delete_where(&self, tx: &mut MemoryTx, predicate: &Query) -> Result<u64, DataError> {
        self.round_trip();
        let doomed: Vec<i64> = select::<E>(tx.tables.get(E::table_name()), predicate)?
            .iter()
            .map(|entity| entity.id())
            .collect();
        if let Some(rows) = tx.tables.get_mut(E::table_name()) {
            for id in &doomed {
                rows.remove(id);
            }
        }
        Ok(doomed.len() as u64)
    }

    async fn count(&self, query: &Query) -> Result<u64, DataError> {
        self.round_trip();
        let tables = self.tables.read().await;
        Ok(select::<E>(tables.get(E::table_name()), query)?.len() as u64)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<E>, DataError> {
        self.round_trip();
        let rows = {
            let tables = self.tables.read().await;
            select::<E>(tables.get(E::table_name()), query)?
        };
        sort_and_page(rows, query)
    }
}

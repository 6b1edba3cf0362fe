//! # see-data
//!
//! Engine-independent data access layer:
//!
//! | Type | Role |
//! |------|------|
//! | [`Entity`] | Record with an integer primary key mapped to one table |
//! | [`Query`] | Filter, ordering, skip and take, interpreted by each provider |
//! | [`DataProvider`] / [`EntityProvider`] | Connection owner; translates entity operations to the database |
//! | [`Table`] | Lazily evaluated view over one entity table |
//! | [`Repository`] / [`EntityRepository`] | Typed CRUD and paging façade over a provider |
//! | [`PagedList`] | One page of results plus pagination metadata |
//! | [`MemoryDataProvider`] | In-process provider for tests and local runs |
//!
//! SQL providers live in `see-data-sqlx`.

pub mod entity;
pub mod error;
pub mod memory;
pub mod page;
pub mod provider;
pub mod query;
pub mod repository;
pub mod value;

pub use entity::Entity;
pub use error::DataError;
pub use memory::MemoryDataProvider;
pub use page::{PageRequest, PagedList};
pub use provider::{DataProvider, EntityProvider, Table};
pub use query::{Condition, Dialect, Query, QueryError, IN_LIST_CHUNK};
pub use repository::{EntityRepository, Repository};
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        DataError, DataProvider, Entity, EntityProvider, EntityRepository, PageRequest,
        PagedList, Query, Repository, Value,
    };
}

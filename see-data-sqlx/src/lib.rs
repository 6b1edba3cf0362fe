//! # see-data-sqlx: SQLx backend for the See data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! implementations for See's data access layer. It depends on [`see_data`] for
//! the abstract traits and types, and adds the provider, transaction handle,
//! and error bridging needed to talk to a real database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxDataProvider`] | `DataProvider` holding an `sqlx::Pool<DB>` |
//! | [`Tx`] | Transaction handle; commits explicitly, rolls back on drop |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver | Dialect |
//! |------------|--------|---------|
//! | `sqlite` (default) | SQLite via `sqlx/sqlite` | `?` placeholders, `RETURNING` ids |
//! | `postgres` | PostgreSQL via `sqlx/postgres` | `$n` placeholders, `RETURNING` ids |
//! | `mysql`    | MySQL via `sqlx/mysql` | `?` placeholders, `LAST_INSERT_ID()` |
//!
//! Entities fetched through a provider must implement `sqlx::FromRow` for
//! the backend's row type, usually with `#[derive(sqlx::FromRow)]`.
//!
//! # Quick start
//!
//! ```ignore
//! use see_data::{EntityRepository, Repository};
//! use see_data_sqlx::SqlxDataProvider;
//! use sqlx::Sqlite;
//!
//! let provider = SqlxDataProvider::<Sqlite>::connect("sqlite://see.db", 5).await?;
//! let repo = EntityRepository::<Member, _>::new(provider);
//! let member = repo.insert(Member::new("Ada")).await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use see_data_sqlx::SqlxErrorExt;
//!
//! let rows = sqlx::query("SELECT ...")
//!     .fetch_all(provider.pool())
//!     .await
//!     .map_err(SqlxErrorExt::into_data_error)?;
//! ```

#[macro_use]
mod provider;

pub mod error;
pub mod statement;
pub mod tx;

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use error::{SqlxErrorExt, SqlxResult};
pub use provider::SqlxDataProvider;
pub use tx::Tx;

/// Re-exports of the most commonly used types from both `see-data` and this crate.
pub mod prelude {
    pub use crate::{SqlxDataProvider, SqlxErrorExt, Tx};
    pub use see_data::prelude::*;
}

//! Transaction handle returned by [`SqlxDataProvider::begin`](see_data::DataProvider::begin).

use std::ops::{Deref, DerefMut};

use see_data::DataError;
use sqlx::{Database, Transaction};

use crate::error::SqlxErrorExt;

/// A wrapper around an SQLx [`Transaction`] that owns its pooled connection.
///
/// - Committed explicitly through [`DataProvider::commit`](see_data::DataProvider::commit)
/// - Rolled back when dropped without a commit (error path or panic)
pub struct Tx<DB: Database>(Transaction<'static, DB>);

impl<DB: Database> Deref for Tx<DB> {
    type Target = Transaction<'static, DB>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<DB: Database> DerefMut for Tx<DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<DB: Database> Tx<DB> {
    pub fn new(tx: Transaction<'static, DB>) -> Self {
        Self(tx)
    }

    /// Unwraps the `Tx` into the inner `Transaction`.
    pub fn into_inner(self) -> Transaction<'static, DB> {
        self.0
    }

    /// Returns a mutable reference to the underlying connection.
    pub fn connection(&mut self) -> &mut <DB as Database>::Connection {
        &mut *self.0
    }

    pub async fn commit(self) -> Result<(), DataError> {
        self.0.commit().await.map_err(SqlxErrorExt::into_data_error)
    }
}

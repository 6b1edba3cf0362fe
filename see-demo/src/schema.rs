//! Startup DDL for the `members` table, per engine.

use see_data::{DataError, DataProvider};

use crate::config::ProviderKind;

fn create_members_sql(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::Memory => None,
        ProviderKind::Sqlite => Some(
            "CREATE TABLE IF NOT EXISTS members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
        ),
        ProviderKind::Postgres => Some(
            "CREATE TABLE IF NOT EXISTS members (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL
            )",
        ),
        ProviderKind::MySql => Some(
            "CREATE TABLE IF NOT EXISTS members (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL
            )",
        ),
    }
}

/// Create the `members` table if it does not exist yet.
pub async fn ensure_schema<P: DataProvider>(provider: &P, kind: ProviderKind) -> Result<(), DataError> {
    if let Some(sql) = create_members_sql(kind) {
        provider.execute_raw(sql, &[]).await?;
        tracing::info!(provider = %kind, "members table ready");
    }
    Ok(())
}

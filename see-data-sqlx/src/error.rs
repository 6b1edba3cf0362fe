use see_data::DataError;
use sqlx::error::ErrorKind;

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for DataError`
/// in this crate. Use `.map_err(SqlxErrorExt::into_data_error)` instead.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        match &self {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".into()),
            sqlx::Error::Database(db) if is_constraint(db.kind()) => DataError::constraint(self),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => DataError::connection(self),
            _ => DataError::database(self),
        }
    }
}

fn is_constraint(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    )
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the data layer.
///
/// Provider errors reach callers unchanged: the repository neither retries
/// nor translates them.
#[derive(Debug)]
pub enum DataError {
    /// Rejected before any I/O (e.g. updating an entity that was never inserted).
    InvalidArgument(String),
    NotFound(String),
    /// A connection could not be obtained or was lost.
    Connection(BoxError),
    /// The statement violated a unique, foreign-key, not-null or check constraint.
    Constraint(BoxError),
    /// Any other driver error.
    Database(BoxError),
    /// The provider does not support this operation.
    NotImplemented(&'static str),
    Other(String),
}

impl DataError {
    /// Wrap a driver error that has no more specific classification.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Connection(Box::new(err))
    }

    pub fn constraint(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Constraint(Box::new(err))
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DataError::InvalidArgument(msg.into())
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Connection(err) => write!(f, "Connection error: {err}"),
            DataError::Constraint(err) => write!(f, "Constraint violation: {err}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::NotImplemented(op) => write!(f, "Not implemented: {op}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Connection(err) | DataError::Constraint(err) | DataError::Database(err) => {
                Some(err.as_ref())
            }
            _ => None,
        }
    }
}

impl From<crate::query::QueryError> for DataError {
    fn from(err: crate::query::QueryError) -> Self {
        DataError::InvalidArgument(err.to_string())
    }
}

impl From<DataError> for see_core::HttpError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => see_core::HttpError::NotFound(msg),
            DataError::InvalidArgument(msg) => see_core::HttpError::BadRequest(msg),
            other => see_core::HttpError::Internal(other.to_string()),
        }
    }
}

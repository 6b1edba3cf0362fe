use crate::value::Value;

/// A record with a provider-assigned integer primary key, mapped to one table.
///
/// An id of `0` marks an entity that has not been persisted yet; providers
/// assign the generated id on insert through [`set_id`](Entity::set_id).
///
/// # Example
///
/// ```ignore
/// impl Entity for Member {
///     fn table_name() -> &'static str { "members" }
///     fn columns() -> &'static [&'static str] { &["name"] }
///     fn id(&self) -> i64 { self.id }
///     fn set_id(&mut self, id: i64) { self.id = id }
///     fn values(&self) -> Vec<Value> { vec![self.name.clone().into()] }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    fn table_name() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    /// Persisted columns other than the id, in the order [`values`](Entity::values) yields them.
    fn columns() -> &'static [&'static str];

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Column values matching [`columns`](Entity::columns), position for position.
    fn values(&self) -> Vec<Value>;

    fn is_transient(&self) -> bool {
        self.id() == 0
    }

    /// Value of a single column, id column included. `None` for unknown columns.
    fn value_of(&self, column: &str) -> Option<Value> {
        if column == Self::id_column() {
            return Some(Value::Int(self.id()));
        }
        let idx = Self::columns().iter().position(|c| *c == column)?;
        self.values().into_iter().nth(idx)
    }
}

use crate::value::Value;

/// SQL dialect a [`Query`] is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// SQLite: `?` placeholders, double-quoted identifiers.
    Sqlite,
    /// MySQL: `?` placeholders, backtick-quoted identifiers.
    MySql,
    /// PostgreSQL: `$1, $2, ...` placeholders, double-quoted identifiers.
    Postgres,
}

impl Dialect {
    /// Placeholder for the `index`-th bound parameter (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }

    /// Validate and quote a (possibly dotted) identifier.
    ///
    /// Identifiers are never bound as parameters, so anything outside
    /// `[A-Za-z_][A-Za-z0-9_]*` per segment is rejected.
    pub fn quote_identifier(self, ident: &str) -> Result<String, QueryError> {
        if !is_valid_identifier(ident) {
            return Err(QueryError::InvalidIdentifier(ident.to_string()));
        }
        let quote = self.quote_char();
        Ok(ident
            .split('.')
            .map(|part| format!("{quote}{part}{quote}"))
            .collect::<Vec<_>>()
            .join("."))
    }
}

/// Largest id list a single `IN (...)` is given.
///
/// Longer lists are split into several statements; SQLite caps bound
/// parameters at 32766 per statement.
pub const IN_LIST_CHUNK: usize = 1000;

/// One predicate term. Terms of a [`Query`] are combined with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    NotEq(String, Value),
    Like(String, String),
    Gt(String, Value),
    Lt(String, Value),
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq(col, _)
            | Condition::NotEq(col, _)
            | Condition::Like(col, _)
            | Condition::Gt(col, _)
            | Condition::Lt(col, _)
            | Condition::In(col, _)
            | Condition::IsNull(col)
            | Condition::IsNotNull(col) => col,
        }
    }
}

/// A composable filter over one entity table: predicate, ordering, skip, take.
///
/// A query is plain data. Providers interpret it: the sqlx providers render
/// it to SQL with bound parameters, the memory provider evaluates it directly.
/// A query without conditions matches every row.
///
/// # Example
///
/// ```ignore
/// let q = Query::new()
///     .where_like("name", "%go%")
///     .where_gt("id", 10)
///     .order_by("id", true)
///     .limit(10);
/// let (sql, params) = q.build_select("members", &["id", "name"], Dialect::Postgres)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: Vec<Condition>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// The always-true predicate.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(column.to_string(), value.into()));
        self
    }

    pub fn where_not_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::NotEq(column.to_string(), value.into()));
        self
    }

    /// SQL `LIKE` with `%` and `_` wildcards.
    pub fn where_like(mut self, column: &str, pattern: &str) -> Self {
        self.conditions
            .push(Condition::Like(column.to_string(), pattern.to_string()));
        self
    }

    pub fn where_gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Gt(column.to_string(), value.into()));
        self
    }

    pub fn where_lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Lt(column.to_string(), value.into()));
        self
    }

    /// Membership test. An empty list matches nothing.
    pub fn where_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNull(column.to_string()));
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.conditions
            .push(Condition::IsNotNull(column.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Combine two queries: conditions and ordering are appended, and
    /// `other`'s limit/offset win when set.
    pub fn and(mut self, other: Query) -> Self {
        self.conditions.extend(other.conditions);
        self.order.extend(other.order);
        self.limit_val = other.limit_val.or(self.limit_val);
        self.offset_val = other.offset_val.or(self.offset_val);
        self
    }

    /// The same predicate, without ordering or paging.
    pub fn predicate(&self) -> Query {
        Query {
            conditions: self.conditions.clone(),
            ..Query::default()
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(String, bool)] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit_val
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset_val
    }

    /// Build `SELECT columns FROM table ...` returning `(sql, bind_values)`.
    pub fn build_select(
        &self,
        table: &str,
        columns: &[&str],
        dialect: Dialect,
    ) -> Result<(String, Vec<Value>), QueryError> {
        let table = dialect.quote_identifier(table)?;
        let columns = columns
            .iter()
            .map(|c| dialect.quote_identifier(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");

        let mut sql = format!("SELECT {columns} FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params, dialect)?;
        self.append_order(&mut sql, dialect)?;
        self.append_limit_offset(&mut sql);
        Ok((sql, params))
    }

    /// Build `SELECT COUNT(*) ...`. Ordering, limit and offset are ignored.
    pub fn build_count(
        &self,
        table: &str,
        dialect: Dialect,
    ) -> Result<(String, Vec<Value>), QueryError> {
        let table = dialect.quote_identifier(table)?;
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params, dialect)?;
        Ok((sql, params))
    }

    /// Build `DELETE FROM table WHERE ...`. Ordering, limit and offset are ignored.
    pub fn build_delete(
        &self,
        table: &str,
        dialect: Dialect,
    ) -> Result<(String, Vec<Value>), QueryError> {
        let table = dialect.quote_identifier(table)?;
        let mut sql = format!("DELETE FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params, dialect)?;
        Ok((sql, params))
    }

    fn append_where(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        dialect: Dialect,
    ) -> Result<(), QueryError> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        let next = |params: &mut Vec<Value>, value: &Value| {
            params.push(value.clone());
            dialect.placeholder(params.len())
        };
        let mut clauses = Vec::with_capacity(self.conditions.len());
        for cond in &self.conditions {
            let col = dialect.quote_identifier(cond.column())?;
            let clause = match cond {
                Condition::Eq(_, val) => format!("{col} = {}", next(params, val)),
                Condition::NotEq(_, val) => format!("{col} <> {}", next(params, val)),
                Condition::Like(_, pat) => {
                    format!("{col} LIKE {}", next(params, &Value::Text(pat.clone())))
                }
                Condition::Gt(_, val) => format!("{col} > {}", next(params, val)),
                Condition::Lt(_, val) => format!("{col} < {}", next(params, val)),
                Condition::In(_, vals) if vals.is_empty() => "1 = 0".to_string(),
                Condition::In(_, vals) => {
                    let placeholders: Vec<_> = vals.iter().map(|v| next(params, v)).collect();
                    format!("{col} IN ({})", placeholders.join(", "))
                }
                Condition::IsNull(_) => format!("{col} IS NULL"),
                Condition::IsNotNull(_) => format!("{col} IS NOT NULL"),
            };
            clauses.push(clause);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        Ok(())
    }

    fn append_order(&self, sql: &mut String, dialect: Dialect) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.order.len());
        for (col, asc) in &self.order {
            let col = dialect.quote_identifier(col)?;
            clauses.push(format!("{col} {}", if *asc { "ASC" } else { "DESC" }));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    /// Both bounds are capped at `i64::MAX`, the largest literal the engines accept.
    fn append_limit_offset(&self, sql: &mut String) {
        let cap = |n: u64| n.min(i64::MAX as u64);
        match (self.limit_val.map(cap), self.offset_val.map(cap)) {
            (Some(limit), offset) => {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }
            // SQLite and MySQL only accept OFFSET after a LIMIT.
            (None, Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {offset}", i64::MAX));
            }
            (None, None) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier(String),
    UnknownColumn(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier(ident) => write!(f, "Invalid identifier: {ident}"),
            QueryError::UnknownColumn(col) => write!(f, "Unknown column: {col}"),
        }
    }
}

impl std::error::Error for QueryError {}

fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

use see_data::{Entity, Value};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub name: String,
}

impl Member {
    /// A member that has not been inserted yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl Entity for Member {
    fn table_name() -> &'static str {
        "members"
    }

    fn columns() -> &'static [&'static str] {
        &["name"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::from(self.name.as_str())]
    }
}

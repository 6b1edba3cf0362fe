use bytes::Bytes;
use http::header::{HeaderMap, HeaderName};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::json_path::resolve_path;

/// Buffered response with chainable status and JSON-path assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_internal_error(self) -> Self {
        self.assert_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected {expected}, got {}\nBody: {}",
            self.status,
            self.text()
        );
        self
    }

    /// Assert that a JSON path resolves to the expected value.
    ///
    /// ```ignore
    /// resp.assert_json_path("items[0].name", "Ada")
    ///     .assert_json_path("items.len()", 10)
    ///     .assert_json_path("hasNextPage", true);
    /// ```
    pub fn assert_json_path(self, path: &str, expected: impl Into<Value>) -> Self {
        let root: Value = self.json();
        let actual = resolve_path(&root, path);
        let expected = expected.into();
        assert_eq!(
            actual, expected,
            "JSON path \"{path}\" mismatch\n  Expected: {expected}\n  Actual:   {actual}\n  Body: {root}",
        );
        self
    }

    /// Deserialize the value at a JSON path.
    pub fn json_path<T: DeserializeOwned>(&self, path: &str) -> T {
        let root: Value = self.json();
        let value = resolve_path(&root, path);
        serde_json::from_value(value.clone())
            .unwrap_or_else(|e| panic!("JSON path \"{path}\": {e}\n  Value: {value}\n  Body: {root}"))
    }

    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name: HeaderName = name.as_ref().parse().ok()?;
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Failed to parse JSON: {e}\nBody: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

use std::fmt::Display;

use axum::body::Body;
use axum::Router;
use http::header::{HeaderMap, IntoHeaderName, CONTENT_TYPE};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde::Serialize;
use tower::util::ServiceExt;

use crate::response::TestResponse;

/// In-process HTTP test client wrapping an axum `Router`.
///
/// Requests are dispatched with `tower::ServiceExt::oneshot`; no TCP port is bound.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn get(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// Start building a request with an arbitrary HTTP method.
    pub fn request(&self, method: Method, path: &str) -> TestRequest<'_> {
        TestRequest {
            app: self,
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Builder for one request against a [`TestApp`].
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl TestRequest<'_> {
    /// Append a URL-encoded query parameter. Repeat the call for multi-valued keys.
    pub fn query(mut self, name: &str, value: impl Display) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl IntoHeaderName, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().parse().expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    /// Set a JSON body and `Content-Type: application/json`.
    pub fn json(mut self, body: &impl Serialize) -> Self {
        self.body = Some(serde_json::to_vec(body).expect("body is not serializable"));
        self.headers
            .insert(CONTENT_TYPE, "application/json".parse().expect("static header"));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        match self.path.contains('?') {
            true => format!("{}&{query}", self.path),
            false => format!("{}?{query}", self.path),
        }
    }

    pub async fn send(mut self) -> TestResponse {
        let uri = self.uri();
        let mut builder = Request::builder().method(self.method.clone()).uri(uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let body = self.body.take().map(Body::from).unwrap_or_else(Body::empty);
        let request = builder.body(body).expect("failed to build request");

        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

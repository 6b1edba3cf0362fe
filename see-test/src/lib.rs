//! In-process HTTP testing for axum routers.
//!
//! ```ignore
//! let app = TestApp::new(router);
//! app.get("/member/view")
//!     .query("id", 1)
//!     .send()
//!     .await
//!     .assert_ok()
//!     .assert_json_path("name", "Ada");
//! ```

mod app;
mod json_path;
mod response;

pub use app::{TestApp, TestRequest};
pub use json_path::{parse_path, resolve_path, PathSegment};
pub use response::TestResponse;

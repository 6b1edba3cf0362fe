//! # see-core
//!
//! Ambient runtime pieces shared by See services:
//!
//! - [`config`]: layered configuration (`application.yaml`, profile overlay,
//!   `.env` files, `${...}` placeholders, environment variables).
//! - [`error`]: [`HttpError`], the JSON error type returned by handlers.
//! - [`layers`]: tracing subscriber setup and the standard tower layers.

pub mod config;
pub mod error;
pub mod layers;

pub use config::{
    ConfigError, ConfigProperties, ConfigValue, DefaultSecretResolver, FromConfigValue,
    SecretResolver, SeeConfig,
};
pub use error::{error_response, HttpError};
pub use layers::{catch_panic_layer, default_trace, init_tracing};

use super::{ConfigError, SeeConfig};

/// A strongly-typed configuration section rooted at [`prefix`](Self::prefix).
///
/// ```ignore
/// pub struct ServerConfig { pub addr: String }
///
/// impl ConfigProperties for ServerConfig {
///     fn prefix() -> &'static str { "server" }
///
///     fn from_config(config: &SeeConfig) -> Result<Self, ConfigError> {
///         Ok(Self { addr: config.get_or(&Self::key("addr"), "0.0.0.0:3000".into()) })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g. `"database"`).
    fn prefix() -> &'static str;

    /// Construct the section from a loaded config.
    fn from_config(config: &SeeConfig) -> Result<Self, ConfigError>;

    /// Absolute key for a property of this section.
    fn key(name: &str) -> String {
        format!("{}.{name}", Self::prefix())
    }
}

use super::ConfigError;

/// Backend that turns a `${...}` reference into its value.
pub trait SecretResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError>;
}

/// Default resolver: env vars and file references.
///
/// - `${VAR_NAME}` and `${env:VAR_NAME}` read an environment variable
/// - `${file:/path/to/secret}` reads a file (trimmed)
pub struct DefaultSecretResolver;

impl SecretResolver for DefaultSecretResolver {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix("file:") {
            let path = path.trim();
            std::fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|e| ConfigError::Load(format!("Secret file '{path}': {e}")))
        } else {
            let var = reference.strip_prefix("env:").unwrap_or(reference).trim();
            std::env::var(var).map_err(|_| ConfigError::NotFound(format!("env:{var}")))
        }
    }
}

/// Resolve every `${...}` placeholder in `value`.
///
/// Resolved text is not scanned again, so a secret containing `${` is kept
/// verbatim.
pub fn resolve_placeholders(
    value: &str,
    resolver: &dyn SecretResolver,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let end = rest[start..]
            .find('}')
            .ok_or_else(|| ConfigError::Load(format!("Unclosed placeholder in: {value}")))?;
        out.push_str(&rest[..start]);
        out.push_str(&resolver.resolve(&rest[start + 2..start + end])?);
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

use see_core::config::{ConfigError, ConfigProperties, ConfigValue, DefaultSecretResolver, SeeConfig};

#[test]
fn test_empty_config() {
    let config = SeeConfig::empty();
    assert!(matches!(
        config.get::<String>("nonexistent"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_set_and_get() {
    let mut config = SeeConfig::empty();
    config.set("database.url", ConfigValue::String("sqlite::memory:".into()));
    assert_eq!(config.get::<String>("database.url").unwrap(), "sqlite::memory:");
}

#[test]
fn test_get_or_default() {
    let config = SeeConfig::empty();
    assert_eq!(config.get_or("database.max_connections", 5u32), 5);
}

#[test]
fn test_type_conversions() {
    let mut config = SeeConfig::empty();
    config.set("int_val", ConfigValue::Integer(42));
    config.set("str_int", ConfigValue::String("7".into()));
    config.set("bool_val", ConfigValue::String("yes".into()));
    config.set("null_val", ConfigValue::Null);

    assert_eq!(config.get::<i64>("int_val").unwrap(), 42);
    assert_eq!(config.get::<u32>("str_int").unwrap(), 7);
    assert!(config.get::<bool>("bool_val").unwrap());
    assert_eq!(config.get::<String>("int_val").unwrap(), "42");
    assert!(config.get::<Option<String>>("null_val").unwrap().is_none());
}

#[test]
fn test_negative_into_unsigned_is_mismatch() {
    let mut config = SeeConfig::empty();
    config.set("size", ConfigValue::Integer(-1));
    assert!(matches!(
        config.get::<u32>("size"),
        Err(ConfigError::TypeMismatch { expected: "u32", .. })
    ));
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
database:
  provider: sqlite
  url: "sqlite::memory:"
  max_connections: 1
server:
  addr: "127.0.0.1:8080"
"#;
    let config = SeeConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(config.get::<String>("database.provider").unwrap(), "sqlite");
    assert_eq!(config.get::<i64>("database.max_connections").unwrap(), 1);
    assert_eq!(config.get::<String>("server.addr").unwrap(), "127.0.0.1:8080");
    assert_eq!(config.profile(), "test");
}

#[test]
fn test_list_config_and_indexed_access() {
    let yaml = r#"
seed:
  names:
    - "Alice"
    - "Bob"
"#;
    let config = SeeConfig::from_yaml_str(yaml, "test").unwrap();
    let names: Vec<String> = config.get("seed.names").unwrap();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(config.get::<String>("seed.names.1").unwrap(), "Bob");
}

#[test]
fn test_invalid_yaml_is_load_error() {
    let err = SeeConfig::from_yaml_str("database: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

struct PoolSection {
    url: String,
    size: u32,
}

impl ConfigProperties for PoolSection {
    fn prefix() -> &'static str {
        "pool"
    }

    fn from_config(config: &SeeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url: config.get(&Self::key("url"))?,
            size: config.get_or(&Self::key("size"), 4),
        })
    }
}

#[test]
fn test_typed_section() {
    let config = SeeConfig::from_yaml_str("pool:\n  url: mem\n", "test").unwrap();
    let section: PoolSection = config.section().unwrap();
    assert_eq!(section.url, "mem");
    assert_eq!(section.size, 4);

    let missing = SeeConfig::empty().section::<PoolSection>();
    assert!(matches!(missing, Err(ConfigError::NotFound(key)) if key == "pool.url"));
}

#[test]
fn test_load_from_directory_layers_profile_and_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "database:\n  provider: sqlite\n  url: \"sqlite::memory:\"\nsee_layer_test:\n  secret: \"${file:SECRET_PATH}\"\n"
            .replace("SECRET_PATH", &dir.path().join("secret.txt").display().to_string()),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("application-layered.yaml"),
        "database:\n  provider: memory\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("secret.txt"), "hunter2\n").unwrap();

    let config = SeeConfig::load_from(dir.path(), "layered", &DefaultSecretResolver).unwrap();
    assert_eq!(config.get::<String>("database.provider").unwrap(), "memory");
    assert_eq!(config.get::<String>("database.url").unwrap(), "sqlite::memory:");
    assert_eq!(config.get::<String>("see_layer_test.secret").unwrap(), "hunter2");
}

#[test]
fn test_env_overrides_underscored_keys() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "see_env_test:\n  max_connections: 5\n",
    )
    .unwrap();
    unsafe { std::env::set_var("SEE_ENV_TEST_MAX_CONNECTIONS", "9") };
    unsafe { std::env::set_var("SEEENVTEST_NEW_KEY", "fresh") };

    let config = SeeConfig::load_from(dir.path(), "envtest", &DefaultSecretResolver).unwrap();

    unsafe { std::env::remove_var("SEE_ENV_TEST_MAX_CONNECTIONS") };
    unsafe { std::env::remove_var("SEEENVTEST_NEW_KEY") };
    assert_eq!(config.get::<u32>("see_env_test.max_connections").unwrap(), 9);
    assert_eq!(config.get::<String>("seeenvtest.new.key").unwrap(), "fresh");
}

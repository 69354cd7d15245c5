use openroute_core::config::{AppConfig, ConfigError};
use openroute_openapi::{Contact, OpenApiConfig, DEFAULT_OPENAPI_VERSION};

#[test]
fn new_uses_defaults() {
    let config = OpenApiConfig::new("My API", "1.0.0");
    assert_eq!(config.openapi, DEFAULT_OPENAPI_VERSION);
    assert_eq!(config.title, "My API");
    assert_eq!(config.version, "1.0.0");
    assert!(config.description.is_none());
    assert!(config.servers.is_empty());
    assert!(config.security.is_empty());
}

#[test]
fn builders_accumulate() {
    let config = OpenApiConfig::new("My API", "1.0.0")
        .with_description("A great API")
        .with_contact(Contact {
            email: Some("api@example.com".into()),
            ..Contact::default()
        })
        .with_server("https://a.example.com")
        .with_server_described("https://b.example.com", "backup")
        .with_tag("users", "User management")
        .with_tag("items", "Item store")
        .with_security("apiKey", &[])
        .with_security("oauth", &["read", "write"]);

    assert_eq!(config.description.as_deref(), Some("A great API"));
    assert_eq!(config.contact.as_ref().and_then(|c| c.email.as_deref()), Some("api@example.com"));
    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.servers[1].description.as_deref(), Some("backup"));
    let tags: Vec<&str> = config.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, ["users", "items"]);
    assert_eq!(config.security[1]["oauth"], ["read", "write"]);
}

#[test]
fn license_and_version_override() {
    let config = OpenApiConfig::new("My API", "1.0.0")
        .with_license("MIT", None)
        .with_openapi_version("3.1.1");
    let license = config.license.unwrap();
    assert_eq!(license.name, "MIT");
    assert!(license.identifier.is_none());
    assert_eq!(config.openapi, "3.1.1");
}

#[test]
fn from_config_reads_section() {
    let app = AppConfig::from_yaml_str(
        r#"
openapi:
  title: Items API
  version: 2.1.0
  description: Stores items
  servers:
    - https://items.example.com
    - http://localhost:3000
"#,
        "test",
    )
    .unwrap();

    let config = OpenApiConfig::from_config(&app, "openapi").unwrap();
    assert_eq!(config.title, "Items API");
    assert_eq!(config.version, "2.1.0");
    assert_eq!(config.description.as_deref(), Some("Stores items"));
    assert_eq!(config.openapi, DEFAULT_OPENAPI_VERSION);
    let urls: Vec<&str> = config.servers.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, ["https://items.example.com", "http://localhost:3000"]);
}

#[test]
fn from_config_accepts_comma_separated_servers() {
    let mut app = AppConfig::empty();
    app.set("docs.title", "Items API");
    app.set("docs.version", "1.0.0");
    app.set("docs.servers", "https://a.example.com,https://b.example.com");

    let config = OpenApiConfig::from_config(&app, "docs").unwrap();
    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.servers[1].url, "https://b.example.com");
}

#[test]
fn from_config_requires_title_and_version() {
    let mut app = AppConfig::empty();
    app.set("openapi.title", "Items API");

    match OpenApiConfig::from_config(&app, "openapi") {
        Err(ConfigError::NotFound(key)) => assert_eq!(key, "openapi.version"),
        other => panic!("expected missing version, got {other:?}"),
    }
}

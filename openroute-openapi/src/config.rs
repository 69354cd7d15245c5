use openroute_core::config::{AppConfig, ConfigError};
use openroute_core::SecurityRequirement;
use serde::Serialize;

pub const DEFAULT_OPENAPI_VERSION: &str = "3.1.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct License {
    pub name: String,
    /// SPDX expression, e.g. `Apache-2.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Document-level settings: everything in the generated document that does
/// not come from a registered route.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiConfig {
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    pub security: Vec<SecurityRequirement>,
    pub external_docs: Option<ExternalDocs>,
}

impl OpenApiConfig {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            openapi: DEFAULT_OPENAPI_VERSION.to_string(),
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            servers: Vec::new(),
            tags: Vec::new(),
            security: Vec::new(),
            external_docs: None,
        }
    }

    /// Read `{prefix}.title` and `{prefix}.version` (both required) plus the
    /// optional `description`, `servers` and `openapi` keys.
    ///
    /// ```yaml
    /// openapi:
    ///   title: Items API
    ///   version: 1.0.0
    ///   servers:
    ///     - https://items.example.com
    /// ```
    pub fn from_config(config: &AppConfig, prefix: &str) -> Result<Self, ConfigError> {
        let key = |name: &str| format!("{prefix}.{name}");

        let mut this = Self::new(
            config.get::<String>(&key("title"))?,
            config.get::<String>(&key("version"))?,
        );
        if let Some(description) = config.get_opt::<String>(&key("description"))? {
            this = this.with_description(description);
        }
        if let Some(version) = config.get_opt::<String>(&key("openapi"))? {
            this = this.with_openapi_version(version);
        }
        for url in config.get_opt::<Vec<String>>(&key("servers"))?.unwrap_or_default() {
            this = this.with_server(url);
        }
        Ok(this)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.terms_of_service = Some(url.into());
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_license(mut self, name: impl Into<String>, identifier: Option<&str>) -> Self {
        self.license = Some(License {
            name: name.into(),
            identifier: identifier.map(str::to_string),
            url: None,
        });
        self
    }

    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: None,
        });
        self
    }

    pub fn with_server_described(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: Some(description.into()),
        });
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tags.push(Tag {
            name: name.into(),
            description: Some(description.into()),
        });
        self
    }

    /// Require `scheme` (with `scopes`) for every operation that does not
    /// declare its own security.
    pub fn with_security(mut self, scheme: impl Into<String>, scopes: &[&str]) -> Self {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme.into(), scopes.iter().map(|s| s.to_string()).collect());
        self.security.push(requirement);
        self
    }

    pub fn with_external_docs(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        self.external_docs = Some(ExternalDocs {
            url: url.into(),
            description: Some(description.into()),
        });
        self
    }

    /// Override the `openapi` field, `3.1.0` by default.
    pub fn with_openapi_version(mut self, version: impl Into<String>) -> Self {
        self.openapi = version.into();
        self
    }
}

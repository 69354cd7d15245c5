use openroute_core::{RegistrySnapshot, RequestBody, ResponseConfig, RouteConfig, Schema};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::OpenApiConfig;
use crate::error::DocumentError;
use crate::schema::{object_properties, SchemaCollector};

/// Build an OpenAPI document from config and a registry snapshot.
///
/// Paths and operations follow registration order. When one method and path
/// was registered more than once, the first description is used and later
/// ones are left out of the document, even though the registry keeps them.
/// The first registration is also the handler that serves the route, so the
/// document describes what actually runs.
pub fn build_document(config: &OpenApiConfig, registry: &RegistrySnapshot) -> Result<Value, DocumentError> {
    let mut collector = SchemaCollector::default();

    // Explicitly registered schemas come first in `components/schemas`.
    for (name, schema) in &registry.schemas {
        let rendered = collector.inline(schema, &format!("components/schemas/{name}"))?;
        collector.insert(name, rendered)?;
    }

    let mut paths: Map<String, Value> = Map::new();
    for route in &registry.routes {
        let path = document_path(&route.path);
        let method = route.method.as_str();
        let label = format!("{} {}", route.method, route.path);

        let item = paths
            .entry(path)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut();
        let Some(item) = item else { continue };
        if item.contains_key(method) {
            debug!(route = %label, "duplicate route description left out of the document");
            continue;
        }
        let operation = build_operation(route, &label, &mut collector)?;
        item.insert(method.to_string(), operation);
    }

    let mut doc = Map::new();
    doc.insert("openapi".into(), json!(config.openapi));
    doc.insert("info".into(), build_info(config));
    if !config.servers.is_empty() {
        doc.insert("servers".into(), json!(config.servers));
    }
    if !config.tags.is_empty() {
        doc.insert("tags".into(), json!(config.tags));
    }
    if !config.security.is_empty() {
        doc.insert("security".into(), json!(config.security));
    }
    if let Some(external_docs) = &config.external_docs {
        doc.insert("externalDocs".into(), json!(external_docs));
    }
    doc.insert("paths".into(), Value::Object(paths));

    let components = build_components(registry, collector)?;
    if !components.is_empty() {
        doc.insert("components".into(), Value::Object(components));
    }

    Ok(Value::Object(doc))
}

/// `/files/{*rest}` (axum catch-all) is documented as `/files/{rest}`.
fn document_path(path: &str) -> String {
    path.replace("{*", "{")
}

fn build_info(config: &OpenApiConfig) -> Value {
    let mut info = Map::new();
    info.insert("title".into(), json!(config.title));
    if let Some(description) = &config.description {
        info.insert("description".into(), json!(description));
    }
    if let Some(terms) = &config.terms_of_service {
        info.insert("termsOfService".into(), json!(terms));
    }
    if let Some(contact) = &config.contact {
        info.insert("contact".into(), json!(contact));
    }
    if let Some(license) = &config.license {
        info.insert("license".into(), json!(license));
    }
    info.insert("version".into(), json!(config.version));
    Value::Object(info)
}

fn build_operation(route: &RouteConfig, label: &str, collector: &mut SchemaCollector) -> Result<Value, DocumentError> {
    let mut operation = Map::new();

    if !route.tags.is_empty() {
        operation.insert("tags".into(), json!(route.tags));
    }
    if let Some(summary) = &route.summary {
        operation.insert("summary".into(), json!(summary));
    }
    if let Some(description) = &route.description {
        operation.insert("description".into(), json!(description));
    }
    if let Some(operation_id) = &route.operation_id {
        operation.insert("operationId".into(), json!(operation_id));
    }

    let parameters = build_parameters(route, label, collector)?;
    if !parameters.is_empty() {
        operation.insert("parameters".into(), Value::Array(parameters));
    }

    if let Some(body) = route.request.as_ref().and_then(|r| r.body.as_ref()) {
        operation.insert("requestBody".into(), build_request_body(body, label, collector)?);
    }

    if !route.responses.is_empty() {
        let mut responses = Map::new();
        for (status, response) in &route.responses {
            if !is_valid_response_key(status) {
                return Err(DocumentError::InvalidResponseKey {
                    route: label.to_string(),
                    key: status.clone(),
                });
            }
            let location = format!("{label} responses.{status}");
            responses.insert(status.clone(), build_response(response, &location, collector)?);
        }
        operation.insert("responses".into(), Value::Object(responses));
    }

    if route.deprecated {
        operation.insert("deprecated".into(), json!(true));
    }
    if !route.security.is_empty() {
        operation.insert("security".into(), json!(route.security));
    }

    Ok(Value::Object(operation))
}

/// `default`, a status code `100`..`599`, or a range `1XX`..`5XX`.
fn is_valid_response_key(key: &str) -> bool {
    if key == "default" {
        return true;
    }
    let bytes = key.as_bytes();
    if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    let rest = &bytes[1..];
    rest.iter().all(u8::is_ascii_digit) || rest == b"XX"
}

fn build_parameters(route: &RouteConfig, label: &str, collector: &mut SchemaCollector) -> Result<Vec<Value>, DocumentError> {
    let mut parameters = Vec::new();
    let template_names = route.path_parameters();

    let request = route.request.as_ref();
    let sources: [(&str, Option<&Schema>); 4] = [
        ("path", request.and_then(|r| r.params.as_ref())),
        ("query", request.and_then(|r| r.query.as_ref())),
        ("header", request.and_then(|r| r.headers.as_ref())),
        ("cookie", request.and_then(|r| r.cookies.as_ref())),
    ];

    for (location, schema) in sources {
        let Some(schema) = schema else {
            if location == "path" {
                // Undeclared path parameters are still required by the format.
                parameters.extend(template_names.iter().map(|name| {
                    json!({ "name": name, "in": "path", "required": true, "schema": { "type": "string" } })
                }));
            }
            continue;
        };

        let at = format!("{label} {location} parameters");
        let rendered = collector.inline(schema, &at)?;
        let properties = object_properties(&rendered, &at)?;

        if location == "path" {
            if let Some(missing) = template_names.iter().find(|name| !properties.iter().any(|p| p.name == **name)) {
                return Err(DocumentError::MissingPathParameter {
                    route: label.to_string(),
                    name: missing.to_string(),
                });
            }
        }

        for property in properties {
            let mut parameter = Map::new();
            parameter.insert("name".into(), json!(property.name));
            parameter.insert("in".into(), json!(location));
            if let Some(description) = property.description {
                parameter.insert("description".into(), description);
            }
            parameter.insert("required".into(), json!(location == "path" || property.required));
            parameter.insert("schema".into(), property.schema);
            parameters.push(Value::Object(parameter));
        }
    }

    Ok(parameters)
}

fn build_request_body(body: &RequestBody, label: &str, collector: &mut SchemaCollector) -> Result<Value, DocumentError> {
    let mut request_body = Map::new();
    if let Some(description) = &body.description {
        request_body.insert("description".into(), json!(description));
    }
    let mut content = Map::new();
    for (media_type, media) in &body.content {
        let location = format!("{label} requestBody {media_type}");
        let mut entry = Map::new();
        entry.insert("schema".into(), collector.render(&media.schema, &location)?);
        if let Some(example) = &media.example {
            entry.insert("example".into(), example.clone());
        }
        content.insert(media_type.clone(), Value::Object(entry));
    }
    request_body.insert("content".into(), Value::Object(content));
    request_body.insert("required".into(), json!(body.required));
    Ok(Value::Object(request_body))
}

fn build_response(response: &ResponseConfig, location: &str, collector: &mut SchemaCollector) -> Result<Value, DocumentError> {
    let mut out = Map::new();
    out.insert("description".into(), json!(response.description));

    if let Some(headers) = &response.headers {
        let at = format!("{location} headers");
        let rendered = collector.inline(headers, &at)?;
        let mut map = Map::new();
        for property in object_properties(&rendered, &at)? {
            let mut header = Map::new();
            if let Some(description) = property.description {
                header.insert("description".into(), description);
            }
            if property.required {
                header.insert("required".into(), json!(true));
            }
            header.insert("schema".into(), property.schema);
            map.insert(property.name, Value::Object(header));
        }
        out.insert("headers".into(), Value::Object(map));
    }

    if !response.content.is_empty() {
        let mut content = Map::new();
        for (media_type, media) in &response.content {
            let mut entry = Map::new();
            let at = format!("{location} {media_type}");
            entry.insert("schema".into(), collector.render(&media.schema, &at)?);
            if let Some(example) = &media.example {
                entry.insert("example".into(), example.clone());
            }
            content.insert(media_type.clone(), Value::Object(entry));
        }
        out.insert("content".into(), Value::Object(content));
    }

    Ok(Value::Object(out))
}

fn build_components(registry: &RegistrySnapshot, collector: SchemaCollector) -> Result<Map<String, Value>, DocumentError> {
    let mut schemas = collector.into_schemas();
    let mut components = Map::new();

    for (kind, entries) in &registry.components {
        if kind == "schemas" {
            for (name, value) in entries {
                match schemas.get(name) {
                    Some(existing) if existing != value => {
                        return Err(DocumentError::ConflictingComponent {
                            kind: kind.clone(),
                            name: name.clone(),
                        })
                    }
                    Some(_) => {}
                    None => {
                        schemas.insert(name.clone(), value.clone());
                    }
                }
            }
            continue;
        }
        let section = entries
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<Map<String, Value>>();
        components.insert(kind.clone(), Value::Object(section));
    }

    if !schemas.is_empty() {
        let mut ordered = Map::new();
        ordered.insert("schemas".into(), Value::Object(schemas));
        ordered.extend(components);
        components = ordered;
    }
    Ok(components)
}

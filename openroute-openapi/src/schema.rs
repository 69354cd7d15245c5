//! Rendering of route schemas into document JSON.
//!
//! Typed schemas come out of schemars as JSON Schema Draft 2020-12: nested
//! types sit under `$defs` and are referenced as `#/$defs/X`. OpenAPI 3.1
//! reads the same dialect but wants shared definitions under
//! `#/components/schemas/X`, so `$defs` are promoted and `$ref`s rewritten.

use openroute_core::Schema;
use serde_json::{json, Map, Value};

use crate::error::DocumentError;

const SCHEMAS_REF: &str = "#/components/schemas/";

/// Rewrite `#/$defs/X` references to `#/components/schemas/X`, recursively.
pub(crate) fn sanitize_schema(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(reference)) = obj.get_mut("$ref") {
                if let Some(name) = reference.strip_prefix("#/$defs/") {
                    *reference = format!("{SCHEMAS_REF}{name}");
                }
            }
            for v in obj.values_mut() {
                sanitize_schema(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize_schema),
        _ => {}
    }
}

/// Accumulates `components/schemas` while operations are rendered.
#[derive(Debug, Default)]
pub(crate) struct SchemaCollector {
    schemas: Map<String, Value>,
}

impl SchemaCollector {
    /// Add a named component. Re-adding an identical definition is a no-op;
    /// a different one under the same name is a conflict.
    pub(crate) fn insert(&mut self, name: &str, schema: Value) -> Result<(), DocumentError> {
        match self.schemas.get(name) {
            Some(existing) if *existing == schema => Ok(()),
            Some(_) => Err(DocumentError::ConflictingComponent {
                kind: "schemas".into(),
                name: name.to_string(),
            }),
            None => {
                self.schemas.insert(name.to_string(), schema);
                Ok(())
            }
        }
    }

    /// Render `schema` for use at `location`: inline, or as a `$ref` to a
    /// component when it was declared with [`Schema::with_ref`].
    pub(crate) fn render(&mut self, schema: &Schema, location: &str) -> Result<Value, DocumentError> {
        let rendered = self.inline(schema, location)?;
        match schema.ref_name() {
            Some(name) => {
                self.insert(name, rendered)?;
                Ok(json!({ "$ref": format!("{SCHEMAS_REF}{name}") }))
            }
            None => Ok(rendered),
        }
    }

    /// Render `schema` without ever replacing it by a `$ref`; its `$defs`
    /// still become components.
    pub(crate) fn inline(&mut self, schema: &Schema, location: &str) -> Result<Value, DocumentError> {
        let mut root = schema.json_schema();
        match &mut root {
            Value::Object(obj) => {
                obj.remove("$schema");
                if let Some(defs) = obj.remove("$defs") {
                    let Value::Object(defs) = defs else {
                        return Err(invalid(location, "`$defs` is not an object"));
                    };
                    for (name, mut def) in defs {
                        sanitize_schema(&mut def);
                        self.insert(&name, def)?;
                    }
                }
                for (key, value) in schema.metadata() {
                    obj.insert(key.clone(), value.clone());
                }
            }
            // `true` / `false` are valid schemas, but cannot carry keywords.
            Value::Bool(_) if schema.metadata().is_empty() => {}
            Value::Bool(_) => return Err(invalid(location, "boolean schema cannot carry annotations")),
            other => {
                let kind = match other {
                    Value::Null => "null",
                    Value::Number(_) => "a number",
                    Value::String(_) => "a string",
                    _ => "an array",
                };
                return Err(invalid(location, &format!("expected an object or boolean, found {kind}")));
            }
        }
        sanitize_schema(&mut root);
        Ok(root)
    }

    pub(crate) fn into_schemas(self) -> Map<String, Value> {
        self.schemas
    }
}

fn invalid(location: &str, reason: &str) -> DocumentError {
    DocumentError::InvalidSchema {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// One property of an object schema, as needed for a parameter or a
/// response header.
pub(crate) struct Property {
    pub(crate) name: String,
    pub(crate) required: bool,
    pub(crate) description: Option<Value>,
    pub(crate) schema: Value,
}

/// Split a rendered object schema into its properties, in declaration order.
pub(crate) fn object_properties(rendered: &Value, location: &str) -> Result<Vec<Property>, DocumentError> {
    let properties = rendered
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(location, "expected an object schema with `properties`"))?;
    let required: Vec<&str> = rendered
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    Ok(properties
        .iter()
        .map(|(name, schema)| {
            let mut schema = schema.clone();
            let description = schema.as_object_mut().and_then(|obj| obj.remove("description"));
            Property {
                name: name.clone(),
                required: required.contains(&name.as_str()),
                description,
                schema,
            }
        })
        .collect())
}

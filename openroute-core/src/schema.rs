//! Schemas attached to route descriptions.
//!
//! A [`Schema`] is what a route declares for one request part or one response
//! media type. It serves two consumers: the validation steps installed by the
//! registrar (which need something that can parse and check a raw input) and
//! the document generator (which needs a JSON Schema rendering plus any
//! OpenAPI annotations).

use std::any::Any;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::validation::{ValidationError, ValidationTarget};

/// A validated, possibly coerced input value, type-erased for storage in the
/// request's [`ValidatedInputs`](crate::extract::ValidatedInputs).
pub type ValidatedValue = Arc<dyn Any + Send + Sync>;

/// Raw request input handed to a schema for parsing.
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
    /// `application/x-www-form-urlencoded` pairs: query strings, path
    /// parameters and form bodies all arrive in this shape.
    UrlEncoded(&'a [u8]),
    /// A JSON document.
    Json(&'a [u8]),
}

/// The validation-engine side of a typed schema.
pub trait SchemaValidator: Send + Sync {
    /// Rust type name of the validated value, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Suggested component name (from `JsonSchema::schema_name`).
    fn schema_name(&self) -> Cow<'static, str>;

    /// Draft 2020-12 JSON Schema for the validated type.
    fn json_schema(&self) -> Value;

    /// Deserialize, coerce and constraint-check a raw input.
    fn parse(&self, target: ValidationTarget, input: RawInput<'_>) -> Result<ValidatedValue, ValidationError>;
}

struct TypedValidator<T>(PhantomData<fn() -> T>);

impl<T> SchemaValidator for TypedValidator<T>
where
    T: DeserializeOwned + garde::Validate + JsonSchema + Send + Sync + 'static,
    T::Context: Default,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn schema_name(&self) -> Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(&self) -> Value {
        schemars::schema_for!(T).to_value()
    }

    fn parse(&self, target: ValidationTarget, input: RawInput<'_>) -> Result<ValidatedValue, ValidationError> {
        let value: T = match input {
            RawInput::UrlEncoded(bytes) => {
                let deduped = first_occurrences(bytes);
                let de = serde_urlencoded::Deserializer::new(form_urlencoded::parse(deduped.as_bytes()));
                serde_path_to_error::deserialize(de)
                    .map_err(|e| ValidationError::from_urlencoded(target, e))?
            }
            RawInput::Json(bytes) => {
                let de = &mut serde_json::Deserializer::from_slice(bytes);
                let value = serde_path_to_error::deserialize(&mut *de)
                    .map_err(|e| ValidationError::from_json(target, e))?;
                // Reject trailing garbage after the document.
                de.end()
                    .map_err(|e| ValidationError::single(target, "body", e.to_string(), "invalid_json"))?;
                value
            }
        };

        value
            .validate()
            .map_err(|report| ValidationError::from_garde(target, &report))?;

        Ok(Arc::new(value))
    }
}

/// Keep the first value of each repeated key, the way a single-valued
/// query lookup would.
fn first_occurrences(bytes: &[u8]) -> String {
    let mut pairs: IndexMap<Cow<'_, str>, Cow<'_, str>> = IndexMap::new();
    for (key, value) in form_urlencoded::parse(bytes) {
        pairs.entry(key).or_insert(value);
    }
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[derive(Clone)]
enum SchemaKind {
    Typed(Arc<dyn SchemaValidator>),
    Raw(Value),
}

/// A request or response schema, with optional OpenAPI annotations.
///
/// ```ignore
/// #[derive(Deserialize, Validate, JsonSchema)]
/// struct CreateItem {
///     #[garde(range(min = 0))]
///     count: i64,
/// }
///
/// let body = Schema::of::<CreateItem>()
///     .with_ref("CreateItem")
///     .with_description("Item to create");
/// ```
#[derive(Clone)]
pub struct Schema {
    kind: SchemaKind,
    ref_name: Option<String>,
    metadata: Map<String, Value>,
}

impl Schema {
    /// A schema backed by a Rust type. Inputs are deserialized into `T`
    /// (with string coercion for query, path and form inputs) and then
    /// checked with `garde`.
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + garde::Validate + JsonSchema + Send + Sync + 'static,
        T::Context: Default,
    {
        Self::from_validator(Arc::new(TypedValidator::<T>(PhantomData)))
    }

    /// A schema backed by a custom validator.
    pub fn from_validator(validator: Arc<dyn SchemaValidator>) -> Self {
        Self {
            kind: SchemaKind::Typed(validator),
            ref_name: None,
            metadata: Map::new(),
        }
    }

    /// A document-only JSON Schema. Nothing validates against it; the
    /// registrar skips body content declared with a raw schema.
    pub fn raw(schema: Value) -> Self {
        Self {
            kind: SchemaKind::Raw(schema),
            ref_name: None,
            metadata: Map::new(),
        }
    }

    /// Render this schema as a reusable component under `name` and refer to
    /// it with `$ref` wherever it is used.
    pub fn with_ref(mut self, name: impl Into<String>) -> Self {
        self.ref_name = Some(name.into());
        self
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_metadata("description", Value::String(description.into()))
    }

    pub fn with_example(self, example: Value) -> Self {
        self.with_metadata("example", example)
    }

    /// Attach an arbitrary OpenAPI schema keyword. Later values win.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// The validator, when this schema can validate input.
    pub fn validator(&self) -> Option<&Arc<dyn SchemaValidator>> {
        match &self.kind {
            SchemaKind::Typed(v) => Some(v),
            SchemaKind::Raw(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        self.validator().is_some()
    }

    pub fn ref_name(&self) -> Option<&str> {
        self.ref_name.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// The un-annotated JSON Schema: generated for typed schemas, verbatim
    /// for raw ones.
    pub fn json_schema(&self) -> Value {
        match &self.kind {
            SchemaKind::Typed(v) => v.json_schema(),
            SchemaKind::Raw(value) => value.clone(),
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Schema");
        match &self.kind {
            SchemaKind::Typed(v) => s.field("type", &v.type_name()),
            SchemaKind::Raw(value) => s.field("raw", value),
        };
        s.field("ref_name", &self.ref_name)
            .field("metadata", &self.metadata)
            .finish()
    }
}

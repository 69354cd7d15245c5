use serde_json::Value;

static NULL: Value = Value::Null;

/// One step of a JSON path such as `details[0].field` or `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Field(String),
    Index(usize),
    Len,
}

/// Split a JSON path into tokens.
///
/// Fields are separated by `.`; `[n]` indexes arrays; a trailing `len()`
/// (or `size()`) yields the length of an array, object or string. Field
/// names may contain `/` and `{}`, so OpenAPI paths work as-is:
/// `paths./items/{id}.get.operationId`.
///
/// # Panics
///
/// On an unclosed bracket or a non-numeric index.
pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        if matches!(segment, "len()" | "size()") {
            tokens.push(PathToken::Len);
            continue;
        }
        let (field, mut indices) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        if !field.is_empty() {
            tokens.push(PathToken::Field(field.to_string()));
        }
        while let Some(rest) = indices.strip_prefix('[') {
            let end = rest
                .find(']')
                .unwrap_or_else(|| panic!("unclosed bracket in JSON path `{path}`"));
            let index = rest[..end]
                .parse()
                .unwrap_or_else(|_| panic!("non-numeric index `{}` in JSON path `{path}`", &rest[..end]));
            tokens.push(PathToken::Index(index));
            indices = &rest[end + 1..];
        }
    }
    tokens
}

/// Resolve `path` against `root`. Missing fields and out-of-range indices
/// resolve to `null`.
///
/// # Panics
///
/// When `len()` is applied to a number, boolean or null.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root;
    let mut tokens = tokenize_path(path).into_iter().peekable();
    while let Some(token) = tokens.next() {
        current = match token {
            PathToken::Field(name) => current.get(&name).unwrap_or(&NULL),
            PathToken::Index(idx) => current.get(idx).unwrap_or(&NULL),
            PathToken::Len => {
                let len = match current {
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    Value::String(s) => s.chars().count(),
                    other => panic!("len() applied to non-collection {other} in JSON path `{path}`"),
                };
                assert!(tokens.peek().is_none(), "len() must end the JSON path `{path}`");
                return Value::from(len);
            }
        };
    }
    current.clone()
}

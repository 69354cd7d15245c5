use openroute_test::{resolve_path, tokenize_path, PathToken};
use serde_json::{json, Value};

#[test]
fn test_tokenize_mixed_path() {
    assert_eq!(
        tokenize_path("details[0].field"),
        vec![
            PathToken::Field("details".into()),
            PathToken::Index(0),
            PathToken::Field("field".into())
        ]
    );
    assert_eq!(tokenize_path("a[1][2].len()").last(), Some(&PathToken::Len));
}

#[test]
fn test_resolve_simple_field() {
    let v = json!({"error": "Validation failed"});
    assert_eq!(resolve_path(&v, "error"), json!("Validation failed"));
}

#[test]
fn test_resolve_array_nested() {
    let v = json!({"details": [{"field": "count", "code": "invalid_type"}]});
    assert_eq!(resolve_path(&v, "details[0].field"), json!("count"));
    assert_eq!(resolve_path(&v, "details.len()"), json!(1));
}

#[test]
fn test_resolve_openapi_path_keys() {
    let v = json!({"paths": {"/items/{id}": {"get": {"operationId": "getItem"}}}});
    assert_eq!(resolve_path(&v, "paths./items/{id}.get.operationId"), json!("getItem"));
    assert_eq!(resolve_path(&v, "paths.len()"), json!(1));
}

#[test]
fn test_resolve_string_len_counts_chars() {
    let v = json!({"title": "héllo"});
    assert_eq!(resolve_path(&v, "title.len()"), json!(5));
}

#[test]
fn test_resolve_missing_is_null() {
    let v = json!({"items": [1]});
    assert_eq!(resolve_path(&v, "missing.deeper"), Value::Null);
    assert_eq!(resolve_path(&v, "items[5]"), Value::Null);
}

#[test]
#[should_panic(expected = "len() applied to non-collection")]
fn test_len_on_scalar_panics() {
    resolve_path(&json!({"n": 1}), "n.len()");
}

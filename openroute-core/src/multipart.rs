//! Multipart form bodies, reduced to their text fields.
//!
//! Form validation works on urlencoded pairs; a `multipart/form-data` body is
//! brought into that shape by collecting its text fields. File parts (fields
//! carrying a file name) are not part of the validated value; handlers that
//! need them read the body again, which the validation step leaves intact.

use bytes::Bytes;

use crate::http::body::Body;
use crate::http::extract::FromRequest;
use crate::http::{HeaderValue, CONTENT_TYPE};

pub use axum::extract::Multipart;

/// Errors that can occur while reading a multipart body.
#[derive(Debug)]
pub enum MultipartError {
    /// The body or its headers are not valid multipart.
    Malformed(String),
    /// A field's data could not be read.
    ReadError(String),
    /// A text field is not valid UTF-8.
    NotUtf8(String),
}

impl std::fmt::Display for MultipartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "multipart error: {msg}"),
            Self::ReadError(msg) => write!(f, "failed to read field data: {msg}"),
            Self::NotUtf8(field) => write!(f, "field '{field}' is not valid UTF-8"),
        }
    }
}

impl std::error::Error for MultipartError {}

/// Parse a buffered multipart body and re-encode its text fields as an
/// urlencoded string, preserving field order and repeated names.
pub(crate) async fn text_fields_urlencoded(
    content_type: Option<HeaderValue>,
    body: Bytes,
) -> Result<String, MultipartError> {
    let mut builder = ::http::Request::builder();
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder
        .body(Body::from(body))
        .map_err(|e| MultipartError::Malformed(e.to_string()))?;

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| MultipartError::Malformed(rejection.body_text()))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MultipartError::Malformed(e.to_string()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let name = field.name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| MultipartError::ReadError(e.to_string()))?;
        let text = std::str::from_utf8(&data).map_err(|_| MultipartError::NotUtf8(name.clone()))?;
        pairs.push((name, text.to_string()));
    }

    // Built after the loop: the serializer is not `Send` and must not live
    // across an await.
    Ok(form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish())
}

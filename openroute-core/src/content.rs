//! Content-type classification for request bodies.

use crate::http::{HeaderMap, CONTENT_TYPE};

/// The body categories the registrar knows how to validate.
///
/// Derived from a media-type string by prefix match, so parameters such as
/// `application/json; charset=utf-8` classify the same as the bare type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// `application/json*`
    Json,
    /// `multipart/form-data*` or `application/x-www-form-urlencoded*`
    Form,
    /// Anything else. Never validated.
    Unsupported,
}

const JSON_PREFIX: &str = "application/json";
const MULTIPART_PREFIX: &str = "multipart/form-data";
const URLENCODED_PREFIX: &str = "application/x-www-form-urlencoded";

impl ContentKind {
    /// Classify a declared or received media type.
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim_start();
        if starts_with_ignore_case(media_type, JSON_PREFIX) {
            ContentKind::Json
        } else if starts_with_ignore_case(media_type, MULTIPART_PREFIX)
            || starts_with_ignore_case(media_type, URLENCODED_PREFIX)
        {
            ContentKind::Form
        } else {
            ContentKind::Unsupported
        }
    }

    /// Classify the `Content-Type` header of a request. A missing or
    /// non-UTF-8 header is `Unsupported`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_media_type)
            .unwrap_or(ContentKind::Unsupported)
    }
}

/// How a form body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormEncoding {
    UrlEncoded,
    Multipart,
}

impl FormEncoding {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(CONTENT_TYPE)?.to_str().ok()?.trim_start();
        if starts_with_ignore_case(value, MULTIPART_PREFIX) {
            Some(FormEncoding::Multipart)
        } else if starts_with_ignore_case(value, URLENCODED_PREFIX) {
            Some(FormEncoding::UrlEncoded)
        } else {
            None
        }
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

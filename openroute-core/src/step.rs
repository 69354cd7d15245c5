//! The per-(route, part) validation middleware.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::LengthLimitError;
use tracing::debug;

use crate::content::{ContentKind, FormEncoding};
use crate::extract::ValidatedInputs;
use crate::hook::{Hook, ValidationOutcome};
use crate::http::body::{to_bytes, Body};
use crate::http::extract::{FromRequestParts, RawPathParams, Request, State};
use crate::http::middleware::Next;
use crate::http::response::{IntoResponse, Response};
use crate::http::{Parts, StatusCode, CONTENT_TYPE};
use crate::schema::{RawInput, SchemaValidator};
use crate::validation::{ValidationError, ValidationTarget};

/// Largest request body a body step will buffer.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// One validation step: a single request part checked against a single schema.
#[derive(Clone)]
pub(crate) struct ValidationStep {
    route: Arc<str>,
    target: ValidationTarget,
    validator: Arc<dyn SchemaValidator>,
    hook: Option<Hook>,
    /// Body kinds declared by the route this step belongs to.
    declared_bodies: Arc<[ContentKind]>,
}

/// What a step got out of the request.
enum Extracted {
    Input(Bytes, InputFormat),
    /// The body belongs to a sibling step of another kind.
    PassThrough,
}

#[derive(Clone, Copy)]
enum InputFormat {
    UrlEncoded,
    Json,
}

impl ValidationStep {
    pub(crate) fn new(
        route: Arc<str>,
        target: ValidationTarget,
        validator: Arc<dyn SchemaValidator>,
        hook: Option<Hook>,
        declared_bodies: Arc<[ContentKind]>,
    ) -> Self {
        Self {
            route,
            target,
            validator,
            hook,
            declared_bodies,
        }
    }

    pub(crate) fn target(&self) -> ValidationTarget {
        self.target
    }

    fn own_kind(&self) -> ContentKind {
        match self.target {
            ValidationTarget::Json => ContentKind::Json,
            ValidationTarget::Form => ContentKind::Form,
            ValidationTarget::Query | ValidationTarget::Param => ContentKind::Unsupported,
        }
    }

    /// Pull the raw input for this step's part. Body steps buffer the body
    /// and hand back a replacement so later layers can read it again.
    async fn extract(&self, parts: &mut Parts, body: Body) -> (Result<Extracted, Response>, Body) {
        match self.target {
            ValidationTarget::Query => {
                let query = parts.uri.query().unwrap_or_default();
                let input = Bytes::copy_from_slice(query.as_bytes());
                (Ok(Extracted::Input(input, InputFormat::UrlEncoded)), body)
            }
            ValidationTarget::Param => {
                let result = match RawPathParams::from_request_parts(parts, &()).await {
                    Ok(params) => {
                        let mut serializer = form_urlencoded::Serializer::new(String::new());
                        for (key, value) in params.iter() {
                            serializer.append_pair(key, value);
                        }
                        Ok(Extracted::Input(
                            Bytes::from(serializer.finish()),
                            InputFormat::UrlEncoded,
                        ))
                    }
                    Err(rejection) => Err(rejection.into_response()),
                };
                (result, body)
            }
            ValidationTarget::Json | ValidationTarget::Form => self.extract_body(parts, body).await,
        }
    }

    async fn extract_body(&self, parts: &Parts, body: Body) -> (Result<Extracted, Response>, Body) {
        let received = ContentKind::from_headers(&parts.headers);
        if received != self.own_kind() {
            if received != ContentKind::Unsupported && self.declared_bodies.contains(&received) {
                return (Ok(Extracted::PassThrough), body);
            }
            let header = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
            let err = ValidationError::unsupported_content_type(self.target, header);
            return (Err(self.reject(parts, err)), body);
        }

        let bytes = match to_bytes(body, BODY_LIMIT).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("failed to read request body: {e}");
                if e.into_inner().is::<LengthLimitError>() {
                    let err = ValidationError::single(
                        self.target,
                        "body",
                        format!("request body exceeds {BODY_LIMIT} bytes"),
                        "body_too_large",
                    );
                    let rejected = self.reject_with_status(parts, err, StatusCode::PAYLOAD_TOO_LARGE);
                    return (Err(rejected), Body::empty());
                }
                let err = ValidationError::single(self.target, "body", message, "body_unreadable");
                return (Err(self.reject(parts, err)), Body::empty());
            }
        };
        let restored = Body::from(bytes.clone());

        let extracted = match self.target {
            ValidationTarget::Json => Ok(Extracted::Input(bytes, InputFormat::Json)),
            _ => match FormEncoding::from_headers(&parts.headers) {
                Some(FormEncoding::UrlEncoded) => Ok(Extracted::Input(bytes, InputFormat::UrlEncoded)),
                Some(FormEncoding::Multipart) => self.multipart_input(parts, bytes).await,
                None => Err(self.reject(
                    parts,
                    ValidationError::unsupported_content_type(self.target, None),
                )),
            },
        };
        (extracted, restored)
    }

    #[cfg(feature = "multipart")]
    async fn multipart_input(&self, parts: &Parts, bytes: Bytes) -> Result<Extracted, Response> {
        let content_type = parts.headers.get(CONTENT_TYPE).cloned();
        match crate::multipart::text_fields_urlencoded(content_type, bytes).await {
            Ok(encoded) => Ok(Extracted::Input(Bytes::from(encoded), InputFormat::UrlEncoded)),
            Err(e) => Err(self.reject(
                parts,
                ValidationError::single(self.target, "body", e.to_string(), "invalid_multipart"),
            )),
        }
    }

    #[cfg(not(feature = "multipart"))]
    async fn multipart_input(&self, parts: &Parts, _bytes: Bytes) -> Result<Extracted, Response> {
        let err = ValidationError::unsupported_content_type(self.target, Some("multipart/form-data"));
        Err(self.reject(parts, err))
    }

    /// Failure path: the hook may answer, otherwise the default 400.
    fn reject(&self, parts: &Parts, err: ValidationError) -> Response {
        self.reject_with_status(parts, err, StatusCode::BAD_REQUEST)
    }

    /// Run the hook on a failure; without an override, answer `status` with
    /// the default validation payload.
    fn reject_with_status(&self, parts: &Parts, err: ValidationError, status: StatusCode) -> Response {
        debug!(
            route = %self.route,
            target = %self.target,
            errors = err.errors.len(),
            "request input rejected"
        );
        if let Some(hook) = &self.hook {
            let outcome = ValidationOutcome::Failure {
                target: self.target,
                error: &err,
            };
            if let Some(response) = hook.call(&outcome, parts) {
                return response;
            }
        }
        let mut response = err.into_response();
        *response.status_mut() = status;
        response
    }
}

/// Middleware entry point, installed with `from_fn_with_state`.
pub(crate) async fn run_validation_step(
    State(step): State<ValidationStep>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let (extracted, body) = step.extract(&mut parts, body).await;

    let (input, format) = match extracted {
        Ok(Extracted::Input(input, format)) => (input, format),
        Ok(Extracted::PassThrough) => return next.run(Request::from_parts(parts, body)).await,
        Err(response) => return response,
    };

    let raw = match format {
        InputFormat::UrlEncoded => RawInput::UrlEncoded(&input),
        InputFormat::Json => RawInput::Json(&input),
    };
    let value = match step.validator.parse(step.target, raw) {
        Ok(value) => value,
        Err(err) => return step.reject(&parts, err),
    };

    if let Some(hook) = &step.hook {
        let outcome = ValidationOutcome::Success {
            target: step.target,
            data: &*value,
        };
        if let Some(response) = hook.call(&outcome, &parts) {
            return response;
        }
    }

    match parts.extensions.get_mut::<ValidatedInputs>() {
        Some(inputs) => inputs.insert(step.target, value),
        None => {
            let mut inputs = ValidatedInputs::default();
            inputs.insert(step.target, value);
            parts.extensions.insert(inputs);
        }
    }

    next.run(Request::from_parts(parts, body)).await
}

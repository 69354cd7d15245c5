use std::any::Any;
use std::sync::Arc;

use crate::http::response::Response;
use crate::http::Parts;
use crate::validation::{ValidationError, ValidationTarget};

/// What a validation step reports to a route's hook.
pub enum ValidationOutcome<'a> {
    Success {
        target: ValidationTarget,
        data: &'a (dyn Any + Send + Sync),
    },
    Failure {
        target: ValidationTarget,
        error: &'a ValidationError,
    },
}

impl ValidationOutcome<'_> {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success { .. })
    }

    pub fn target(&self) -> ValidationTarget {
        match self {
            ValidationOutcome::Success { target, .. } | ValidationOutcome::Failure { target, .. } => *target,
        }
    }

    /// The validated value, if validation succeeded and it is a `T`.
    pub fn data<T: Any>(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Success { data, .. } => data.downcast_ref::<T>(),
            ValidationOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationOutcome::Failure { error, .. } => Some(error),
            ValidationOutcome::Success { .. } => None,
        }
    }
}

type HookFn = dyn Fn(&ValidationOutcome<'_>, &Parts) -> Option<Response> + Send + Sync;

/// Callback run after every validation step of a route.
///
/// Returning `Some(response)` ends the request with that response, on
/// success and failure alike. Returning `None` keeps the default behaviour:
/// continue on success, answer `400` on failure.
#[derive(Clone)]
pub struct Hook(Arc<HookFn>);

impl Hook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ValidationOutcome<'_>, &Parts) -> Option<Response> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, outcome: &ValidationOutcome<'_>, parts: &Parts) -> Option<Response> {
        (self.0)(outcome, parts)
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Hook")
    }
}

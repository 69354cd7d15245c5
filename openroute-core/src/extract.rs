//! Typed access to validated request parts.
//!
//! Each validation step stores its result in the request's
//! [`ValidatedInputs`], one slot per [`ValidationTarget`]. Handlers take the
//! values back out with the extractor matching the part and the type the
//! route declared:
//!
//! ```ignore
//! let route = RouteConfig::post("/items/{id}")
//!     .params(Schema::of::<ItemPath>())
//!     .body(RequestBody::json(Schema::of::<NewItem>()));
//!
//! async fn create(ValidParam(path): ValidParam<ItemPath>, ValidJson(item): ValidJson<NewItem>) -> StatusCode {
//!     ...
//! }
//! ```
//!
//! Asking for a part the route did not declare, or for a different type,
//! is a wiring bug and answers `500`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HttpError;
use crate::http::extract::{FromRequestParts, OptionalFromRequestParts};
use crate::http::Parts;
use crate::schema::ValidatedValue;
use crate::validation::ValidationTarget;

/// Validated values attached to a request, keyed by target.
#[derive(Clone, Default)]
pub struct ValidatedInputs {
    slots: HashMap<ValidationTarget, ValidatedValue>,
}

impl ValidatedInputs {
    pub(crate) fn insert(&mut self, target: ValidationTarget, value: ValidatedValue) {
        self.slots.insert(target, value);
    }

    /// Borrow the value for a target, if present and of type `T`.
    pub fn get<T: Any>(&self, target: ValidationTarget) -> Option<&T> {
        self.slots.get(&target)?.downcast_ref::<T>()
    }

    pub fn contains(&self, target: ValidationTarget) -> bool {
        self.slots.contains_key(&target)
    }

    /// Move the value for a target out of the request.
    fn take<T: Any + Send + Sync>(&mut self, target: ValidationTarget) -> Result<T, HttpError> {
        let value = self.slots.remove(&target).ok_or_else(|| missing::<T>(target))?;
        match value.downcast::<T>() {
            Ok(typed) => Arc::try_unwrap(typed).map_err(|_| {
                HttpError::Internal(format!("validated {target} input is shared and cannot be moved"))
            }),
            Err(original) => {
                self.slots.insert(target, original);
                Err(missing::<T>(target))
            }
        }
    }
}

impl std::fmt::Debug for ValidatedInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut targets: Vec<_> = self.slots.keys().collect();
        targets.sort();
        f.debug_struct("ValidatedInputs").field("targets", &targets).finish()
    }
}

fn missing<T>(target: ValidationTarget) -> HttpError {
    HttpError::Internal(format!(
        "no validated {target} input of type `{}`; check the route's request schema",
        std::any::type_name::<T>()
    ))
}

fn take_from_parts<T: Any + Send + Sync>(parts: &mut Parts, target: ValidationTarget) -> Result<T, HttpError> {
    parts
        .extensions
        .get_mut::<ValidatedInputs>()
        .ok_or_else(|| missing::<T>(target))?
        .take::<T>(target)
}

macro_rules! valid_extractor {
    ($(#[$doc:meta])* $name:ident => $target:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name<T>(pub T);

        impl<T> std::ops::Deref for $name<T> {
            type Target = T;

            fn deref(&self) -> &T {
                &self.0
            }
        }

        impl<T, S> FromRequestParts<S> for $name<T>
        where
            T: Any + Send + Sync,
            S: Send + Sync,
        {
            type Rejection = HttpError;

            async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
                take_from_parts::<T>(parts, $target).map($name)
            }
        }

        /// `None` when this request carried no value for the part, e.g. the
        /// JSON slot of a route that also accepts forms.
        impl<T, S> OptionalFromRequestParts<S> for $name<T>
        where
            T: Any + Send + Sync,
            S: Send + Sync,
        {
            type Rejection = HttpError;

            async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Self::Rejection> {
                let present = parts
                    .extensions
                    .get::<ValidatedInputs>()
                    .is_some_and(|inputs| inputs.contains($target));
                if !present {
                    return Ok(None);
                }
                take_from_parts::<T>(parts, $target).map(|value| Some($name(value)))
            }
        }
    };
}

valid_extractor!(
    /// The route's validated query parameters.
    ValidQuery => ValidationTarget::Query
);
valid_extractor!(
    /// The route's validated path parameters.
    ValidParam => ValidationTarget::Param
);
valid_extractor!(
    /// The route's validated JSON body.
    ValidJson => ValidationTarget::Json
);
valid_extractor!(
    /// The route's validated form body (urlencoded or multipart text fields).
    ValidForm => ValidationTarget::Form
);

//! openroute - validated, self-documenting routes over Axum.
//!
//! This facade crate re-exports the openroute sub-crates through a single
//! dependency with feature flags. Import everything you need with:
//!
//! ```ignore
//! use openroute::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature     | Default | Crate                       |
//! |-------------|---------|-----------------------------|
//! | `openapi`   | **yes** | `openroute-openapi`         |
//! | `multipart` | **yes** | `openroute-core/multipart`  |

pub extern crate openroute_core;

// Re-export everything from openroute-core at the top level for convenience.
pub use openroute_core::*;

#[cfg(feature = "openapi")]
pub use openroute_openapi;

/// Unified prelude — import everything with `use openroute::prelude::*`.
pub mod prelude {
    pub use openroute_core::prelude::*;

    #[cfg(feature = "openapi")]
    pub use openroute_openapi::{DocumentError, OpenApiConfig, OpenApiDocExt};
}

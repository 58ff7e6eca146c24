//! Provider-facing vocabulary: grant types and the OAuth error payload SPID returns.
//!
//! `grant` names the three grants the client performs against the token endpoint. `error`
//! parses the provider's `{error, error_code, type, error_description}` payload and classifies
//! it into [`ProviderErrorKind`] so callers can branch without string matching.

pub mod error;
pub mod grant;

pub use error::*;
pub use grant::*;

//! Immutable token values issued by the provider.

pub mod kind;
pub mod record;
pub mod secret;

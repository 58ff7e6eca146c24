//! Token snapshots and the shared handle the client refreshes in place.

pub mod handle;
pub mod token;

pub use handle::*;
pub use token::{kind::*, record::*, secret::*};

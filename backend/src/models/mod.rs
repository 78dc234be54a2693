//! Domain models, shared with other workspace members

pub use shared::models::*;

//! Request middleware

pub mod auth;

pub use auth::{auth_middleware, required_access, Access, AuthUser, CurrentUser};

//! Shared types and models for the Inventory Tracker platform
//!
//! This crate contains the domain model shared between the backend and any
//! other components of the system (report exporters, admin tooling).

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;

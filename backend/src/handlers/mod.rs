//! HTTP handlers for the Inventory Tracker API

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod product;
pub mod report;
pub mod stock_movement;
pub mod supplier;
pub mod user;

pub use auth::*;
pub use dashboard::*;
pub use health::*;
pub use product::*;
pub use report::*;
pub use stock_movement::*;
pub use supplier::*;
pub use user::*;

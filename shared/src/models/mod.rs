//! Domain models for the Inventory Tracker platform

mod product;
mod stock_movement;
mod supplier;
mod user;

pub use product::*;
pub use stock_movement::*;
pub use supplier::*;
pub use user::*;

//! tabi-domain
//!
//! Pure domain models (TripBook, Plan, Schedule, PlanItem, theme colors).
//! No I/O, no CLI, no storage. Only data types and fixed preset tables.

pub mod book;
pub mod color;
pub mod common;
pub mod entity;
pub mod item;
pub mod plan;
pub mod schedule;

pub use book::*;
pub use color::*;
pub use common::*;
pub use entity::*;
pub use item::*;
pub use plan::*;
pub use schedule::*;

#![doc(test(attr(deny(warnings))))]

//! Tabi Shiori keeps trip itineraries consistent: one schedule per day of a
//! plan, no orphaned items, and budget figures derived from item costs.
//! This crate wires the core engine to a JSON store and an interactive shell.

pub mod cli;
pub mod core;
pub mod utils;

pub use crate::core::errors::{AppError, AppResult};
pub use crate::core::trip_manager::TripManager;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tabi Shiori tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

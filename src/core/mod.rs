pub mod errors;
pub mod trip_manager;

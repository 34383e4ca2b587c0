//! tabi-core
//!
//! Itinerary consistency engine: schedule synchronization, cascade deletion,
//! budget aggregation, and the theme color codec, plus the validated services
//! that turn user edits into change sets for an [`EntityStore`].
//! Depends on tabi-domain. No CLI, no terminal I/O, no file access.

pub mod budget_service;
pub mod cascade;
pub mod changes;
pub mod error;
pub mod item_service;
pub mod plan_service;
pub mod schedule_service;
pub mod schedule_sync;
pub mod storage;
pub mod theme_codec;
pub mod time;

pub use budget_service::*;
pub use cascade::CascadeDeletion;
pub use changes::{Change, ChangeSet, StagedEdit};
pub use error::{CoreError, CoreResult};
pub use item_service::*;
pub use plan_service::*;
pub use schedule_service::ScheduleService;
pub use schedule_sync::{ScheduleSync, ScheduleSynchronizer};
pub use storage::{EntityStore, InMemoryStore};
pub use theme_codec::{ThemeColorCodec, ThemeDecodeError};
pub use time::{Clock, FixedClock, SystemClock};

#[cfg(test)]
mod tests;

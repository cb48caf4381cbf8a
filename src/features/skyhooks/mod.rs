//! # Skyhooks Feature
//!
//! Timers for when a skyhook in a given system becomes vulnerable. Timers
//! are listed until they come due and swept a few hours later by a
//! maintenance job on the shared job registry.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.4.0
//! - **Toggleable**: true

pub mod cleanup;
pub mod error;
pub mod model;
pub mod timer;

pub use cleanup::{
    run_cleanup, start_cleanup_job, CLEANUP_KEY, CLEANUP_SCHEDULE, EXPIRY_GRACE_HOURS,
};
pub use error::SkyhookError;
pub use model::{normalize_system, MoonType, NewSkyhook, Skyhook, SKYHOOK_COLOR};
pub use timer::{parse_time_until, MAX_LEAD_DAYS};

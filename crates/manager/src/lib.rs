//! Supervisor runtime for certman: cron scheduling and process lifecycle.

pub mod scheduler;

pub use scheduler::{Scheduler, SchedulerError};

pub mod alert_gate;
pub mod config;
pub mod control;
pub mod error;
pub mod history;
pub mod reading;
pub mod schedule;
pub mod store;
pub mod types;

pub use error::{GuardError, Result};

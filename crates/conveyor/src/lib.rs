//! Conveyor converts package index release data into warehouse payloads.
//!
//! The parsing rules live in `conveyor-core`; this crate adds configuration,
//! logging setup, the release payload mapping and the line-oriented driver
//! used by the `conveyor` binary.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod release;
pub mod user_agent;

// Re-export commonly used types
pub use config::ConveyorConfig;
pub use error::{ConveyorError, Result};
pub use pipeline::{ConversionSummary, convert_lines};
pub use release::{WarehouseFile, WarehouseProject, WarehouseRelease, WarehouseVersion};
pub use user_agent::user_agent;

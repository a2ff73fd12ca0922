pub mod config;
pub mod error;
pub mod matcher;
pub mod scan;
pub mod telemetry;

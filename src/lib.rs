//! Core library for the internship marketplace service: skill matching,
//! cover-letter review, and the application lifecycle.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

//! Domain library for the riskwise self-assessment service: templates,
//! scoring, testing-status classification, and the review workflow, plus
//! the service configuration and telemetry shared with the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

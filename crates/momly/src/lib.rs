//! Momly: a maternal mental-health screening service.
//!
//! The [`screening`] module owns the questionnaire, the step machine and the
//! risk classification pipeline. [`companion`] is the rule-based chat helper,
//! [`feedback`] collects notes from respondents, and the remaining modules
//! carry configuration, telemetry and the top-level error type.

pub mod companion;
pub mod config;
pub mod error;
pub mod feedback;
pub mod screening;
pub mod telemetry;

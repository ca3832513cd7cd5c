pub mod config;
pub mod error;
pub mod questionnaire;
pub mod scoring;
pub mod screens;
pub mod telemetry;

// Shared code for the postboard API: configuration, storage and telemetry

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod telemetry;

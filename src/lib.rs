pub mod client;
pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod models;
pub mod telemetry;

//! Headless runtime for the gallery: config, logging, effects and terminal output.
mod app;
mod config;
mod effects;
mod logging;
mod render;
mod report;

pub use app::run_app;

pub mod api;
pub mod app;
pub mod config;
pub mod extracts;
pub mod hazard;
pub mod matrix;
pub mod services;
pub mod utils;

//! Terminal dashboard for a stock-data backend.
//!
//! Fetches OHLCV history and price predictions over HTTP, derives a trailing
//! moving average, and draws price, volume, moving-average and prediction
//! overlays on a shared time axis in the terminal.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod indicator;
pub mod models;
pub mod projector;
pub mod store;
pub mod summary;
pub mod surface;
pub mod tasks;
pub mod tui;

pub use error::{DashError, Result};

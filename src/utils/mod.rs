//! The `utils` module contains shared utilities used across the application.

pub mod logging;

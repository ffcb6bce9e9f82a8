//! Utility functions and helpers.

pub mod amount;
pub mod http;

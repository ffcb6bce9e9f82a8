// src/lib.rs

//! Nara bid-notice collector library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

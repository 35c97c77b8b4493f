//! Shared types and models for the LeafScan plant-disease client
//!
//! This crate holds the pure logic shared between the native client and
//! the JavaScript front-end (via WASM): crops, the prediction wire schema
//! and its normalization, display labels and the disease catalog.

pub mod catalog;
pub mod models;
pub mod normalization;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use models::*;
pub use normalization::*;
pub use types::*;
pub use validation::*;

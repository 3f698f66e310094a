//! IRIS lookup - resolves a geographic point to the INSEE IRIS zone containing it
//!
//! This library provides the feature store, spatial index and lookup service
//! used by the `iris-server` binary.

pub mod config;
pub mod error;
pub mod models;
pub mod pip;

pub use error::{LoadError, LookupError};
pub use models::{IrisFeature, IrisProperties};

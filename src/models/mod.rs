//! Core data models for the IRIS lookup.

pub mod iris;

pub use iris::{IrisFeature, IrisProperties};

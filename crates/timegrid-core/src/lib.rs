//! Shared configuration, errors and small primitives for the timegrid layout engine.

pub mod config;
pub mod constants;
pub mod error;
pub mod store;
pub mod types;

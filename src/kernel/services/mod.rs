//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: storage, filesystem and headless surface implementations.

pub mod adapters;
pub mod ports;

//! Domain layer for Trendcast
//!
//! Contains the forecast payload, the chart-ready series derived from it,
//! and the value objects both are built from. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

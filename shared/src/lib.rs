//! Shared types and computation core for the Inventory Procurement Platform
//!
//! This crate contains the domain models, validation and the pure
//! forecasting, simulation and replenishment computations shared between
//! the backend, the report frontend (via WASM), and other components of
//! the system.

mod arima;

pub mod forecasting;
pub mod models;
pub mod replenishment;
pub mod simulation;
pub mod types;
pub mod validation;

pub use forecasting::*;
pub use models::*;
pub use replenishment::*;
pub use simulation::*;
pub use types::*;
pub use validation::*;

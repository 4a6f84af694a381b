//! Weekly delivery planning for school material routes in Barcelona.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Schedule ingestion and plan export.
pub mod io;
pub mod model;
/// Delivery-plan consolidation, target weeks and summaries.
pub mod plan;
pub mod sample;

//! getaway-core
//!
//! Pure domain types and asset path conventions for the itinerary service.
//! No rendering or HTTP dependency; this is the shared vocabulary of the
//! export pipeline and the server.

pub mod error;
pub mod models;
pub mod paths;

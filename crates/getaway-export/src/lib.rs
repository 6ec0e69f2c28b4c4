//! getaway-export
//!
//! Itinerary HTML rendering, HTML → PDF rasterization and page compositing.

pub mod compose;
pub mod error;
pub mod generate;
pub mod page;
pub mod pdf;
pub mod render;
pub mod template;

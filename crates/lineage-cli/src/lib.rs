//! Library side of the `lineage` binary.
//!
//! Exposed so the rendering and settings code can be tested without a
//! chain connection.

pub mod commands;
pub mod dump;
pub mod json;
pub mod render;
pub mod settings;

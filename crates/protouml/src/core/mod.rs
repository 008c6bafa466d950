//! Core abstractions for diagram generation
//!
//! The schema data model, the loader and renderer collaborator traits, render
//! configuration, errors and logging.

mod config;
mod error;
mod loader;
pub mod logging;
mod renderer;
mod schema;

pub use config::*;
pub use error::*;
pub use loader::*;
pub use logging::*;
pub use renderer::*;
pub use schema::*;

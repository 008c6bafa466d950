//! Plugin implementations
//!
//! The protobuf schema plugin, the Graphviz renderer and the orchestrator
//! that chains them.

pub mod graphviz;
pub mod orchestrator;
pub mod protobuf;

pub use graphviz::*;
pub use orchestrator::*;

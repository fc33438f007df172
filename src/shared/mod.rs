pub mod geo;
pub mod graph;

pub use geo::*;
pub use graph::*;

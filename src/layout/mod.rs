//! Layout algorithms
//!
//! Only the relationship graph needs computed positions; the screenplay grid
//! itself is laid out by the host.

pub mod graph;

pub use graph::{dedupe_edges, layout_graph, GraphLayoutConfig, NodePosition};

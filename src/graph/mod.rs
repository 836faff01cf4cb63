//! Static graph model and the algorithms that run over it.

pub mod algorithms;
pub mod types;

pub use types::{Edge, Graph, Node};

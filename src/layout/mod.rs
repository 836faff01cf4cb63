//! Node placement: the force-directed integrator and the org chart tree layout.

pub mod force;
pub mod params;
pub mod tree;

pub use force::{Body, ForceLayout, cluster_centers, ring_positions};
pub use params::ForceParams;
pub use tree::{TreeLayout, TreeNode};

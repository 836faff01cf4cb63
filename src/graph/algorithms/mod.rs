//! Textbook graph algorithms, run once on a widget's static graph and cached
//! until the user changes an input.

pub mod centrality;
pub mod community;
pub mod link_prediction;
pub mod pagerank;
pub mod shortest_path;
pub mod traversal;

pub use centrality::{betweenness_centrality, degree_centrality};
pub use community::{CommunityScript, CommunityStep, modularity};
pub use link_prediction::{Candidate, LinkMetric, predict_links};
pub use pagerank::{DEFAULT_DAMPING, pagerank};
pub use shortest_path::{ShortestPaths, dijkstra};
pub use traversal::{bfs_distances, bfs_path};

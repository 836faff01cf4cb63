//! Shared network widget plumbing: a graph with its live layout and pointer
//! state, and the canvas drawing for it.

mod render;
mod state;

pub use render::{EdgeStyle, NODE_RADIUS, NodeStyle, draw_overlay_edge, group_color, render_network};
pub use state::{DragState, HIT_SLACK, HoverState, NetworkState, plot_height};

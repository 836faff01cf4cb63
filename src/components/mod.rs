pub mod controls;
pub mod force_graph;
mod sim_canvas;

pub use sim_canvas::SimCanvas;

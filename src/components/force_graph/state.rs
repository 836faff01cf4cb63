use std::collections::HashSet;

use crate::graph::{Edge, Graph};
use crate::layout::{ForceLayout, ForceParams};
use crate::ui::CONTROL_BAND;

/// Extra pick radius so small nodes stay easy to grab.
pub const HIT_SLACK: f64 = 4.0;
/// Pointer travel beyond which a press counts as a drag rather than a click.
const CLICK_TOLERANCE: f64 = 4.0;

/// Seconds a hover must last before neighbors light up.
const HIGHLIGHT_DELAY: f64 = 0.08;
/// Exponential approach rates, per second, toward lit and unlit.
const FADE_IN_RATE: f64 = 1.8;
const FADE_OUT_RATE: f64 = 1.26;
/// Below this the fade-out snaps to zero and forgets the previous node.
const FADE_FLOOR: f64 = 0.01;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// A graph, its live force layout and the pointer state shared by every
/// network widget.
pub struct NetworkState {
	pub graph: Graph,
	pub layout: ForceLayout,
	pub drag: DragState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub paused: bool,
	pub flow_time: f64,
	active: Vec<bool>,
}

impl NetworkState {
	pub fn new(graph: Graph, params: ForceParams, width: f64, height: f64) -> Self {
		let plot_h = plot_height(height);
		let layout = ForceLayout::new(graph.node_count(), graph.edge_pairs(), width, plot_h, params);
		Self {
			active: vec![true; graph.edge_count()],
			graph,
			layout,
			drag: DragState::default(),
			hover: HoverState::default(),
			width,
			height,
			paused: false,
			flow_time: 0.0,
		}
	}

	/// Whether the static edge at `idx` passes the current filter.
	pub fn is_active(&self, idx: usize) -> bool {
		self.active.get(idx).copied().unwrap_or(false)
	}

	pub fn active_edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
		self.graph
			.edges()
			.iter()
			.enumerate()
			.filter(|(i, _)| self.active[*i])
	}

	pub fn active_count(&self) -> usize {
		self.active.iter().filter(|a| **a).count()
	}

	/// Re-filter the static edge list; only active edges pull as springs.
	pub fn set_edge_filter(&mut self, keep: impl Fn(&Edge) -> bool) {
		self.active = self.graph.edges().iter().map(&keep).collect();
		let springs = self
			.active_edges()
			.map(|(_, e)| (e.source, e.target))
			.collect();
		self.layout.set_springs(springs);
		self.refresh_neighbors();
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.layout.node_at(x, y, HIT_SLACK)
	}

	pub fn position(&self, idx: usize) -> (f64, f64) {
		self.layout.position(idx).unwrap_or_default()
	}

	/// Tell the layout how big each node is drawn so walls and picking
	/// match what is on screen.
	pub fn size_nodes(&mut self, radius: impl Fn(usize) -> f64) {
		let radii = (0..self.graph.node_count()).map(radius).collect();
		self.layout.set_radii(radii);
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		let hover = &mut self.hover;
		if hover.node == node {
			return;
		}
		match (hover.node.take(), node) {
			// leaving every node: keep the old highlight around while it fades
			(Some(old), None) => {
				hover.prev_node = Some(old);
				hover.prev_neighbors = std::mem::take(&mut hover.neighbors);
			}
			(previous, Some(_)) => {
				hover.prev_node = None;
				hover.prev_neighbors.clear();
				if previous.is_none() {
					hover.delay_t = 0.0;
				}
			}
			(None, None) => {}
		}
		hover.node = node;
		self.refresh_neighbors();
	}

	fn refresh_neighbors(&mut self) {
		self.hover.neighbors.clear();
		let Some(idx) = self.hover.node else {
			return;
		};
		let touching: Vec<usize> = self
			.active_edges()
			.filter(|(_, e)| e.touches(idx))
			.map(|(_, e)| e.other(idx))
			.collect();
		self.hover.neighbors.extend(touching);
	}

	/// Hovered or fading node, or one of its neighbors.
	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.is_hovered(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		[self.hover.node, self.hover.prev_node].contains(&Some(idx))
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.or(self.hover.prev_node).is_some()
	}

	pub fn tick(&mut self, dt: f64) {
		if !self.paused {
			self.layout.step();
		}
		self.flow_time += dt;

		self.fade_highlight(dt);
	}

	fn fade_highlight(&mut self, dt: f64) {
		let hover = &mut self.hover;
		if hover.node.is_some() {
			hover.delay_t = (hover.delay_t + dt).min(HIGHLIGHT_DELAY);
			if hover.delay_t >= HIGHLIGHT_DELAY {
				hover.highlight_t += (1.0 - hover.highlight_t) * FADE_IN_RATE * dt;
			}
			return;
		}
		hover.highlight_t -= hover.highlight_t * FADE_OUT_RATE * dt;
		if hover.highlight_t < FADE_FLOOR {
			hover.highlight_t = 0.0;
			hover.prev_node = None;
			hover.prev_neighbors.clear();
		}
	}

	pub fn toggle_pause(&mut self) -> bool {
		self.paused = !self.paused;
		if !self.paused {
			self.layout.wake();
		}
		self.paused
	}

	pub fn reset(&mut self) {
		self.drag = DragState::default();
		self.layout.reset();
		self.paused = false;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout.resize(width, plot_height(height));
	}
}

/// Nodes live above the control band.
pub fn plot_height(height: f64) -> f64 {
	(height - CONTROL_BAND).max(CONTROL_BAND)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::fixtures;

	fn state() -> NetworkState {
		let g = fixtures::weighted(4, &[(0, 1, 1.0), (1, 2, 3.0), (2, 3, 5.0)]);
		NetworkState::new(g, ForceParams::default(), 800.0, 600.0)
	}

	#[test]
	fn click_without_motion_selects() {
		let mut s = state();
		let (x, y) = s.position(2);
		assert!(s.pointer_down(x + 1.0, y));
		s.pointer_move(x + 2.0, y + 1.0);
		assert_eq!(s.pointer_up(), Some(2));
		assert_eq!(s.layout.pinned(), None);
	}

	#[test]
	fn drag_moves_node_and_is_not_a_click() {
		let mut s = state();
		let (x, y) = s.position(0);
		assert!(s.pointer_down(x, y));
		s.pointer_move(200.0, 150.0);
		assert_eq!(s.position(0), (200.0, 150.0));
		s.tick(0.016);
		assert_eq!(s.position(0), (200.0, 150.0));
		assert_eq!(s.pointer_up(), None);
	}

	#[test]
	fn empty_space_press_grabs_nothing() {
		let mut s = state();
		assert!(!s.pointer_down(1.0, 1.0));
		assert_eq!(s.pointer_up(), None);
	}

	#[test]
	fn hover_collects_active_neighbors() {
		let mut s = state();
		s.set_hover(Some(1));
		assert_eq!(s.hover.neighbors, HashSet::from([0, 2]));
		s.set_edge_filter(|e| e.weight >= 3.0);
		assert_eq!(s.hover.neighbors, HashSet::from([2]));
		assert_eq!(s.active_count(), 2);
		assert!(!s.is_active(0));
		assert_eq!(s.layout.springs(), &[(1, 2), (2, 3)]);
	}

	#[test]
	fn hover_fades_out_through_previous_node() {
		let mut s = state();
		s.set_hover(Some(1));
		for _ in 0..120 {
			s.tick(0.016);
		}
		assert!(s.hover.highlight_t > 0.5);
		s.set_hover(None);
		assert!(s.is_highlighted(1));
		for _ in 0..600 {
			s.tick(0.016);
		}
		assert!(!s.has_active_highlight());
	}

	#[test]
	fn paused_layout_holds_still() {
		let mut s = state();
		s.toggle_pause();
		let before = s.layout.bodies().to_vec();
		s.tick(0.016);
		assert_eq!(s.layout.bodies(), before.as_slice());
	}
}

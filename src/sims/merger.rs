use log::info;
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, group_color, plot_height, render_network,
};
use crate::graph::{Edge, Graph};
use crate::ui::{Button, ControlBar, ControlEvent, Slider};

pub const LAST_MONTH: u32 = 12;
/// Seconds of playback per month.
const MONTH_SECONDS: f64 = 1.5;
const ORG_PULL: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Play,
	Reset,
}

/// A tie counts from the month it formed; ties without a month predate the merger.
pub fn active_by(edge: &Edge, month: u32) -> bool {
	edge.since.unwrap_or(0) <= month
}

/// Integration figures for the ties active by some month.
#[derive(Clone, Debug, PartialEq)]
pub struct Integration {
	pub active: usize,
	pub cross: usize,
	/// People with no active tie into the other organization.
	pub isolated: usize,
}

impl Integration {
	pub fn at(graph: &Graph, month: u32) -> Self {
		let mut reached = vec![false; graph.node_count()];
		let (mut active, mut cross) = (0, 0);
		for e in graph.edges().iter().filter(|e| active_by(e, month)) {
			active += 1;
			if !graph.same_group(e.source, e.target) {
				cross += 1;
				reached[e.source] = true;
				reached[e.target] = true;
			}
		}
		Self {
			active,
			cross,
			isolated: reached.iter().filter(|r| !**r).count(),
		}
	}

	/// Share of active ties that cross the old company line.
	pub fn index(&self) -> f64 {
		if self.active == 0 {
			0.0
		} else {
			self.cross as f64 / self.active as f64
		}
	}
}

/// Two companies merging; ties switch on month by month and each company
/// keeps its own side of the canvas.
pub struct MergerSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	month: u32,
	playing: bool,
	clock: f64,
	integration: Integration,
}

impl MergerSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let mut controls = ControlBar::new(vec![
			Button::new(Action::Play, "Play"),
			Button::new(Action::Reset, "Reset"),
		])
		.with_slider(Slider::new("Month", 0.0, LAST_MONTH as f64, 1.0, 0.0));
		controls.layout(width, height);

		let mut sim = Self {
			title: data.title,
			description: data.description,
			integration: Integration::at(&graph, 0),
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			month: 0,
			playing: false,
			clock: 0.0,
		};
		sim.apply_centers();
		sim.set_month(0);
		sim
	}

	fn apply_centers(&mut self) {
		let (w, h) = (self.net.width, plot_height(self.net.height));
		let graph = &self.net.graph;
		let per_node = (0..graph.node_count())
			.map(|i| match graph.group_index(i) {
				Some(0) => (w * 0.3, h / 2.0),
				Some(_) => (w * 0.7, h / 2.0),
				None => (w / 2.0, h / 2.0),
			})
			.collect();
		self.net.layout.set_centers(Some(per_node), ORG_PULL);
	}

	fn set_month(&mut self, month: u32) {
		self.month = month.min(LAST_MONTH);
		let month = self.month;
		self.net.set_edge_filter(|e| active_by(e, month));
		self.integration = Integration::at(&self.net.graph, month);
		if let Some(slider) = self.controls.slider_mut() {
			slider.set_value(month as f64);
		}
		info!(
			"merger: month {month}, integration {:.2}",
			self.integration.index()
		);
	}

	fn set_playing(&mut self, on: bool) {
		if on && self.month >= LAST_MONTH {
			self.set_month(0);
		}
		self.playing = on;
		self.clock = 0.0;
		self.controls.set_active(Action::Play, on);
		self.controls
			.set_label(Action::Play, if on { "Pause" } else { "Play" });
	}

	fn reset(&mut self) {
		self.set_playing(false);
		self.net.reset();
		self.set_month(0);
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Play) => self.set_playing(!self.playing),
			ControlEvent::Clicked(Action::Reset) => self.reset(),
			ControlEvent::SliderMoved(v) => {
				self.set_playing(false);
				self.set_month(v.round().max(0.0) as u32);
			}
		}
	}

	fn org_name(&self, g: usize) -> &str {
		self.net
			.graph
			.groups()
			.get(g)
			.map(String::as_str)
			.unwrap_or("?")
	}

	fn stats(&self) -> Vec<String> {
		let it = &self.integration;
		vec![
			format!("Month {} of {LAST_MONTH}", self.month),
			format!("Cross-company ties: {} of {}", it.cross, it.active),
			format!("Integration index: {:.0}%", 100.0 * it.index()),
			format!(
				"Not yet connected across: {} of {}",
				it.isolated,
				self.net.graph.node_count()
			),
			format!("■ {}  ■ {}", self.org_name(0), self.org_name(1)),
		]
	}
}

impl MicroSim for MergerSim {
	fn resize(&mut self, width: f64, height: f64) {
		self.net.resize(width, height);
		self.controls.layout(width, height);
		self.apply_centers();
	}

	fn tick(&mut self, dt: f64) {
		if self.playing {
			self.clock += dt;
			if self.clock >= MONTH_SECONDS {
				self.clock = 0.0;
				self.set_month(self.month + 1);
				if self.month >= LAST_MONTH {
					self.set_playing(false);
				}
			}
		}
		self.net.tick(dt);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) {
		let net = &self.net;
		let tooltip = hover_tooltip(net, |i| {
			let across = net
				.active_edges()
				.filter(|(_, e)| e.touches(i) && !net.graph.same_group(e.source, e.target))
				.count();
			node_lines(&net.graph, i, [format!("Ties across: {across}")])
		});
		render_frame(
			ctx,
			net,
			&self.controls,
			(&self.title, &self.description),
			&self.stats(),
			tooltip,
			|ctx| {
				render_network(
					net,
					ctx,
					|_, e| {
						let cross = !net.graph.same_group(e.source, e.target);
						let fresh = e.since == Some(self.month) && self.month > 0;
						Some(EdgeStyle {
							rgb: if cross { (120, 230, 140) } else { (100, 180, 255) },
							width: if fresh { 3.0 } else { 1.5 },
							..EdgeStyle::default()
						})
					},
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: NODE_RADIUS,
						label: Some(net.graph.node(i).label.clone()),
						ring: None,
					},
				)
			},
		);
	}

	fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(event) = route_down(&mut self.controls, &mut self.net, x, y) {
			self.handle(event);
		}
	}

	fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some(event) = route_move(&mut self.controls, &mut self.net, x, y) {
			self.handle(event);
		}
	}

	fn pointer_up(&mut self, _x: f64, _y: f64) {
		route_up(&mut self.controls, &mut self.net);
	}

	fn pointer_leave(&mut self) {
		route_leave(&mut self.controls, &mut self.net);
	}

	fn key_down(&mut self, key: &str) {
		match key {
			" " => self.set_playing(!self.playing),
			"r" | "R" => self.reset(),
			"ArrowRight" => self.set_month(self.month + 1),
			"ArrowLeft" => self.set_month(self.month.saturating_sub(1)),
			_ => {}
		}
	}

	fn cursor(&self) -> &'static str {
		network_cursor(&self.controls, &self.net)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::Dataset;
	use crate::graph::types::fixtures;
	use crate::sims::load;

	fn sim() -> MergerSim {
		MergerSim::new(load(Dataset::Merger).unwrap(), 800.0, 560.0)
	}

	#[test]
	fn integration_counts_cross_ties() {
		let g = fixtures::grouped(&["a", "a", "b", "b"], &[(0, 1), (2, 3), (1, 2)]);
		let it = Integration::at(&g, 12);
		assert_eq!((it.active, it.cross, it.isolated), (3, 1, 2));
		assert!((it.index() - 1.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn months_only_add_ties() {
		let mut sim = sim();
		let mut last = sim.net.active_count();
		for month in 1..=LAST_MONTH {
			sim.set_month(month);
			assert!(sim.net.active_count() >= last);
			last = sim.net.active_count();
		}
		assert_eq!(last, sim.net.graph.edge_count());
		assert!(sim.integration.index() > Integration::at(&sim.net.graph, 0).index());
	}

	#[test]
	fn playback_advances_and_stops() {
		let mut sim = sim();
		sim.key_down(" ");
		assert!(sim.playing);
		let frames = (MONTH_SECONDS / 0.016).ceil() as usize + 1;
		for _ in 0..frames {
			sim.tick(0.016);
		}
		assert_eq!(sim.month, 1);
		assert_eq!(sim.controls.slider().unwrap().value(), 1.0);
		for _ in 0..frames * LAST_MONTH as usize {
			sim.tick(0.016);
		}
		assert_eq!(sim.month, LAST_MONTH);
		assert!(!sim.playing);
		sim.key_down("r");
		assert_eq!(sim.month, 0);
	}

	#[test]
	fn slider_stops_playback() {
		let mut sim = sim();
		sim.set_playing(true);
		sim.handle(ControlEvent::SliderMoved(6.0));
		assert!(!sim.playing);
		assert_eq!(sim.month, 6);
		assert!(sim.net.active_edges().all(|(_, e)| active_by(e, 6)));
	}
}

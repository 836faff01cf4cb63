use log::debug;
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NetworkState, NodeStyle, group_color, render_network,
};
use crate::graph::Graph;
use crate::graph::algorithms::{DEFAULT_DAMPING, pagerank};
use crate::ui::{Button, ControlBar, ControlEvent, Slider};

const MIN_RADIUS: f64 = 8.0;
const RADIUS_RANGE: f64 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Pause,
	Reset,
}

/// PageRank over the ties at least `threshold` strong.
pub fn influence_scores(graph: &Graph, threshold: f64) -> Vec<f64> {
	let strong = graph.filtered(|e| e.weight >= threshold);
	pagerank(&strong, DEFAULT_DAMPING, 100, 1e-8)
}

fn scaled_radius(score: f64, max: f64) -> f64 {
	if max > 0.0 {
		MIN_RADIUS + RADIUS_RANGE * score / max
	} else {
		MIN_RADIUS
	}
}

/// Advice network where a slider hides weak ties and PageRank is recomputed
/// over whatever remains.
pub struct InfluenceSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	threshold: f64,
	scores: Vec<f64>,
	max_score: f64,
}

impl InfluenceSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let max_weight = graph
			.edges()
			.iter()
			.map(|e| e.weight)
			.fold(1.0, f64::max)
			.ceil();
		let mut controls = ControlBar::new(vec![
			Button::new(Action::Pause, "Pause"),
			Button::new(Action::Reset, "Reset"),
		])
		.with_slider(Slider::new("Min tie strength", 1.0, max_weight, 1.0, 1.0));
		controls.layout(width, height);

		let mut sim = Self {
			title: data.title,
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			threshold: 1.0,
			scores: Vec::new(),
			max_score: 0.0,
		};
		sim.apply_threshold(1.0);
		sim
	}

	fn apply_threshold(&mut self, threshold: f64) {
		self.threshold = threshold;
		self.net.set_edge_filter(|e| e.weight >= threshold);
		self.scores = influence_scores(&self.net.graph, threshold);
		self.max_score = self.scores.iter().copied().fold(0.0, f64::max);
		let (scores, max) = (&self.scores, self.max_score);
		self.net.size_nodes(|i| scaled_radius(scores[i], max));
		debug!(
			"influence: threshold {threshold}, {} active ties",
			self.net.active_count()
		);
	}

	fn radius(&self, i: usize) -> f64 {
		scaled_radius(self.scores[i], self.max_score)
	}

	/// Node indices by descending score.
	fn ranking(&self) -> Vec<usize> {
		let mut order: Vec<usize> = (0..self.scores.len()).collect();
		order.sort_by(|&a, &b| self.scores[b].total_cmp(&self.scores[a]));
		order
	}

	fn reset(&mut self) {
		self.net.reset();
		if let Some(slider) = self.controls.slider_mut() {
			slider.set_value(1.0);
		}
		self.apply_threshold(1.0);
		self.controls.set_label(Action::Pause, "Pause");
		self.controls.set_active(Action::Pause, false);
	}

	fn toggle_pause(&mut self) {
		let paused = self.net.toggle_pause();
		self.controls.set_active(Action::Pause, paused);
		self.controls
			.set_label(Action::Pause, if paused { "Resume" } else { "Pause" });
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Pause) => self.toggle_pause(),
			ControlEvent::Clicked(Action::Reset) => self.reset(),
			ControlEvent::SliderMoved(v) => {
				if v != self.threshold {
					self.apply_threshold(v);
				}
			}
		}
	}

	fn stats(&self) -> Vec<String> {
		let graph = &self.net.graph;
		let mut lines = vec![format!(
			"Active ties: {} of {}",
			self.net.active_count(),
			graph.edge_count()
		)];
		lines.push("Top influencers (PageRank)".to_string());
		for (rank, &i) in self.ranking().iter().take(3).enumerate() {
			lines.push(format!(
				"{}. {}  {:.3}",
				rank + 1,
				graph.node(i).label,
				self.scores[i]
			));
		}
		lines
	}
}

impl MicroSim for InfluenceSim {
	fn resize(&mut self, width: f64, height: f64) {
		self.net.resize(width, height);
		self.controls.layout(width, height);
	}

	fn tick(&mut self, dt: f64) {
		self.net.tick(dt);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) {
		let net = &self.net;
		let tooltip = hover_tooltip(net, |i| {
			let strong_out = net
				.active_edges()
				.filter(|(_, e)| e.source == i)
				.count();
			node_lines(
				&net.graph,
				i,
				[
					format!("PageRank: {:.3}", self.scores[i]),
					format!("Advises: {strong_out} people"),
				],
			)
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
						Some(EdgeStyle {
							width: 0.6 * e.weight,
							arrow: net.graph.is_directed(),
							..EdgeStyle::default()
						})
					},
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: self.radius(i),
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
			" " => self.toggle_pause(),
			"r" | "R" => self.reset(),
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
	use crate::sims::load;
	use crate::sims::tests::assert_discs_on_canvas;

	fn sim() -> InfluenceSim {
		InfluenceSim::new(load(Dataset::Influence).unwrap(), 800.0, 560.0)
	}

	#[test]
	fn stronger_threshold_drops_ties() {
		let mut sim = sim();
		let all = sim.net.active_count();
		assert_eq!(all, sim.net.graph.edge_count());
		sim.handle(ControlEvent::SliderMoved(3.0));
		assert!(sim.net.active_count() < all);
		assert!(sim.net.active_edges().all(|(_, e)| e.weight >= 3.0));
		assert!((sim.scores.iter().sum::<f64>() - 1.0).abs() < 1e-6);
	}

	#[test]
	fn slider_drag_recomputes_scores() {
		let mut sim = sim();
		let before = sim.scores.clone();
		let track = sim.controls.slider().unwrap().track();
		let (_, ty) = track.center();
		sim.pointer_down(track.right(), ty);
		assert_eq!(sim.threshold, sim.controls.slider().unwrap().max);
		assert_ne!(sim.scores, before);
		sim.pointer_up(track.right(), ty);
		sim.key_down("r");
		assert_eq!(sim.threshold, 1.0);
		assert_eq!(sim.scores, before);
	}

	#[test]
	fn dragged_top_node_stays_fully_visible() {
		let mut sim = sim();
		let top = sim.ranking()[0];
		let (x, y) = sim.net.position(top);
		sim.pointer_down(x, y);
		sim.pointer_move(-100.0, -100.0);
		for _ in 0..5 {
			sim.tick(0.016);
		}
		let (x, y) = sim.net.position(top);
		let r = sim.radius(top);
		assert_eq!(r, MIN_RADIUS + RADIUS_RANGE);
		assert!(x - r >= 0.0 && y - r >= 0.0, "disc at ({x}, {y}) leaves the canvas");
		assert_discs_on_canvas(&sim.net, |i| sim.radius(i));

		// the outer ring of a large disc still grabs it
		sim.pointer_up(x, y);
		assert_eq!(sim.net.node_at_position(x + r - 1.0, y), Some(top));
	}

	#[test]
	fn threshold_changes_resize_the_discs() {
		let mut sim = sim();
		sim.handle(ControlEvent::SliderMoved(4.0));
		for i in 0..sim.net.graph.node_count() {
			assert_eq!(sim.net.layout.radius(i), sim.radius(i));
		}
		sim.resize(300.0, 260.0);
		for _ in 0..200 {
			sim.tick(0.016);
		}
		assert_discs_on_canvas(&sim.net, |i| sim.radius(i));
	}

	#[test]
	fn radius_tracks_rank() {
		let sim = sim();
		let order = sim.ranking();
		let (top, bottom) = (order[0], order[order.len() - 1]);
		assert_eq!(sim.radius(top), MIN_RADIUS + RADIUS_RANGE);
		assert!(sim.radius(bottom) < sim.radius(top));
	}
}

use log::debug;
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, draw_overlay_edge, group_color,
	render_network,
};
use crate::graph::algorithms::{Candidate, LinkMetric, predict_links};
use crate::ui::{Button, ControlBar, ControlEvent};

const PREDICTION_COLOR: &str = "#5ad27a";
const SELECTED_RING: &str = "#ffd25a";
const DRAWN: usize = 3;
const LISTED: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Metric(LinkMetric),
	Clear,
}

const METRICS: [Action; 3] = [
	Action::Metric(LinkMetric::Jaccard),
	Action::Metric(LinkMetric::Cosine),
	Action::Metric(LinkMetric::AdamicAdar),
];

/// Click a person to see who they are most likely to connect with next.
pub struct LinkPredictionSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	metric: LinkMetric,
	selected: Option<usize>,
	candidates: Vec<Candidate>,
}

impl LinkPredictionSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let mut controls = ControlBar::new(vec![
			Button::new(Action::Metric(LinkMetric::Jaccard), "Jaccard").active(true),
			Button::new(Action::Metric(LinkMetric::Cosine), "Cosine"),
			Button::new(Action::Metric(LinkMetric::AdamicAdar), "Adamic-Adar"),
			Button::new(Action::Clear, "Clear"),
		]);
		controls.layout(width, height);
		Self {
			title: "Link Prediction".to_string(),
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			metric: LinkMetric::Jaccard,
			selected: None,
			candidates: Vec::new(),
		}
	}

	fn set_metric(&mut self, metric: LinkMetric) {
		self.metric = metric;
		self.controls.select(&METRICS, Action::Metric(metric));
		self.recompute();
	}

	fn select(&mut self, node: Option<usize>) {
		self.selected = node;
		self.recompute();
	}

	fn recompute(&mut self) {
		self.candidates = match self.selected {
			Some(node) => predict_links(&self.net.graph, node, self.metric, LISTED),
			None => Vec::new(),
		};
		debug!(
			"link prediction: {} candidates by {}",
			self.candidates.len(),
			self.metric.label()
		);
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Metric(metric)) => self.set_metric(metric),
			ControlEvent::Clicked(Action::Clear) => self.select(None),
			ControlEvent::SliderMoved(_) => {}
		}
	}

	fn stats(&self) -> Vec<String> {
		let graph = &self.net.graph;
		let Some(node) = self.selected else {
			return vec![
				"Click a person to predict new ties".to_string(),
				format!("Scoring by {}", self.metric.label()),
			];
		};
		let mut lines = vec![format!(
			"Likely ties for {} ({})",
			graph.node(node).label,
			self.metric.label()
		)];
		if self.candidates.is_empty() {
			lines.push("No shared neighbors with anyone new".to_string());
		}
		for (rank, c) in self.candidates.iter().enumerate() {
			lines.push(format!(
				"{}. {}  {:.3}  ({} shared)",
				rank + 1,
				graph.node(c.node).label,
				c.score,
				c.shared
			));
		}
		lines
	}

	fn ring(&self, i: usize) -> Option<&'static str> {
		if self.selected == Some(i) {
			Some(SELECTED_RING)
		} else if self.candidates.iter().take(DRAWN).any(|c| c.node == i) {
			Some(PREDICTION_COLOR)
		} else {
			None
		}
	}
}

impl MicroSim for LinkPredictionSim {
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
			let mut extra = vec![format!("Ties: {}", net.graph.degree(i))];
			if let Some(sel) = self.selected.filter(|&s| s != i) {
				extra.push(format!(
					"{} with {}: {:.3}",
					self.metric.label(),
					net.graph.node(sel).label,
					self.metric.score(&net.graph, sel, i)
				));
			}
			node_lines(&net.graph, i, extra)
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
					|_, _| Some(EdgeStyle::default()),
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: NODE_RADIUS,
						label: Some(net.graph.node(i).label.clone()),
						ring: self.ring(i),
					},
				);
				if let Some(sel) = self.selected {
					for c in self.candidates.iter().take(DRAWN) {
						draw_overlay_edge(net, ctx, sel, c.node, PREDICTION_COLOR, 2.5, true);
					}
				}
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
		if let Some(node) = route_up(&mut self.controls, &mut self.net) {
			self.select(Some(node));
		}
	}

	fn pointer_leave(&mut self) {
		route_leave(&mut self.controls, &mut self.net);
	}

	fn key_down(&mut self, key: &str) {
		match key {
			"j" | "J" => self.set_metric(LinkMetric::Jaccard),
			"c" | "C" => self.set_metric(LinkMetric::Cosine),
			"a" | "A" => self.set_metric(LinkMetric::AdamicAdar),
			"Escape" => self.select(None),
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

	fn sim() -> LinkPredictionSim {
		LinkPredictionSim::new(load(Dataset::Team).unwrap(), 800.0, 560.0)
	}

	#[test]
	fn selection_lists_non_neighbors_only() {
		let mut sim = sim();
		sim.select(Some(0));
		assert!(!sim.candidates.is_empty());
		assert!(sim.candidates.len() <= LISTED);
		for c in &sim.candidates {
			assert!(!sim.net.graph.are_adjacent(0, c.node));
			assert_ne!(c.node, 0);
			assert!(c.shared > 0);
		}
		let scores: Vec<f64> = sim.candidates.iter().map(|c| c.score).collect();
		assert!(scores.windows(2).all(|w| w[0] >= w[1]));
	}

	#[test]
	fn metric_switch_rescored_and_clear_empties() {
		let mut sim = sim();
		sim.select(Some(0));
		sim.key_down("a");
		assert_eq!(sim.metric, LinkMetric::AdamicAdar);
		assert!(sim.controls.buttons[2].active);
		for c in &sim.candidates {
			let expected = LinkMetric::AdamicAdar.score(&sim.net.graph, 0, c.node);
			assert!((c.score - expected).abs() < 1e-12);
		}

		let (x, y) = sim.controls.buttons[3].rect.center();
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
		assert_eq!(sim.selected, None);
		assert!(sim.candidates.is_empty());
		assert_eq!(sim.stats()[0], "Click a person to predict new ties");
	}

	#[test]
	fn clicking_a_node_selects_it() {
		let mut sim = sim();
		let (x, y) = sim.net.position(1);
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
		assert_eq!(sim.selected, Some(1));
		assert_eq!(sim.ring(1), Some(SELECTED_RING));
	}
}

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
use crate::graph::algorithms::{
	DEFAULT_DAMPING, betweenness_centrality, degree_centrality, pagerank,
};
use crate::ui::{Button, ControlBar, ControlEvent};

const MIN_RADIUS: f64 = 7.0;
const RADIUS_RANGE: f64 = 17.0;
const LEADERS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
	Degree,
	PageRank,
	Betweenness,
}

impl Metric {
	pub const ALL: [Metric; 3] = [Metric::Degree, Metric::PageRank, Metric::Betweenness];

	pub fn label(self) -> &'static str {
		match self {
			Metric::Degree => "Degree",
			Metric::PageRank => "PageRank",
			Metric::Betweenness => "Betweenness",
		}
	}
}

/// All three scores per node, computed once; the graph never changes.
#[derive(Clone, Debug)]
pub struct Scores {
	pub degree: Vec<f64>,
	pub pagerank: Vec<f64>,
	pub betweenness: Vec<f64>,
}

impl Scores {
	pub fn compute(graph: &Graph) -> Self {
		Self {
			degree: degree_centrality(graph, true),
			pagerank: pagerank(graph, DEFAULT_DAMPING, 100, 1e-8),
			betweenness: betweenness_centrality(graph, true),
		}
	}

	pub fn of(&self, metric: Metric) -> &[f64] {
		match metric {
			Metric::Degree => &self.degree,
			Metric::PageRank => &self.pagerank,
			Metric::Betweenness => &self.betweenness,
		}
	}

	/// Node indices by descending score; ties keep node order.
	pub fn ranking(&self, metric: Metric) -> Vec<usize> {
		let scores = self.of(metric);
		let mut order: Vec<usize> = (0..scores.len()).collect();
		order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
		order
	}
}

/// One network, three ways to say who matters. Node size follows the chosen
/// measure.
pub struct CentralitySim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Metric>,
	metric: Metric,
	scores: Scores,
}

impl CentralitySim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let scores = Scores::compute(&graph);
		let mut controls = ControlBar::new(
			Metric::ALL
				.into_iter()
				.map(|m| Button::new(m, m.label()).active(m == Metric::Degree))
				.collect(),
		);
		controls.layout(width, height);
		let mut sim = Self {
			title: "Centrality Explorer".to_string(),
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			metric: Metric::Degree,
			scores,
		};
		sim.set_metric(Metric::Degree);
		sim
	}

	fn set_metric(&mut self, metric: Metric) {
		self.metric = metric;
		self.controls.select(&Metric::ALL, metric);
		let radii: Vec<f64> = (0..self.net.graph.node_count()).map(|i| self.radius(i)).collect();
		self.net.layout.set_radii(radii);
		debug!("centrality: sizing by {}", metric.label());
	}

	fn radius(&self, i: usize) -> f64 {
		let scores = self.scores.of(self.metric);
		let max = scores.iter().copied().fold(0.0, f64::max);
		if max > 0.0 {
			MIN_RADIUS + RADIUS_RANGE * scores[i] / max
		} else {
			MIN_RADIUS
		}
	}

	fn handle(&mut self, event: ControlEvent<Metric>) {
		if let ControlEvent::Clicked(metric) = event {
			self.set_metric(metric);
		}
	}

	fn stats(&self) -> Vec<String> {
		let scores = self.scores.of(self.metric);
		let mut lines = vec![format!("Top {LEADERS} by {}", self.metric.label())];
		for (rank, &i) in self
			.scores
			.ranking(self.metric)
			.iter()
			.take(LEADERS)
			.enumerate()
		{
			lines.push(format!(
				"{}. {}  {:.3}",
				rank + 1,
				self.net.graph.node(i).label,
				scores[i]
			));
		}
		lines
	}
}

impl MicroSim for CentralitySim {
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
			node_lines(
				&net.graph,
				i,
				[
					format!("Degree: {:.3}", self.scores.degree[i]),
					format!("PageRank: {:.3}", self.scores.pagerank[i]),
					format!("Betweenness: {:.3}", self.scores.betweenness[i]),
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
					|_, _| Some(EdgeStyle::default()),
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
			"1" => self.set_metric(Metric::Degree),
			"2" => self.set_metric(Metric::PageRank),
			"3" => self.set_metric(Metric::Betweenness),
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
	use crate::sims::tests::assert_discs_on_canvas;

	#[test]
	fn star_center_leads_every_measure() {
		let g = fixtures::undirected(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
		let scores = Scores::compute(&g);
		for metric in Metric::ALL {
			assert_eq!(scores.ranking(metric)[0], 0, "{}", metric.label());
		}
		assert_eq!(scores.degree[0], 1.0);
		assert_eq!(scores.betweenness[0], 1.0);
		assert_eq!(scores.betweenness[1], 0.0);
	}

	#[test]
	fn bridge_wins_betweenness_but_not_degree() {
		// two triangles joined through node 3
		let g = fixtures::undirected(
			7,
			&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 6), (6, 4)],
		);
		let scores = Scores::compute(&g);
		assert_eq!(scores.ranking(Metric::Betweenness)[0], 3);
		assert_ne!(scores.ranking(Metric::Degree)[0], 3);
	}

	#[test]
	fn metric_buttons_resize_nodes() {
		let mut sim = CentralitySim::new(load(Dataset::Team).unwrap(), 800.0, 560.0);
		let top_degree = sim.scores.ranking(Metric::Degree)[0];
		assert_eq!(sim.radius(top_degree), MIN_RADIUS + RADIUS_RANGE);

		let (x, y) = sim.controls.buttons[2].rect.center();
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
		assert_eq!(sim.metric, Metric::Betweenness);
		assert!(sim.controls.buttons[2].active);
		assert!(!sim.controls.buttons[0].active);
		let top_between = sim.scores.ranking(Metric::Betweenness)[0];
		assert_eq!(sim.radius(top_between), MIN_RADIUS + RADIUS_RANGE);
		assert_eq!(sim.stats().len(), LEADERS + 1);
	}

	#[test]
	fn every_metric_keeps_discs_on_canvas() {
		let mut sim = CentralitySim::new(load(Dataset::Team).unwrap(), 800.0, 560.0);
		for metric in Metric::ALL {
			sim.set_metric(metric);
			let top = sim.scores.ranking(metric)[0];
			let (x, y) = sim.net.position(top);
			sim.pointer_down(x, y);
			sim.pointer_move(900.0, -50.0);
			for _ in 0..5 {
				sim.tick(0.016);
			}
			sim.pointer_up(900.0, -50.0);
			assert_discs_on_canvas(&sim.net, |i| sim.radius(i));
		}
	}
}

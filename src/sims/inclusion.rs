use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, group_color, plot_height, render_network,
};
use crate::graph::Graph;
use crate::layout::cluster_centers;
use crate::ui::{Button, ControlBar, ControlEvent};

/// Pull toward a group's own center while clustering.
const CLUSTER_STRENGTH: f64 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Cluster,
	Bridges,
	Reset,
}

/// Ties whose ends sit in different groups, and all ties.
pub fn cross_group_ties(graph: &Graph) -> (usize, usize) {
	let cross = graph
		.edges()
		.iter()
		.filter(|e| !graph.same_group(e.source, e.target))
		.count();
	(cross, graph.edge_count())
}

/// People with at least one tie outside their own group.
pub fn bridge_nodes(graph: &Graph) -> Vec<usize> {
	(0..graph.node_count())
		.filter(|&i| graph.neighbors(i).iter().any(|&j| !graph.same_group(i, j)))
		.collect()
}

/// People with at most one tie.
pub fn peripheral_nodes(graph: &Graph) -> Vec<usize> {
	(0..graph.node_count())
		.filter(|&i| graph.degree(i) <= 1)
		.collect()
}

pub struct InclusionSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	clustered: bool,
	show_bridges: bool,
	bridges: Vec<bool>,
	peripheral: Vec<usize>,
	cross: (usize, usize),
}

impl InclusionSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let mut bridges = vec![false; graph.node_count()];
		for i in bridge_nodes(&graph) {
			bridges[i] = true;
		}
		let peripheral = peripheral_nodes(&graph);
		let cross = cross_group_ties(&graph);

		let mut controls = ControlBar::new(vec![
			Button::new(Action::Cluster, "Cluster by group"),
			Button::new(Action::Bridges, "Show bridges"),
			Button::new(Action::Reset, "Reset"),
		]);
		controls.layout(width, height);
		Self {
			title: data.title,
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			clustered: false,
			show_bridges: false,
			bridges,
			peripheral,
			cross,
		}
	}

	fn set_clustered(&mut self, on: bool) {
		self.clustered = on;
		self.controls.set_active(Action::Cluster, on);
		self.apply_centers();
	}

	fn apply_centers(&mut self) {
		if !self.clustered {
			self.net.layout.set_centers(None, 0.0);
			return;
		}
		let graph = &self.net.graph;
		let centers = cluster_centers(
			graph.groups().len().max(1),
			self.net.width,
			plot_height(self.net.height),
		);
		let per_node = (0..graph.node_count())
			.map(|i| centers[graph.group_index(i).unwrap_or(0)])
			.collect();
		self.net.layout.set_centers(Some(per_node), CLUSTER_STRENGTH);
	}

	fn reset(&mut self) {
		self.net.reset();
		self.set_clustered(false);
		self.show_bridges = false;
		self.controls.set_active(Action::Bridges, false);
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Cluster) => self.set_clustered(!self.clustered),
			ControlEvent::Clicked(Action::Bridges) => {
				self.show_bridges = !self.show_bridges;
				self.controls.set_active(Action::Bridges, self.show_bridges);
			}
			ControlEvent::Clicked(Action::Reset) => self.reset(),
			ControlEvent::SliderMoved(_) => {}
		}
	}

	fn stats(&self) -> Vec<String> {
		let (cross, total) = self.cross;
		let share = if total > 0 { 100.0 * cross as f64 / total as f64 } else { 0.0 };
		let graph = &self.net.graph;
		let mut lines = vec![
			format!("Cross-group ties: {cross} of {total} ({share:.0}%)"),
			format!(
				"Bridges: {} of {} people",
				self.bridges.iter().filter(|b| **b).count(),
				graph.node_count()
			),
		];
		if !self.peripheral.is_empty() {
			let names: Vec<&str> = self
				.peripheral
				.iter()
				.map(|&i| graph.node(i).label.as_str())
				.collect();
			lines.push(format!("On the edge: {}", names.join(", ")));
		}
		for (g, name) in graph.groups().iter().enumerate() {
			let size = (0..graph.node_count())
				.filter(|&i| graph.group_index(i) == Some(g))
				.count();
			lines.push(format!("■ {name}: {size}"));
		}
		lines
	}
}

impl MicroSim for InclusionSim {
	fn resize(&mut self, width: f64, height: f64) {
		self.net.resize(width, height);
		self.controls.layout(width, height);
		self.apply_centers();
	}

	fn tick(&mut self, dt: f64) {
		self.net.tick(dt);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) {
		let net = &self.net;
		let tooltip = hover_tooltip(net, |i| {
			let outside = net
				.graph
				.neighbors(i)
				.iter()
				.filter(|&&j| !net.graph.same_group(i, j))
				.count();
			node_lines(
				&net.graph,
				i,
				[
					format!("Ties: {}", net.graph.degree(i)),
					format!("Outside own group: {outside}"),
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
						let cross = !net.graph.same_group(e.source, e.target);
						Some(EdgeStyle {
							rgb: if cross { (255, 210, 90) } else { (100, 180, 255) },
							width: if cross && self.show_bridges { 2.5 } else { 1.5 },
							..EdgeStyle::default()
						})
					},
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: NODE_RADIUS,
						label: Some(net.graph.node(i).label.clone()),
						ring: (self.show_bridges && self.bridges[i]).then_some("#ffd25a"),
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
			"c" | "C" => self.set_clustered(!self.clustered),
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
	use crate::graph::Node;
	use crate::graph::types::Edge;
	use crate::sims::load;

	fn tiny() -> Graph {
		let node = |id: &str, g: &str| Node {
			id: id.into(),
			label: id.into(),
			group: Some(g.into()),
			detail: None,
		};
		Graph::new(
			vec![node("a", "x"), node("b", "x"), node("c", "y"), node("d", "y")],
			vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3)],
			false,
		)
	}

	#[test]
	fn cross_ties_and_bridges() {
		let g = tiny();
		assert_eq!(cross_group_ties(&g), (1, 3));
		assert_eq!(bridge_nodes(&g), vec![1, 2]);
		assert_eq!(peripheral_nodes(&g), vec![0, 3]);
	}

	#[test]
	fn clustering_separates_groups() {
		let mut sim = InclusionSim::new(load(Dataset::Inclusion).unwrap(), 800.0, 560.0);
		sim.key_down("c");
		assert!(sim.clustered);
		sim.net.layout.settle(20_000);

		let graph = &sim.net.graph;
		let mean = |g: usize| {
			let members: Vec<_> = (0..graph.node_count())
				.filter(|&i| graph.group_index(i) == Some(g))
				.map(|i| sim.net.position(i))
				.collect();
			let n = members.len() as f64;
			(
				members.iter().map(|p| p.0).sum::<f64>() / n,
				members.iter().map(|p| p.1).sum::<f64>() / n,
			)
		};
		let (a, b) = (mean(0), mean(1));
		assert!((a.0 - b.0).hypot(a.1 - b.1) > 60.0);

		sim.key_down("r");
		assert!(!sim.clustered);
	}
}

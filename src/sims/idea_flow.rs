use log::info;
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, group_color, render_network,
};
use crate::graph::{Edge, Graph};
use crate::ui::{Button, ControlBar, ControlEvent};

const IDEA_KIND: &str = "idea";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	IdeasOnly,
	Pause,
	Reset,
}

pub fn is_idea(edge: &Edge) -> bool {
	edge.kind.as_deref() == Some(IDEA_KIND)
}

/// Ideas each person passed on and took in, aligned with the node list.
pub fn idea_counts(graph: &Graph) -> (Vec<usize>, Vec<usize>) {
	let mut given = vec![0; graph.node_count()];
	let mut received = vec![0; graph.node_count()];
	for e in graph.edges().iter().filter(|e| is_idea(e)) {
		given[e.source] += 1;
		received[e.target] += 1;
	}
	(given, received)
}

/// Prolific sharers are drawn a little larger.
fn idea_radius(given: usize) -> f64 {
	NODE_RADIUS + given.min(6) as f64
}

/// Directed idea and chat ties between departments; idea ties animate from
/// the person sharing toward the person receiving.
pub struct IdeaFlowSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	ideas_only: bool,
	given: Vec<usize>,
	received: Vec<usize>,
}

impl IdeaFlowSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let (given, received) = idea_counts(&graph);
		let mut controls = ControlBar::new(vec![
			Button::new(Action::IdeasOnly, "Ideas only"),
			Button::new(Action::Pause, "Pause"),
			Button::new(Action::Reset, "Reset"),
		]);
		controls.layout(width, height);
		let mut net = NetworkState::new(graph, data.physics, width, height);
		net.size_nodes(|i| idea_radius(given[i]));
		Self {
			title: data.title,
			description: data.description,
			net,
			controls,
			ideas_only: false,
			given,
			received,
		}
	}

	fn set_ideas_only(&mut self, on: bool) {
		self.ideas_only = on;
		self.controls.set_active(Action::IdeasOnly, on);
		self.net.set_edge_filter(|e| !on || is_idea(e));
		info!("idea flow: ideas only = {on}");
	}

	fn toggle_pause(&mut self) {
		let paused = self.net.toggle_pause();
		self.controls.set_active(Action::Pause, paused);
		self.controls
			.set_label(Action::Pause, if paused { "Resume" } else { "Pause" });
	}

	fn reset(&mut self) {
		self.net.reset();
		self.set_ideas_only(false);
		self.controls.set_active(Action::Pause, false);
		self.controls.set_label(Action::Pause, "Pause");
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::IdeasOnly) => self.set_ideas_only(!self.ideas_only),
			ControlEvent::Clicked(Action::Pause) => self.toggle_pause(),
			ControlEvent::Clicked(Action::Reset) => self.reset(),
			ControlEvent::SliderMoved(_) => {}
		}
	}

	fn stats(&self) -> Vec<String> {
		let graph = &self.net.graph;
		let total: usize = self.given.iter().sum();
		let mut lines = vec![format!("Ideas shared: {total}")];
		let top = |counts: &[usize]| {
			counts
				.iter()
				.enumerate()
				.max_by_key(|&(i, c)| (*c, std::cmp::Reverse(i)))
				.filter(|&(_, c)| *c > 0)
				.map(|(i, c)| format!("{} ({c})", graph.node(i).label))
		};
		if let Some(source) = top(&self.given) {
			lines.push(format!("Top source: {source}"));
		}
		if let Some(sink) = top(&self.received) {
			lines.push(format!("Top receiver: {sink}"));
		}
		lines
	}
}

impl MicroSim for IdeaFlowSim {
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
				[format!(
					"Ideas given: {} · received: {}",
					self.given[i], self.received[i]
				)],
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
						Some(if is_idea(e) {
							EdgeStyle {
								rgb: (255, 170, 60),
								width: 2.0,
								arrow: true,
								flowing: true,
							}
						} else {
							EdgeStyle {
								rgb: (150, 150, 170),
								width: 1.0,
								..EdgeStyle::default()
							}
						})
					},
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: idea_radius(self.given[i]),
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
			"i" | "I" => self.set_ideas_only(!self.ideas_only),
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

	fn sim() -> IdeaFlowSim {
		IdeaFlowSim::new(load(Dataset::IdeaFlow).unwrap(), 800.0, 560.0)
	}

	#[test]
	fn counts_only_idea_edges() {
		let sim = sim();
		let ideas = sim.net.graph.edges().iter().filter(|e| is_idea(e)).count();
		assert!(ideas > 0);
		assert!(ideas < sim.net.graph.edge_count(), "dataset mixes idea and chat ties");
		assert_eq!(sim.given.iter().sum::<usize>(), ideas);
		assert_eq!(sim.received.iter().sum::<usize>(), ideas);
	}

	#[test]
	fn ideas_only_filters_chat_ties() {
		let mut sim = sim();
		sim.key_down("i");
		assert!(sim.ideas_only);
		assert!(sim.net.active_edges().all(|(_, e)| is_idea(e)));
		sim.key_down("r");
		assert!(!sim.ideas_only);
		assert_eq!(sim.net.active_count(), sim.net.graph.edge_count());
	}

	#[test]
	fn pause_button_toggles_label() {
		let mut sim = sim();
		let (x, y) = sim.controls.buttons[1].rect.center();
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
		assert!(sim.net.paused);
		assert_eq!(sim.controls.buttons[1].label, "Resume");
		sim.key_down(" ");
		assert!(!sim.net.paused);
	}

	#[test]
	fn big_sharers_stay_on_canvas() {
		let mut sim = sim();
		let top = (0..sim.given.len()).max_by_key(|&i| sim.given[i]).unwrap();
		assert!(idea_radius(sim.given[top]) > NODE_RADIUS);
		let (x, y) = sim.net.position(top);
		sim.pointer_down(x, y);
		sim.pointer_move(-100.0, 2000.0);
		for _ in 0..5 {
			sim.tick(0.016);
		}
		assert_discs_on_canvas(&sim.net, |i| idea_radius(sim.given[i]));
	}

	#[test]
	fn stats_name_the_top_source() {
		let sim = sim();
		let stats = sim.stats();
		assert!(stats[0].starts_with("Ideas shared:"));
		assert!(stats.iter().any(|l| l.starts_with("Top source:")));
	}
}

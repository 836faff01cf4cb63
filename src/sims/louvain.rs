use log::{debug, info};
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, load, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, group_color, render_network,
};
use crate::data::Dataset;
use crate::error::SimError;
use crate::graph::algorithms::{CommunityScript, modularity};
use crate::ui::{Button, ControlBar, ControlEvent};

/// Step budget for running the layout to rest up front.
const SETTLE_STEPS: usize = 8_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Prev,
	Next,
	Restart,
}

/// Scripted community merges over a layout that is run to rest before the
/// first frame. Each step recolors the nodes; modularity is computed per step.
pub struct LouvainSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	script: CommunityScript,
	scores: Vec<f64>,
}

impl LouvainSim {
	pub fn from_dataset(width: f64, height: f64) -> Result<Self, SimError> {
		Self::new(load(Dataset::Louvain)?, width, height)
	}

	pub fn new(loaded: Loaded, width: f64, height: f64) -> Result<Self, SimError> {
		let Loaded { data, graph } = loaded;
		let mut script = CommunityScript::from_steps(&graph, &data.script)?;
		let mut scores = Vec::with_capacity(script.len());
		while let Some(step) = script.current() {
			scores.push(modularity(&graph, &step.communities));
			if !script.step_forward() {
				break;
			}
		}
		script.restart();
		info!("louvain: {} scripted steps", script.len());

		let mut controls = ControlBar::new(vec![
			Button::new(Action::Prev, "◀ Prev"),
			Button::new(Action::Next, "Next ▶"),
			Button::new(Action::Restart, "Restart"),
		]);
		controls.layout(width, height);

		let mut sim = Self {
			title: data.title,
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			script,
			scores,
		};
		sim.settle();
		Ok(sim)
	}

	fn settle(&mut self) {
		let steps = self.net.layout.settle(SETTLE_STEPS);
		debug!("louvain: layout settled after {steps} steps");
	}

	fn community(&self, node: usize) -> usize {
		self.script
			.current()
			.map_or(0, |step| step.communities[node])
	}

	fn modularity_now(&self) -> f64 {
		self.scores
			.get(self.script.position())
			.copied()
			.unwrap_or(0.0)
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Prev) => {
				self.script.step_back();
			}
			ControlEvent::Clicked(Action::Next) => {
				self.script.step_forward();
			}
			ControlEvent::Clicked(Action::Restart) => self.script.restart(),
			ControlEvent::SliderMoved(_) => {}
		}
	}

	fn stats(&self) -> Vec<String> {
		let Some(step) = self.script.current() else {
			return vec!["No scripted steps".to_string()];
		};
		vec![
			format!(
				"Step {} of {}: {}",
				self.script.position() + 1,
				self.script.len(),
				step.title
			),
			step.narration.clone(),
			format!("Communities: {}", step.community_count),
			format!("Modularity Q = {:.3}", self.modularity_now()),
		]
	}
}

impl MicroSim for LouvainSim {
	fn resize(&mut self, width: f64, height: f64) {
		self.net.resize(width, height);
		self.controls.layout(width, height);
		self.settle();
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
				[format!("Community {}", self.community(i) + 1)],
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
						let inside = self.community(e.source) == self.community(e.target);
						Some(if inside {
							EdgeStyle {
								rgb: (220, 220, 235),
								width: 2.0,
								..EdgeStyle::default()
							}
						} else {
							EdgeStyle {
								rgb: (110, 110, 130),
								width: 1.0,
								..EdgeStyle::default()
							}
						})
					},
					|i| NodeStyle {
						color: group_color(self.community(i)).to_string(),
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
			"ArrowRight" | "n" => self.handle(ControlEvent::Clicked(Action::Next)),
			"ArrowLeft" | "p" => self.handle(ControlEvent::Clicked(Action::Prev)),
			"r" | "R" => self.handle(ControlEvent::Clicked(Action::Restart)),
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

	fn sim() -> LouvainSim {
		LouvainSim::from_dataset(800.0, 560.0).unwrap()
	}

	#[test]
	fn layout_is_at_rest_before_the_first_frame() {
		let sim = sim();
		assert!(!sim.net.layout.is_running());
		assert!(sim.script.len() >= 2);
		assert_eq!(sim.scores.len(), sim.script.len());
	}

	#[test]
	fn steps_merge_communities_and_raise_modularity() {
		let mut sim = sim();
		let first = sim.script.current().unwrap().community_count;
		let mut best = sim.modularity_now();
		while !sim.script.is_last() {
			sim.key_down("ArrowRight");
			best = best.max(sim.modularity_now());
		}
		assert!(sim.script.current().unwrap().community_count < first);
		assert!(best > sim.scores[0]);
		assert!(best > 0.3);
	}

	#[test]
	fn buttons_step_and_clamp() {
		let mut sim = sim();
		let prev = sim.controls.buttons[0].rect.center();
		sim.pointer_down(prev.0, prev.1);
		sim.pointer_up(prev.0, prev.1);
		assert_eq!(sim.script.position(), 0);

		let next = sim.controls.buttons[1].rect.center();
		for _ in 0..sim.script.len() + 3 {
			sim.pointer_down(next.0, next.1);
			sim.pointer_up(next.0, next.1);
		}
		assert!(sim.script.is_last());
		sim.key_down("r");
		assert_eq!(sim.script.position(), 0);
	}

	#[test]
	fn stats_show_step_and_quality() {
		let sim = sim();
		let stats = sim.stats();
		assert!(stats[0].starts_with("Step 1 of"));
		assert!(stats.iter().any(|l| l.starts_with("Modularity Q = ")));
	}
}

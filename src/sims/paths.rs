use log::debug;
use web_sys::CanvasRenderingContext2d;

use super::{
	Loaded, MicroSim, hover_tooltip, network_cursor, node_lines, render_frame, route_down,
	route_leave, route_move, route_up,
};
use crate::components::controls::format_value;
use crate::components::force_graph::{
	EdgeStyle, NODE_RADIUS, NetworkState, NodeStyle, draw_overlay_edge, group_color,
	render_network,
};
use crate::graph::Graph;
use crate::graph::algorithms::{bfs_distances, bfs_path, dijkstra};
use crate::ui::{Button, ControlBar, ControlEvent};

const PATH_COLOR: &str = "#ffd25a";
const SOURCE_RING: &str = "#5ad27a";
const TARGET_RING: &str = "#ff6b6b";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMode {
	Hops,
	Weighted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Mode(PathMode),
	Clear,
}

const MODES: [Action; 2] = [Action::Mode(PathMode::Hops), Action::Mode(PathMode::Weighted)];

/// Endpoints picked so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	Empty,
	Source(usize),
	Pair(usize, usize),
}

impl Selection {
	/// Next state after clicking `node`: source, then target, then start over.
	pub fn click(self, node: usize) -> Self {
		match self {
			Selection::Source(s) if s != node => Selection::Pair(s, node),
			Selection::Source(s) => Selection::Source(s),
			Selection::Empty | Selection::Pair(..) => Selection::Source(node),
		}
	}
}

/// A found route and what it costs under the mode that found it.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
	pub nodes: Vec<usize>,
	pub cost: f64,
}

impl Route {
	pub fn hops(&self) -> usize {
		self.nodes.len().saturating_sub(1)
	}

	/// Consecutive node pairs along the route.
	pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.nodes.windows(2).map(|w| (w[0], w[1]))
	}
}

pub fn find_route(graph: &Graph, mode: PathMode, source: usize, target: usize) -> Option<Route> {
	match mode {
		PathMode::Hops => bfs_path(graph, source, target).map(|nodes| Route {
			cost: nodes.len().saturating_sub(1) as f64,
			nodes,
		}),
		PathMode::Weighted => {
			let paths = dijkstra(graph, source);
			Some(Route {
				cost: paths.cost_to(target)?,
				nodes: paths.path_to(target)?,
			})
		}
	}
}

/// Click two people to see the route between them, by fewest hops or by
/// lowest total tie cost.
pub struct PathSim {
	title: String,
	description: String,
	net: NetworkState,
	controls: ControlBar<Action>,
	mode: PathMode,
	selection: Selection,
	route: Option<Route>,
	/// Hops from the chosen source, for the tooltip.
	hops_from: Vec<Option<usize>>,
}

impl PathSim {
	pub fn new(loaded: Loaded, width: f64, height: f64) -> Self {
		let Loaded { data, graph } = loaded;
		let mut controls = ControlBar::new(vec![
			Button::new(Action::Mode(PathMode::Hops), "Fewest hops").active(true),
			Button::new(Action::Mode(PathMode::Weighted), "Weighted"),
			Button::new(Action::Clear, "Clear"),
		]);
		controls.layout(width, height);
		Self {
			title: "Shortest Path Explorer".to_string(),
			description: data.description,
			net: NetworkState::new(graph, data.physics, width, height),
			controls,
			mode: PathMode::Hops,
			selection: Selection::Empty,
			route: None,
			hops_from: Vec::new(),
		}
	}

	fn set_mode(&mut self, mode: PathMode) {
		self.mode = mode;
		self.controls.select(&MODES, Action::Mode(mode));
		self.recompute();
	}

	fn select(&mut self, node: usize) {
		self.selection = self.selection.click(node);
		self.recompute();
	}

	fn clear(&mut self) {
		self.selection = Selection::Empty;
		self.route = None;
		self.hops_from.clear();
	}

	fn recompute(&mut self) {
		self.hops_from = match self.selection {
			Selection::Source(s) | Selection::Pair(s, _) => bfs_distances(&self.net.graph, s),
			Selection::Empty => Vec::new(),
		};
		self.route = match self.selection {
			Selection::Pair(s, t) => find_route(&self.net.graph, self.mode, s, t),
			_ => None,
		};
		if let Some(route) = &self.route {
			debug!("paths: {:?} route over {} hops", self.mode, route.hops());
		}
	}

	fn on_route(&self, a: usize, b: usize) -> bool {
		self.route
			.as_ref()
			.is_some_and(|r| r.legs().any(|(x, y)| (x, y) == (a, b) || (x, y) == (b, a)))
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::Mode(mode)) => self.set_mode(mode),
			ControlEvent::Clicked(Action::Clear) => self.clear(),
			ControlEvent::SliderMoved(_) => {}
		}
	}

	fn stats(&self) -> Vec<String> {
		let graph = &self.net.graph;
		let name = |i: usize| graph.node(i).label.as_str();
		match self.selection {
			Selection::Empty => vec!["Click a person to pick the start".to_string()],
			Selection::Source(s) => vec![format!("From {}: click a destination", name(s))],
			Selection::Pair(s, t) => {
				let mut lines = vec![format!("{} → {}", name(s), name(t))];
				match &self.route {
					Some(route) => {
						let names: Vec<&str> = route.nodes.iter().map(|&i| name(i)).collect();
						lines.push(names.join(" → "));
						lines.push(format!("Hops: {}", route.hops()));
						if self.mode == PathMode::Weighted {
							lines.push(format!("Total cost: {}", format_value(route.cost)));
						}
					}
					None => lines.push("No route".to_string()),
				}
				lines
			}
		}
	}

	fn ring(&self, i: usize) -> Option<&'static str> {
		match self.selection {
			Selection::Source(s) if s == i => Some(SOURCE_RING),
			Selection::Pair(s, _) if s == i => Some(SOURCE_RING),
			Selection::Pair(_, t) if t == i => Some(TARGET_RING),
			_ => None,
		}
	}

	fn draw_weights(&self, ctx: &CanvasRenderingContext2d) {
		ctx.set_font("11px sans-serif");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.7)");
		for e in self.net.graph.edges() {
			let ((x1, y1), (x2, y2)) = (self.net.position(e.source), self.net.position(e.target));
			let _ = ctx.fill_text(&format_value(e.weight), (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 8.0);
		}
		ctx.set_text_align("left");
		ctx.set_text_baseline("alphabetic");
	}
}

impl MicroSim for PathSim {
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
			match self.hops_from.get(i) {
				Some(Some(d)) => extra.push(format!("Hops from start: {d}")),
				Some(None) => extra.push("Unreachable from start".to_string()),
				None => {}
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
					|_, e| {
						Some(EdgeStyle {
							width: if self.mode == PathMode::Weighted {
								0.8 + 0.4 * e.weight
							} else {
								1.5
							},
							..EdgeStyle::default()
						})
					},
					|i| NodeStyle {
						color: group_color(net.graph.group_index(i).unwrap_or(0)).to_string(),
						radius: NODE_RADIUS,
						label: Some(net.graph.node(i).label.clone()),
						ring: self.ring(i),
					},
				);
				if let Some(route) = &self.route {
					for (a, b) in route.legs() {
						draw_overlay_edge(net, ctx, a, b, PATH_COLOR, 5.0, false);
					}
				}
				if self.mode == PathMode::Weighted {
					self.draw_weights(ctx);
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
			self.select(node);
		}
	}

	fn pointer_leave(&mut self) {
		route_leave(&mut self.controls, &mut self.net);
	}

	fn key_down(&mut self, key: &str) {
		match key {
			"h" | "H" => self.set_mode(PathMode::Hops),
			"w" | "W" => self.set_mode(PathMode::Weighted),
			"Escape" | "c" | "C" => self.clear(),
			_ => {}
		}
	}

	fn cursor(&self) -> &'static str {
		network_cursor(&self.controls, &self.net)
	}
}

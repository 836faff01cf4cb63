//! The MicroSims themselves. Each owns its data, state and controls and is
//! driven by [`crate::components::SimCanvas`] through the [`MicroSim`] trait.

mod centrality;
mod idea_flow;
mod inclusion;
mod influence;
mod link_prediction;
mod louvain;
mod merger;
mod org_chart;
mod paths;

use web_sys::CanvasRenderingContext2d;

pub use centrality::CentralitySim;
pub use idea_flow::IdeaFlowSim;
pub use inclusion::InclusionSim;
pub use influence::InfluenceSim;
pub use link_prediction::LinkPredictionSim;
pub use louvain::LouvainSim;
pub use merger::MergerSim;
pub use org_chart::OrgChartSim;
pub use paths::PathSim;

use crate::components::controls::{
	clear, draw_control_bar, draw_heading, draw_panel, draw_tooltip,
};
use crate::components::force_graph::NetworkState;
use crate::data::Dataset;
use crate::error::SimError;
use crate::graph::Graph;
use crate::ui::{ControlBar, ControlEvent, Tooltip};

/// Canvas size used until the host measures the real one.
pub const DEFAULT_SIZE: (f64, f64) = (800.0, 560.0);

/// One interactive widget. Every call happens on the frame loop's thread,
/// between or during animation frames.
pub trait MicroSim {
	fn resize(&mut self, width: f64, height: f64);
	fn tick(&mut self, dt: f64);
	fn render(&self, ctx: &CanvasRenderingContext2d);
	fn pointer_down(&mut self, x: f64, y: f64);
	fn pointer_move(&mut self, x: f64, y: f64);
	fn pointer_up(&mut self, x: f64, y: f64);
	fn pointer_leave(&mut self);
	fn key_down(&mut self, _key: &str) {}
	/// CSS cursor for the current hover state.
	fn cursor(&self) -> &'static str {
		"default"
	}
}

/// Every widget with a route of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKind {
	IdeaFlow,
	Inclusion,
	Influence,
	Merger,
	Louvain,
	ShortestPath,
	Centrality,
	LinkPrediction,
	OrgChart,
}

impl SimKind {
	pub const ALL: [SimKind; 9] = [
		SimKind::IdeaFlow,
		SimKind::Inclusion,
		SimKind::Influence,
		SimKind::Merger,
		SimKind::Louvain,
		SimKind::ShortestPath,
		SimKind::Centrality,
		SimKind::LinkPrediction,
		SimKind::OrgChart,
	];

	pub fn slug(self) -> &'static str {
		match self {
			SimKind::IdeaFlow => "idea-flow-network",
			SimKind::Inclusion => "inclusion-network-map",
			SimKind::Influence => "influence-network",
			SimKind::Merger => "merger-integration-monitor",
			SimKind::Louvain => "louvain-community-detection",
			SimKind::ShortestPath => "shortest-path-explorer",
			SimKind::Centrality => "centrality-explorer",
			SimKind::LinkPrediction => "link-prediction",
			SimKind::OrgChart => "org-chart",
		}
	}

	pub fn from_slug(slug: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|k| k.slug() == slug)
	}

	pub fn title(self) -> &'static str {
		match self {
			SimKind::IdeaFlow => "Idea Flow Network",
			SimKind::Inclusion => "Inclusion Network Map",
			SimKind::Influence => "Influence Network",
			SimKind::Merger => "Merger Integration Monitor",
			SimKind::Louvain => "Louvain Community Detection",
			SimKind::ShortestPath => "Shortest Path Explorer",
			SimKind::Centrality => "Centrality Explorer",
			SimKind::LinkPrediction => "Link Prediction",
			SimKind::OrgChart => "Org Chart",
		}
	}

	pub fn summary(self) -> &'static str {
		match self {
			SimKind::IdeaFlow => "Follow who passes new ideas to whom across departments.",
			SimKind::Inclusion => "See which groups are woven in and who sits on the edge.",
			SimKind::Influence => "Filter weak ties and watch influence concentrate.",
			SimKind::Merger => "Track cross-company ties month by month after a merger.",
			SimKind::Louvain => "Step through how communities merge into larger ones.",
			SimKind::ShortestPath => "Compare fewest hops with cheapest weighted routes.",
			SimKind::Centrality => "Size people by degree, PageRank or betweenness.",
			SimKind::LinkPrediction => "Score likely new ties from shared neighbors.",
			SimKind::OrgChart => "The formal hierarchy, for contrast with the informal network.",
		}
	}

	/// Build the widget from its embedded dataset. The org chart loads over
	/// the network and is built by its page instead.
	pub fn build(self) -> Result<Box<dyn MicroSim>, SimError> {
		let (w, h) = DEFAULT_SIZE;
		Ok(match self {
			SimKind::IdeaFlow => Box::new(IdeaFlowSim::new(load(Dataset::IdeaFlow)?, w, h)),
			SimKind::Inclusion => Box::new(InclusionSim::new(load(Dataset::Inclusion)?, w, h)),
			SimKind::Influence => Box::new(InfluenceSim::new(load(Dataset::Influence)?, w, h)),
			SimKind::Merger => Box::new(MergerSim::new(load(Dataset::Merger)?, w, h)),
			SimKind::Louvain => Box::new(LouvainSim::from_dataset(w, h)?),
			SimKind::ShortestPath => Box::new(PathSim::new(load(Dataset::Team)?, w, h)),
			SimKind::Centrality => Box::new(CentralitySim::new(load(Dataset::Team)?, w, h)),
			SimKind::LinkPrediction => {
				Box::new(LinkPredictionSim::new(load(Dataset::Team)?, w, h))
			}
			SimKind::OrgChart => Box::new(OrgChartSim::placeholder(w, h)),
		})
	}
}

/// Loaded dataset plus the graph built from it.
pub struct Loaded {
	pub data: crate::data::GraphData,
	pub graph: Graph,
}

fn load(dataset: Dataset) -> Result<Loaded, SimError> {
	let data = dataset.load()?;
	let graph = Graph::from_data(&data)?;
	log::info!(
		"{}: {} nodes, {} edges",
		dataset.name(),
		graph.node_count(),
		graph.edge_count()
	);
	Ok(Loaded { data, graph })
}

/// Tooltip lines for a network node: label, group, detail, then extras.
fn node_lines(graph: &Graph, idx: usize, extra: impl IntoIterator<Item = String>) -> Vec<String> {
	let node = graph.node(idx);
	let mut lines = vec![node.label.clone()];
	if let Some(group) = &node.group {
		lines.push(group.clone());
	}
	if let Some(detail) = &node.detail {
		lines.push(detail.clone());
	}
	lines.extend(extra);
	lines
}

/// Press goes to the controls when it lands in their band, else to the network.
fn route_down<A: Copy + PartialEq>(
	controls: &mut ControlBar<A>,
	net: &mut NetworkState,
	x: f64,
	y: f64,
) -> Option<ControlEvent<A>> {
	if controls.contains(x, y) {
		return controls.press(x, y);
	}
	net.pointer_down(x, y);
	None
}

fn route_move<A: Copy + PartialEq>(
	controls: &mut ControlBar<A>,
	net: &mut NetworkState,
	x: f64,
	y: f64,
) -> Option<ControlEvent<A>> {
	controls.hover(x, y);
	if controls.is_dragging() {
		return controls.drag(x);
	}
	if controls.contains(x, y) && net.drag.node.is_none() {
		net.set_hover(None);
		return None;
	}
	net.pointer_move(x, y);
	None
}

/// Returns the clicked node, if the press was a click on one.
fn route_up<A: Copy + PartialEq>(controls: &mut ControlBar<A>, net: &mut NetworkState) -> Option<usize> {
	controls.release();
	net.pointer_up()
}

fn route_leave<A: Copy + PartialEq>(controls: &mut ControlBar<A>, net: &mut NetworkState) {
	controls.release();
	controls.clear_hover();
	net.pointer_leave();
}

fn network_cursor<A>(controls: &ControlBar<A>, net: &NetworkState) -> &'static str {
	if net.drag.node.is_some() {
		"grabbing"
	} else if net.hover.node.is_some() {
		"grab"
	} else if controls.buttons.iter().any(|b| b.hovered) {
		"pointer"
	} else {
		"default"
	}
}

/// Draw one frame; the tooltip goes last so nothing covers it.
fn render_frame<A: Copy + PartialEq>(
	ctx: &CanvasRenderingContext2d,
	net: &NetworkState,
	controls: &ControlBar<A>,
	heading: (&str, &str),
	stats: &[String],
	tooltip: Option<Tooltip>,
	draw_graph: impl FnOnce(&CanvasRenderingContext2d),
) {
	clear(ctx, net.width, net.height);
	draw_graph(ctx);
	draw_heading(ctx, heading.0, heading.1);
	draw_panel(ctx, net.width, stats);
	draw_control_bar(ctx, controls);
	if let Some(tooltip) = tooltip {
		draw_tooltip(ctx, &tooltip, net.width, net.height);
	}
}

/// Tooltip for whichever node is hovered, built by `lines`.
fn hover_tooltip(net: &NetworkState, lines: impl FnOnce(usize) -> Vec<String>) -> Option<Tooltip> {
	if net.drag.moved {
		return None;
	}
	let idx = net.hover.node?;
	Some(Tooltip::new(net.position(idx), lines(idx)))
}

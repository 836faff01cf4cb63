use std::collections::{BTreeSet, HashMap};

use crate::data::GraphData;
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub group: Option<String>,
	pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
	pub kind: Option<String>,
	pub since: Option<u32>,
}

impl Edge {
	pub fn new(source: usize, target: usize) -> Self {
		Self {
			source,
			target,
			weight: 1.0,
			kind: None,
			since: None,
		}
	}

	pub fn weighted(source: usize, target: usize, weight: f64) -> Self {
		Self {
			weight,
			..Self::new(source, target)
		}
	}

	pub fn touches(&self, node: usize) -> bool {
		self.source == node || self.target == node
	}

	/// The endpoint that is not `node`.
	pub fn other(&self, node: usize) -> usize {
		if self.source == node { self.target } else { self.source }
	}
}

/// Fixed node and edge lists with adjacency built once up front.
#[derive(Debug, Clone)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	directed: bool,
	id_to_index: HashMap<String, usize>,
	out_adj: Vec<Vec<(usize, f64)>>,
	neighbors: Vec<Vec<usize>>,
	groups: Vec<String>,
}

impl Graph {
	/// Build from index-based edges. Edges pointing outside the node list are skipped.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, directed: bool) -> Self {
		let n = nodes.len();
		let edges: Vec<Edge> = edges
			.into_iter()
			.filter(|e| e.source < n && e.target < n && e.source != e.target)
			.collect();
		let id_to_index = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();

		let mut out_adj = vec![Vec::new(); n];
		let mut neighbor_sets = vec![BTreeSet::new(); n];
		for e in &edges {
			out_adj[e.source].push((e.target, e.weight));
			if !directed {
				out_adj[e.target].push((e.source, e.weight));
			}
			neighbor_sets[e.source].insert(e.target);
			neighbor_sets[e.target].insert(e.source);
		}

		let mut groups: Vec<String> = Vec::new();
		for g in nodes.iter().filter_map(|n| n.group.as_ref()) {
			if !groups.contains(g) {
				groups.push(g.clone());
			}
		}

		Self {
			nodes,
			edges,
			directed,
			id_to_index,
			out_adj,
			neighbors: neighbor_sets
				.into_iter()
				.map(|s| s.into_iter().collect())
				.collect(),
			groups,
		}
	}

	/// Build from a dataset, checking every id the edges mention.
	pub fn from_data(data: &GraphData) -> Result<Self, SimError> {
		let mut seen = HashMap::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for (i, n) in data.nodes.iter().enumerate() {
			if seen.insert(n.id.clone(), i).is_some() {
				return Err(SimError::DuplicateNode(n.id.clone()));
			}
			nodes.push(Node {
				id: n.id.clone(),
				label: n.label.clone().unwrap_or_else(|| n.id.clone()),
				group: n.group.clone(),
				detail: n.detail.clone(),
			});
		}

		let lookup = |id: &str| {
			seen.get(id)
				.copied()
				.ok_or_else(|| SimError::UnknownNode(id.to_string()))
		};
		let mut edges = Vec::with_capacity(data.links.len());
		for link in &data.links {
			let (source, target) = (lookup(&link.source)?, lookup(&link.target)?);
			if source == target {
				return Err(SimError::SelfLoop(link.source.clone()));
			}
			edges.push(Edge {
				source,
				target,
				weight: link.weight,
				kind: link.kind.clone(),
				since: link.since,
			});
		}

		Ok(Self::new(nodes, edges, data.directed))
	}

	/// Same nodes, only the edges `keep` accepts.
	pub fn filtered(&self, keep: impl Fn(&Edge) -> bool) -> Self {
		let edges = self.edges.iter().filter(|e| keep(e)).cloned().collect();
		Self::new(self.nodes.clone(), edges, self.directed)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}
	pub fn node(&self, idx: usize) -> &Node {
		&self.nodes[idx]
	}
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}
	pub fn is_directed(&self) -> bool {
		self.directed
	}
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.id_to_index.get(id).copied()
	}

	/// Edges leaving `idx`; both directions for undirected graphs.
	pub fn out_edges(&self, idx: usize) -> &[(usize, f64)] {
		&self.out_adj[idx]
	}

	/// Everyone `idx` is tied to, ignoring direction. Sorted, no repeats.
	pub fn neighbors(&self, idx: usize) -> &[usize] {
		&self.neighbors[idx]
	}

	pub fn degree(&self, idx: usize) -> usize {
		self.neighbors[idx].len()
	}

	pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
		self.neighbors[a].binary_search(&b).is_ok()
	}

	/// Distinct group tags in order of first appearance.
	pub fn groups(&self) -> &[String] {
		&self.groups
	}

	pub fn group_index(&self, idx: usize) -> Option<usize> {
		let group = self.nodes[idx].group.as_ref()?;
		self.groups.iter().position(|g| g == group)
	}

	pub fn same_group(&self, a: usize, b: usize) -> bool {
		self.nodes[a].group == self.nodes[b].group
	}

	/// Edges as index pairs, the shape the force layout consumes.
	pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
		self.edges.iter().map(|e| (e.source, e.target)).collect()
	}
}

#[cfg(test)]
pub(crate) mod fixtures {
	use super::*;

	pub fn node(id: &str, group: &str) -> Node {
		Node {
			id: id.to_string(),
			label: id.to_uppercase(),
			group: Some(group.to_string()),
			detail: None,
		}
	}

	/// Undirected graph over nodes named `n0..`, all in group "g".
	pub fn undirected(n: usize, edges: &[(usize, usize)]) -> Graph {
		let nodes = (0..n).map(|i| node(&format!("n{i}"), "g")).collect();
		let edges = edges.iter().map(|&(a, b)| Edge::new(a, b)).collect();
		Graph::new(nodes, edges, false)
	}

	pub fn directed(n: usize, edges: &[(usize, usize)]) -> Graph {
		let nodes = (0..n).map(|i| node(&format!("n{i}"), "g")).collect();
		let edges = edges.iter().map(|&(a, b)| Edge::new(a, b)).collect();
		Graph::new(nodes, edges, true)
	}

	/// Undirected graph with one node per entry of `groups`, named `n0..`.
	pub fn grouped(groups: &[&str], edges: &[(usize, usize)]) -> Graph {
		let nodes = groups
			.iter()
			.enumerate()
			.map(|(i, g)| node(&format!("n{i}"), g))
			.collect();
		let edges = edges.iter().map(|&(a, b)| Edge::new(a, b)).collect();
		Graph::new(nodes, edges, false)
	}

	pub fn weighted(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
		let nodes = (0..n).map(|i| node(&format!("n{i}"), "g")).collect();
		let edges = edges
			.iter()
			.map(|&(a, b, w)| Edge::weighted(a, b, w))
			.collect();
		Graph::new(nodes, edges, false)
	}
}

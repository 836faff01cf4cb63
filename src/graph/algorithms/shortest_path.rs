//! Weighted shortest paths.

use crate::graph::algorithms::traversal::walk_back;
use crate::graph::types::Graph;

/// Result of a single-source Dijkstra run.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
	pub source: usize,
	pub dist: Vec<f64>,
	prev: Vec<Option<usize>>,
}

impl ShortestPaths {
	pub fn cost_to(&self, target: usize) -> Option<f64> {
		self.dist.get(target).copied().filter(|d| d.is_finite())
	}

	pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
		self.cost_to(target)?;
		Some(walk_back(&self.prev, target))
	}
}

/// Dijkstra with a linear scan for the closest unvisited node.
///
/// O(n²), which is nothing at classroom scale. Negative weights are treated as zero.
pub fn dijkstra(graph: &Graph, source: usize) -> ShortestPaths {
	let n = graph.node_count();
	let mut dist = vec![f64::INFINITY; n];
	let mut prev = vec![None; n];
	let mut done = vec![false; n];
	if source < n {
		dist[source] = 0.0;
	}

	loop {
		let next = (0..n)
			.filter(|&i| !done[i] && dist[i].is_finite())
			.min_by(|&a, &b| dist[a].total_cmp(&dist[b]));
		let Some(u) = next else {
			break;
		};
		done[u] = true;

		for &(v, w) in graph.out_edges(u) {
			let candidate = dist[u] + w.max(0.0);
			if candidate < dist[v] {
				dist[v] = candidate;
				prev[v] = Some(u);
			}
		}
	}

	ShortestPaths { source, dist, prev }
}

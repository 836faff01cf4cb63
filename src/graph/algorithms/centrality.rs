//! Degree and betweenness centrality.

use std::collections::VecDeque;

use crate::graph::types::Graph;

/// Neighbor count per node, divided by `n - 1` when `normalized`.
pub fn degree_centrality(graph: &Graph, normalized: bool) -> Vec<f64> {
	let n = graph.node_count();
	let scale = if normalized && n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };
	(0..n).map(|i| graph.degree(i) as f64 * scale).collect()
}

/// Brandes' betweenness centrality over unweighted shortest paths.
///
/// Undirected graphs count each pair once. With `normalized` the scores are
/// divided by the number of pairs that could route through a node, so they
/// land in `[0, 1]`.
pub fn betweenness_centrality(graph: &Graph, normalized: bool) -> Vec<f64> {
	let n = graph.node_count();
	let mut cb = vec![0.0; n];

	for s in 0..n {
		let mut stack = Vec::with_capacity(n);
		let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
		let mut sigma = vec![0.0_f64; n];
		let mut dist = vec![-1_i64; n];
		sigma[s] = 1.0;
		dist[s] = 0;

		let mut queue = VecDeque::from([s]);
		while let Some(v) = queue.pop_front() {
			stack.push(v);
			for &(w, _) in graph.out_edges(v) {
				if dist[w] < 0 {
					dist[w] = dist[v] + 1;
					queue.push_back(w);
				}
				if dist[w] == dist[v] + 1 {
					sigma[w] += sigma[v];
					preds[w].push(v);
				}
			}
		}

		let mut delta = vec![0.0; n];
		while let Some(w) = stack.pop() {
			for &v in &preds[w] {
				delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
			}
			if w != s {
				cb[w] += delta[w];
			}
		}
	}

	if !graph.is_directed() {
		for c in cb.iter_mut() {
			*c /= 2.0;
		}
	}

	if normalized && n > 2 {
		let pairs = ((n - 1) * (n - 2)) as f64;
		let pairs = if graph.is_directed() { pairs } else { pairs / 2.0 };
		for c in cb.iter_mut() {
			*c /= pairs;
		}
	}

	cb
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::fixtures;

	#[test]
	fn path_middle_carries_all_traffic() {
		let g = fixtures::undirected(3, &[(0, 1), (1, 2)]);
		assert_eq!(betweenness_centrality(&g, false), vec![0.0, 1.0, 0.0]);
		assert_eq!(betweenness_centrality(&g, true), vec![0.0, 1.0, 0.0]);
	}

	#[test]
	fn star_center_is_on_every_path() {
		let g = fixtures::undirected(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
		let cb = betweenness_centrality(&g, false);
		assert_eq!(cb[0], 6.0);
		assert!(cb[1..].iter().all(|&c| c == 0.0));
	}

	#[test]
	fn split_paths_share_credit() {
		// square: 0-1-2 and 0-3-2 are both shortest
		let g = fixtures::undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
		let cb = betweenness_centrality(&g, false);
		for c in cb {
			assert!((c - 0.5).abs() < 1e-12);
		}
	}

	#[test]
	fn degree_normalizes_by_possible_ties() {
		let g = fixtures::undirected(4, &[(0, 1), (0, 2), (0, 3)]);
		assert_eq!(degree_centrality(&g, false), vec![3.0, 1.0, 1.0, 1.0]);
		assert_eq!(degree_centrality(&g, true)[0], 1.0);
	}
}

//! Breadth-first search over hop counts.

use std::collections::VecDeque;

use crate::graph::types::Graph;

/// Hop distance from `source` to every node, `None` where unreachable.
pub fn bfs_distances(graph: &Graph, source: usize) -> Vec<Option<usize>> {
	bfs(graph, source).0
}

/// Fewest-hops path from `source` to `target`, both ends included.
pub fn bfs_path(graph: &Graph, source: usize, target: usize) -> Option<Vec<usize>> {
	if source >= graph.node_count() || target >= graph.node_count() {
		return None;
	}
	let (dist, prev) = bfs(graph, source);
	dist[target]?;
	Some(walk_back(&prev, target))
}

fn bfs(graph: &Graph, source: usize) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
	let n = graph.node_count();
	let mut dist = vec![None; n];
	let mut prev = vec![None; n];
	if source >= n {
		return (dist, prev);
	}

	let mut queue = VecDeque::new();
	dist[source] = Some(0);
	queue.push_back(source);
	while let Some(node) = queue.pop_front() {
		let d = dist[node].unwrap_or(0);
		for &(next, _) in graph.out_edges(node) {
			if dist[next].is_none() {
				dist[next] = Some(d + 1);
				prev[next] = Some(node);
				queue.push_back(next);
			}
		}
	}
	(dist, prev)
}

/// Follow predecessor links from `target` back to the source.
pub(crate) fn walk_back(prev: &[Option<usize>], target: usize) -> Vec<usize> {
	let mut path = vec![target];
	let mut cur = target;
	while let Some(p) = prev[cur] {
		path.push(p);
		cur = p;
	}
	path.reverse();
	path
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::fixtures;

	#[test]
	fn distances_count_hops() {
		let g = fixtures::undirected(5, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
		assert_eq!(
			bfs_distances(&g, 0),
			vec![Some(0), Some(1), Some(2), Some(1), None]
		);
	}

	#[test]
	fn path_takes_fewest_hops() {
		let g = fixtures::undirected(5, &[(0, 1), (1, 2), (2, 3), (0, 4), (4, 3)]);
		assert_eq!(bfs_path(&g, 0, 3), Some(vec![0, 4, 3]));
		assert_eq!(bfs_path(&g, 2, 2), Some(vec![2]));
	}

	#[test]
	fn directed_edges_are_one_way() {
		let g = fixtures::directed(3, &[(0, 1), (1, 2)]);
		assert_eq!(bfs_path(&g, 0, 2), Some(vec![0, 1, 2]));
		assert_eq!(bfs_path(&g, 2, 0), None);
	}
}

use crate::graph::types::Graph;

/// Standard PageRank damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Iterative PageRank until the scores move less than `tolerance` (L1) or
/// `max_iterations` pass.
///
/// Scores are aligned with `graph.nodes()` and sum to 1. Undirected graphs
/// walk edges both ways; edge weights bias where a node's rank flows.
pub fn pagerank(graph: &Graph, damping: f64, max_iterations: usize, tolerance: f64) -> Vec<f64> {
	let n = graph.node_count();
	if n == 0 {
		return vec![];
	}

	let nf = n as f64;
	let mut scores = vec![1.0 / nf; n];

	for _ in 0..max_iterations {
		let mut next = vec![(1.0 - damping) / nf; n];
		let mut dangling = 0.0;

		for (i, &score) in scores.iter().enumerate() {
			let out = graph.out_edges(i);
			let total: f64 = out.iter().map(|&(_, w)| w.max(0.0)).sum();
			if total <= 0.0 {
				// Dangling node: distribute evenly
				dangling += score;
				continue;
			}
			for &(j, w) in out {
				next[j] += damping * score * w.max(0.0) / total;
			}
		}

		let share = damping * dangling / nf;
		for s in next.iter_mut() {
			*s += share;
		}

		let delta: f64 = next.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
		scores = next;
		if delta < tolerance {
			break;
		}
	}

	scores
}

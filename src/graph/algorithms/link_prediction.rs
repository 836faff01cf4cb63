//! Neighborhood-overlap scores for ties that do not exist yet.

use crate::graph::types::Graph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkMetric {
	CommonNeighbors,
	Jaccard,
	Cosine,
	AdamicAdar,
}

impl LinkMetric {
	pub fn label(self) -> &'static str {
		match self {
			LinkMetric::CommonNeighbors => "Common neighbors",
			LinkMetric::Jaccard => "Jaccard",
			LinkMetric::Cosine => "Cosine",
			LinkMetric::AdamicAdar => "Adamic-Adar",
		}
	}

	pub fn score(self, graph: &Graph, a: usize, b: usize) -> f64 {
		match self {
			LinkMetric::CommonNeighbors => common_neighbors(graph, a, b).len() as f64,
			LinkMetric::Jaccard => jaccard(graph, a, b),
			LinkMetric::Cosine => cosine(graph, a, b),
			LinkMetric::AdamicAdar => adamic_adar(graph, a, b),
		}
	}
}

/// A possible new tie and how strongly the metric suggests it.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	pub node: usize,
	pub score: f64,
	pub shared: usize,
}

pub fn common_neighbors(graph: &Graph, a: usize, b: usize) -> Vec<usize> {
	let (na, nb) = (graph.neighbors(a), graph.neighbors(b));
	// both lists are sorted
	let (mut i, mut j, mut out) = (0, 0, Vec::new());
	while i < na.len() && j < nb.len() {
		match na[i].cmp(&nb[j]) {
			std::cmp::Ordering::Less => i += 1,
			std::cmp::Ordering::Greater => j += 1,
			std::cmp::Ordering::Equal => {
				out.push(na[i]);
				i += 1;
				j += 1;
			}
		}
	}
	out
}

/// |N(a) ∩ N(b)| / |N(a) ∪ N(b)|, zero when both are isolated.
pub fn jaccard(graph: &Graph, a: usize, b: usize) -> f64 {
	let shared = common_neighbors(graph, a, b).len();
	let union = graph.degree(a) + graph.degree(b) - shared;
	if union == 0 { 0.0 } else { shared as f64 / union as f64 }
}

/// Salton index: |N(a) ∩ N(b)| / sqrt(|N(a)| · |N(b)|).
pub fn cosine(graph: &Graph, a: usize, b: usize) -> f64 {
	let denom = ((graph.degree(a) * graph.degree(b)) as f64).sqrt();
	if denom == 0.0 {
		return 0.0;
	}
	common_neighbors(graph, a, b).len() as f64 / denom
}

/// Sum of 1 / ln(degree) over shared neighbors. Shared neighbors of degree 1
/// cannot exist, so the logarithm is always positive.
pub fn adamic_adar(graph: &Graph, a: usize, b: usize) -> f64 {
	common_neighbors(graph, a, b)
		.into_iter()
		.map(|w| graph.degree(w) as f64)
		.filter(|&d| d > 1.0)
		.map(|d| 1.0 / d.ln())
		.sum()
}

/// Non-neighbors of `node` ranked by `metric`, best first, zero scores dropped.
/// Ties keep node order so the ranking is stable.
pub fn predict_links(graph: &Graph, node: usize, metric: LinkMetric, limit: usize) -> Vec<Candidate> {
	let mut candidates: Vec<Candidate> = (0..graph.node_count())
		.filter(|&other| other != node && !graph.are_adjacent(node, other))
		.map(|other| Candidate {
			node: other,
			score: metric.score(graph, node, other),
			shared: common_neighbors(graph, node, other).len(),
		})
		.filter(|c| c.score > 0.0)
		.collect();
	candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
	candidates.truncate(limit);
	candidates
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::fixtures;

	// 0 and 1 share neighbors 2 and 3; 3 also knows 4
	fn sample() -> Graph {
		fixtures::undirected(5, &[(0, 2), (0, 3), (1, 2), (1, 3), (3, 4)])
	}

	#[test]
	fn overlap_scores_match_hand_values() {
		let g = sample();
		assert_eq!(common_neighbors(&g, 0, 1), vec![2, 3]);
		assert_eq!(jaccard(&g, 0, 1), 1.0);
		assert_eq!(cosine(&g, 0, 1), 1.0);
		let expected = 1.0 / 2f64.ln() + 1.0 / 3f64.ln();
		assert!((adamic_adar(&g, 0, 1) - expected).abs() < 1e-12);
		assert_eq!(jaccard(&g, 0, 4), 1.0 / 2.0);
	}

	#[test]
	fn isolated_pairs_score_zero() {
		let g = fixtures::undirected(3, &[(0, 1)]);
		assert_eq!(jaccard(&g, 2, 2), 0.0);
		assert_eq!(cosine(&g, 0, 2), 0.0);
		assert_eq!(adamic_adar(&g, 0, 2), 0.0);
	}

	#[test]
	fn predictions_skip_existing_ties() {
		let g = sample();
		let ranked = predict_links(&g, 0, LinkMetric::Jaccard, 5);
		let nodes: Vec<_> = ranked.iter().map(|c| c.node).collect();
		assert_eq!(nodes, vec![1, 4]);
		assert_eq!(ranked[0].shared, 2);
		assert!(ranked.iter().all(|c| !g.are_adjacent(0, c.node)));
	}

	#[test]
	fn limit_truncates_ranking() {
		let g = sample();
		assert_eq!(predict_links(&g, 0, LinkMetric::AdamicAdar, 1).len(), 1);
	}
}

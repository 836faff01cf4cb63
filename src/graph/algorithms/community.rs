//! Modularity and the scripted community-merge narrative.
//!
//! The narrative steps are authored by hand for teaching and replayed as
//! written; nothing here runs Louvain itself.

use crate::data::ScriptStep;
use crate::error::SimError;
use crate::graph::types::Graph;

/// Newman modularity of a partition, treating edges as undirected and weighted.
/// `communities[i]` is the community label of node `i`.
pub fn modularity(graph: &Graph, communities: &[usize]) -> f64 {
	let n = graph.node_count();
	let total: f64 = graph.edges().iter().map(|e| e.weight).sum();
	if total <= 0.0 || communities.len() != n {
		return 0.0;
	}

	let mut strength = vec![0.0; n];
	for e in graph.edges() {
		strength[e.source] += e.weight;
		strength[e.target] += e.weight;
	}

	let labels = communities.iter().copied().max().map_or(0, |m| m + 1);
	let mut internal = vec![0.0; labels];
	let mut degree_sum = vec![0.0; labels];
	for e in graph.edges() {
		if communities[e.source] == communities[e.target] {
			internal[communities[e.source]] += e.weight;
		}
	}
	for (i, s) in strength.iter().enumerate() {
		degree_sum[communities[i]] += s;
	}

	internal
		.iter()
		.zip(&degree_sum)
		.map(|(l, d)| l / total - (d / (2.0 * total)).powi(2))
		.sum()
}

/// One step of the narrative with ids already resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct CommunityStep {
	pub title: String,
	pub narration: String,
	/// Community label per node.
	pub communities: Vec<usize>,
	pub community_count: usize,
}

/// Hand-authored sequence of partitions with a cursor.
#[derive(Clone, Debug)]
pub struct CommunityScript {
	steps: Vec<CommunityStep>,
	cursor: usize,
}

impl CommunityScript {
	/// Resolve every step's ids and check each node sits in exactly one community.
	pub fn from_steps(graph: &Graph, steps: &[ScriptStep]) -> Result<Self, SimError> {
		let n = graph.node_count();
		let mut resolved = Vec::with_capacity(steps.len());

		for (s, step) in steps.iter().enumerate() {
			let mut labels = vec![None; n];
			for (c, members) in step.communities.iter().enumerate() {
				for id in members {
					let idx = graph
						.node_index(id)
						.ok_or_else(|| SimError::UnknownNode(id.clone()))?;
					if labels[idx].replace(c).is_some() {
						return Err(SimError::ScriptOverlap {
							step: s + 1,
							node: id.clone(),
						});
					}
				}
			}
			let communities = labels
				.into_iter()
				.enumerate()
				.map(|(i, l)| {
					l.ok_or_else(|| SimError::ScriptCoverage {
						step: s + 1,
						node: graph.node(i).id.clone(),
					})
				})
				.collect::<Result<Vec<_>, _>>()?;

			resolved.push(CommunityStep {
				title: step.title.clone(),
				narration: step.narration.clone(),
				communities,
				community_count: step.communities.len(),
			});
		}

		Ok(Self {
			steps: resolved,
			cursor: 0,
		})
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn position(&self) -> usize {
		self.cursor
	}

	pub fn current(&self) -> Option<&CommunityStep> {
		self.steps.get(self.cursor)
	}

	pub fn step_forward(&mut self) -> bool {
		if self.cursor + 1 < self.steps.len() {
			self.cursor += 1;
			true
		} else {
			false
		}
	}

	pub fn step_back(&mut self) -> bool {
		if self.cursor > 0 {
			self.cursor -= 1;
			true
		} else {
			false
		}
	}

	pub fn restart(&mut self) {
		self.cursor = 0;
	}

	pub fn is_last(&self) -> bool {
		self.cursor + 1 >= self.steps.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::fixtures;

	fn two_triangles() -> Graph {
		fixtures::undirected(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)])
	}

	fn step(communities: &[&[&str]]) -> ScriptStep {
		ScriptStep {
			title: "t".into(),
			narration: "n".into(),
			communities: communities
				.iter()
				.map(|c| c.iter().map(|s| s.to_string()).collect())
				.collect(),
		}
	}

	#[test]
	fn natural_split_beats_singletons_and_one_block() {
		let g = two_triangles();
		let split = modularity(&g, &[0, 0, 0, 1, 1, 1]);
		let whole = modularity(&g, &[0; 6]);
		let single = modularity(&g, &[0, 1, 2, 3, 4, 5]);
		// 6/7 - 2 * (7/14)^2
		assert!((split - (6.0 / 7.0 - 0.5)).abs() < 1e-12);
		assert!(whole.abs() < 1e-12);
		assert!(split > single);
	}

	#[test]
	fn script_replays_authored_steps() {
		let g = two_triangles();
		let steps = vec![
			step(&[&["n0"], &["n1"], &["n2"], &["n3"], &["n4"], &["n5"]]),
			step(&[&["n0", "n1", "n2"], &["n3", "n4", "n5"]]),
		];
		let mut script = CommunityScript::from_steps(&g, &steps).unwrap();
		assert_eq!(script.len(), 2);
		assert_eq!(script.current().unwrap().community_count, 6);
		assert!(!script.step_back());
		assert!(script.step_forward());
		assert!(script.is_last());
		assert_eq!(script.current().unwrap().communities, vec![0, 0, 0, 1, 1, 1]);
		assert!(!script.step_forward());
		script.restart();
		assert_eq!(script.position(), 0);
	}

	#[test]
	fn script_must_cover_every_node_once() {
		let g = two_triangles();
		let missing = vec![step(&[&["n0", "n1", "n2"], &["n3", "n4"]])];
		assert!(matches!(
			CommunityScript::from_steps(&g, &missing),
			Err(SimError::ScriptCoverage { node, .. }) if node == "n5"
		));

		let twice = vec![step(&[&["n0", "n1", "n2", "n3"], &["n3", "n4", "n5"]])];
		assert!(matches!(
			CommunityScript::from_steps(&g, &twice),
			Err(SimError::ScriptOverlap { .. })
		));
	}
}

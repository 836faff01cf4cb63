use serde::Deserialize;

use crate::layout::ForceParams;

/// A person (or unit) as written in a dataset file.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub group: Option<String>,
	#[serde(default)]
	pub detail: Option<String>,
}

/// A tie between two people as written in a dataset file.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(default = "default_weight")]
	pub weight: f64,
	#[serde(default)]
	pub kind: Option<String>,
	/// Month in which the tie first appears.
	#[serde(default)]
	pub since: Option<u32>,
}

fn default_weight() -> f64 {
	1.0
}

/// One hand-authored step of a community narrative: each inner list is one
/// community, named by node ids.
#[derive(Clone, Debug, Deserialize)]
pub struct ScriptStep {
	pub title: String,
	pub narration: String,
	pub communities: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub directed: bool,
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
	#[serde(default)]
	pub physics: ForceParams,
	#[serde(default)]
	pub script: Vec<ScriptStep>,
}

/// A box of the org chart and everyone reporting to it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrgUnit {
	pub name: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub reports: Vec<OrgUnit>,
}

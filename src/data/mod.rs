//! Declarative datasets, one JSON file per widget family.
//!
//! The graph datasets are compiled into the binary; the org chart is fetched
//! at runtime the way a static site serves it.

mod types;

use log::{info, warn};

pub use types::{GraphData, GraphLink, GraphNode, OrgUnit, ScriptStep};

use crate::error::SimError;

/// Where the org chart page looks for its hierarchy.
pub const ORG_CHART_URL: &str = "/data/org-chart.json";

/// Embedded datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
	IdeaFlow,
	Inclusion,
	Influence,
	Merger,
	Louvain,
	Team,
}

impl Dataset {
	pub const ALL: [Dataset; 6] = [
		Dataset::IdeaFlow,
		Dataset::Inclusion,
		Dataset::Influence,
		Dataset::Merger,
		Dataset::Louvain,
		Dataset::Team,
	];

	pub fn name(self) -> &'static str {
		match self {
			Dataset::IdeaFlow => "idea-flow",
			Dataset::Inclusion => "inclusion",
			Dataset::Influence => "influence",
			Dataset::Merger => "merger",
			Dataset::Louvain => "louvain",
			Dataset::Team => "team",
		}
	}

	fn source(self) -> &'static str {
		match self {
			Dataset::IdeaFlow => include_str!("../../data/idea-flow.json"),
			Dataset::Inclusion => include_str!("../../data/inclusion.json"),
			Dataset::Influence => include_str!("../../data/influence.json"),
			Dataset::Merger => include_str!("../../data/merger.json"),
			Dataset::Louvain => include_str!("../../data/louvain.json"),
			Dataset::Team => include_str!("../../data/team.json"),
		}
	}

	pub fn load(self) -> Result<GraphData, SimError> {
		parse_graph(self.name(), self.source())
	}
}

pub fn parse_graph(name: &'static str, json: &str) -> Result<GraphData, SimError> {
	serde_json::from_str(json).map_err(|source| SimError::Dataset { name, source })
}

pub fn parse_org_chart(json: &str) -> Result<OrgUnit, SimError> {
	Ok(serde_json::from_str(json)?)
}

/// GET the org chart hierarchy. No retry: a failure is shown on the page.
pub async fn fetch_org_chart(url: &str) -> Result<OrgUnit, SimError> {
	let fetch_err = |message: String| SimError::Fetch {
		url: url.to_string(),
		message,
	};

	let response = gloo_net::http::Request::get(url)
		.send()
		.await
		.map_err(|e| fetch_err(e.to_string()))?;
	if !response.ok() {
		warn!("org chart request returned {}", response.status());
		return Err(fetch_err(format!("HTTP {}", response.status())));
	}
	let body = response.text().await.map_err(|e| fetch_err(e.to_string()))?;
	let root = parse_org_chart(&body)?;
	info!("org chart loaded: {}", root.name);
	Ok(root)
}

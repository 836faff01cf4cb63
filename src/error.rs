//! Error type shared by dataset loading, graph construction and fetching.

/// Everything that can go wrong while preparing a MicroSim.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
	#[error("dataset `{name}` is malformed: {source}")]
	Dataset {
		name: &'static str,
		#[source]
		source: serde_json::Error,
	},

	#[error("edge references unknown node `{0}`")]
	UnknownNode(String),

	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	#[error("edge on `{0}` points back at itself")]
	SelfLoop(String),

	#[error("script step {step} leaves node `{node}` without a community")]
	ScriptCoverage { step: usize, node: String },

	#[error("script step {step} places node `{node}` in more than one community")]
	ScriptOverlap { step: usize, node: String },

	#[error("failed to fetch `{url}`: {message}")]
	Fetch { url: String, message: String },

	#[error("org chart JSON is malformed: {0}")]
	OrgChart(#[from] serde_json::Error),
}

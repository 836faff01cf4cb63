use serde::Deserialize;

/// Tunable constants of the force simulation.
///
/// Datasets may override any subset of these in their `physics` block; the
/// remaining fields fall back to [`ForceParams::default`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceParams {
	/// Numerator of the inverse-square repulsion between every pair of nodes.
	pub repulsion: f64,
	/// Edge length at which a spring exerts no force.
	pub spring_length: f64,
	/// Force per unit of spring stretch.
	pub spring_stiffness: f64,
	/// Velocity multiplier applied every step, always below 1.
	pub damping: f64,
	/// Pull toward the canvas center (or the node's cluster center).
	pub gravity: f64,
	/// Disc radius used for clamping and hit-testing.
	pub node_radius: f64,
	/// Total speed below which a frame counts as calm.
	pub rest_threshold: f64,
	/// Calm frames in a row before the layout freezes.
	pub rest_frames: u32,
}

/// Upper bound for damping; anything at or above 1 would never lose energy.
pub const MAX_DAMPING: f64 = 0.99;

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			repulsion: 1500.0,
			spring_length: 80.0,
			spring_stiffness: 0.04,
			damping: 0.85,
			gravity: 0.01,
			node_radius: 12.0,
			rest_threshold: 0.05,
			rest_frames: 30,
		}
	}
}

impl ForceParams {
	/// Clamp every field into the range the integrator can work with.
	pub fn sanitized(mut self) -> Self {
		self.repulsion = self.repulsion.max(0.0);
		self.spring_length = self.spring_length.max(1.0);
		self.spring_stiffness = self.spring_stiffness.max(0.0);
		self.damping = self.damping.clamp(0.0, MAX_DAMPING);
		self.gravity = self.gravity.max(0.0);
		self.node_radius = self.node_radius.max(1.0);
		self.rest_threshold = self.rest_threshold.max(f64::EPSILON);
		self.rest_frames = self.rest_frames.max(1);
		self
	}

	pub fn with_repulsion(mut self, repulsion: f64) -> Self {
		self.repulsion = repulsion;
		self
	}

	pub fn with_spring(mut self, length: f64, stiffness: f64) -> Self {
		self.spring_length = length;
		self.spring_stiffness = stiffness;
		self
	}

	pub fn with_gravity(mut self, gravity: f64) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_damping(mut self, damping: f64) -> Self {
		self.damping = damping;
		self
	}

	pub fn with_node_radius(mut self, radius: f64) -> Self {
		self.node_radius = radius;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_physics_block_keeps_defaults() {
		let params: ForceParams = serde_json::from_str(r#"{ "spring_length": 120 }"#).unwrap();
		assert_eq!(params.spring_length, 120.0);
		assert_eq!(params.damping, ForceParams::default().damping);
		assert_eq!(params.rest_frames, 30);
	}

	#[test]
	fn sanitize_keeps_damping_below_one() {
		let params = ForceParams::default().with_damping(1.5).sanitized();
		assert!(params.damping < 1.0);
		let params = ForceParams::default().with_damping(-0.2).sanitized();
		assert_eq!(params.damping, 0.0);
	}
}

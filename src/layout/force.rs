use std::f64::consts::PI;

use log::debug;

use super::params::ForceParams;

/// Below this separation two nodes count as coincident and get a fixed push direction.
const COINCIDENT: f64 = 1e-9;

/// Position and velocity of one node in the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

impl Body {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Self::default()
		}
	}

	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pin {
	node: usize,
	x: f64,
	y: f64,
}

/// Spring/repulsion layout over a fixed set of nodes.
///
/// Every [`step`](Self::step) applies all-pairs repulsion, edge springs and a
/// centering pull, integrates damped velocities and clamps nodes inside the
/// canvas. Once the summed node speed stays under
/// [`ForceParams::rest_threshold`] for [`ForceParams::rest_frames`] frames the
/// layout freezes until something wakes it: a drag, a resize, a new edge set
/// or new cluster centers.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	params: ForceParams,
	bodies: Vec<Body>,
	/// Drawn radius per node; walls and hit-tests use it.
	radii: Vec<f64>,
	initial: Vec<(f64, f64)>,
	springs: Vec<(usize, usize)>,
	centers: Option<Vec<(f64, f64)>>,
	center_strength: f64,
	width: f64,
	height: f64,
	pin: Option<Pin>,
	running: bool,
	calm_frames: u32,
	frames: u64,
	energy: f64,
}

impl ForceLayout {
	/// Lay `node_count` nodes out on a ring around the canvas center.
	pub fn new(
		node_count: usize,
		springs: Vec<(usize, usize)>,
		width: f64,
		height: f64,
		params: ForceParams,
	) -> Self {
		let positions = ring_positions(node_count, width, height);
		Self::with_positions(positions, springs, width, height, params)
	}

	pub fn with_positions(
		positions: Vec<(f64, f64)>,
		springs: Vec<(usize, usize)>,
		width: f64,
		height: f64,
		params: ForceParams,
	) -> Self {
		let params = params.sanitized();
		let mut layout = Self {
			center_strength: params.gravity,
			radii: vec![params.node_radius; positions.len()],
			params,
			bodies: positions.iter().map(|&(x, y)| Body::at(x, y)).collect(),
			initial: Vec::new(),
			springs: Vec::new(),
			centers: None,
			width,
			height,
			pin: None,
			running: true,
			calm_frames: 0,
			frames: 0,
			energy: 0.0,
		};
		layout.clamp_all();
		layout.initial = layout.bodies.iter().map(|b| (b.x, b.y)).collect();
		layout.set_springs(springs);
		layout
	}

	pub fn params(&self) -> &ForceParams {
		&self.params
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.bodies.get(node).map(|b| (b.x, b.y))
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	pub fn springs(&self) -> &[(usize, usize)] {
		&self.springs
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	/// Summed node speed of the last step.
	pub fn energy(&self) -> f64 {
		self.energy
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn pinned(&self) -> Option<usize> {
		self.pin.map(|p| p.node)
	}

	pub fn radius(&self, node: usize) -> f64 {
		self.radii
			.get(node)
			.copied()
			.unwrap_or(self.params.node_radius)
	}

	/// Resize the node discs. Nodes pushed past a wall by a bigger disc are
	/// clamped back in at once.
	pub fn set_radii(&mut self, radii: Vec<f64>) {
		if radii.len() != self.bodies.len() {
			debug!(
				"ignoring {} radii for {} nodes",
				radii.len(),
				self.bodies.len()
			);
			return;
		}
		self.radii = radii.into_iter().map(|r| r.max(1.0)).collect();
		self.clamp_all();
		self.wake();
	}

	/// Replace the active edge set. Springs naming missing nodes or looping
	/// back on themselves are dropped.
	pub fn set_springs(&mut self, mut springs: Vec<(usize, usize)>) {
		let n = self.bodies.len();
		springs.retain(|&(a, b)| a != b && a < n && b < n);
		self.springs = springs;
		self.wake();
	}

	/// Pull each node toward its own center instead of the canvas center.
	/// `None` restores the shared canvas center and the default gravity.
	pub fn set_centers(&mut self, centers: Option<Vec<(f64, f64)>>, strength: f64) {
		match centers {
			Some(c) if c.len() == self.bodies.len() => {
				self.centers = Some(c);
				self.center_strength = strength.max(0.0);
			}
			Some(c) => {
				debug!(
					"ignoring {} cluster centers for {} nodes",
					c.len(),
					self.bodies.len()
				);
				return;
			}
			None => {
				self.centers = None;
				self.center_strength = self.params.gravity;
			}
		}
		self.wake();
	}

	pub fn wake(&mut self) {
		if !self.running {
			debug!("layout woken after {} frames", self.frames);
		}
		self.running = true;
		self.calm_frames = 0;
	}

	/// Put every node back where it started and drop any pin.
	pub fn reset(&mut self) {
		for (body, &(x, y)) in self.bodies.iter_mut().zip(&self.initial) {
			*body = Body::at(x, y);
		}
		self.pin = None;
		self.clamp_all();
		self.wake();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.clamp_all();
		self.wake();
	}

	/// Hold `node` at the given point; it no longer responds to forces.
	pub fn pin(&mut self, node: usize, x: f64, y: f64) {
		if node >= self.bodies.len() {
			return;
		}
		let (x, y) = self.clamp_point(node, x, y);
		self.pin = Some(Pin { node, x, y });
		self.bodies[node] = Body::at(x, y);
		self.wake();
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(node) = self.pinned() else {
			return;
		};
		let (x, y) = self.clamp_point(node, x, y);
		self.pin = Some(Pin { node, x, y });
		self.bodies[node] = Body::at(x, y);
		self.wake();
	}

	pub fn release(&mut self) {
		if self.pin.take().is_some() {
			self.wake();
		}
	}

	/// Node whose disc (grown by `slack`) contains the point, nearest first.
	pub fn node_at(&self, x: f64, y: f64, slack: f64) -> Option<usize> {
		self.bodies
			.iter()
			.zip(&self.radii)
			.enumerate()
			.map(|(i, (b, &r))| (i, (b.x - x).hypot(b.y - y), r + slack))
			.filter(|&(_, d, reach)| d <= reach)
			.map(|(i, d, _)| (i, d))
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Run steps until the layout rests or `max_steps` have passed.
	pub fn settle(&mut self, max_steps: usize) -> usize {
		let mut steps = 0;
		while self.running && steps < max_steps {
			self.step();
			steps += 1;
		}
		steps
	}

	/// Advance the simulation by one frame. Returns false when the layout is at rest.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}

		let mut forces = vec![(0.0, 0.0); self.bodies.len()];
		self.accumulate_repulsion(&mut forces);
		self.accumulate_springs(&mut forces);
		self.accumulate_gravity(&mut forces);

		let damping = self.params.damping;
		let (width, height) = (self.width, self.height);
		let mut energy = 0.0;
		for (i, (body, &r)) in self.bodies.iter_mut().zip(&self.radii).enumerate() {
			if let Some(pin) = self.pin.filter(|p| p.node == i) {
				*body = Body::at(pin.x, pin.y);
				continue;
			}

			let (fx, fy) = forces[i];
			body.vx = (body.vx + fx) * damping;
			body.vy = (body.vy + fy) * damping;
			body.x += body.vx;
			body.y += body.vy;

			let (min_x, max_x, min_y, max_y) = bounds(width, height, r);
			if body.x < min_x || body.x > max_x {
				body.x = body.x.clamp(min_x, max_x);
				body.vx = 0.0;
			}
			if body.y < min_y || body.y > max_y {
				body.y = body.y.clamp(min_y, max_y);
				body.vy = 0.0;
			}
			energy += body.speed();
		}

		self.energy = energy;
		self.frames += 1;

		if self.pin.is_some() || energy >= self.params.rest_threshold {
			self.calm_frames = 0;
		} else {
			self.calm_frames += 1;
			if self.calm_frames >= self.params.rest_frames {
				self.running = false;
				debug!("layout at rest after {} frames", self.frames);
			}
		}
		true
	}

	fn accumulate_repulsion(&self, forces: &mut [(f64, f64)]) {
		let strength = self.params.repulsion;
		if strength == 0.0 {
			return;
		}
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.bodies[i], &self.bodies[j]);
				let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
				let mut dist = dx.hypot(dy);
				if dist < COINCIDENT {
					let angle = separation_angle(i, j);
					(dx, dy, dist) = (angle.cos(), angle.sin(), 1.0);
				}
				let d = dist.max(1.0);
				let f = strength / (d * d);
				let (fx, fy) = (f * dx / dist, f * dy / dist);
				forces[i].0 -= fx;
				forces[i].1 -= fy;
				forces[j].0 += fx;
				forces[j].1 += fy;
			}
		}
	}

	fn accumulate_springs(&self, forces: &mut [(f64, f64)]) {
		let (length, stiffness) = (self.params.spring_length, self.params.spring_stiffness);
		for &(a, b) in &self.springs {
			let (na, nb) = (&self.bodies[a], &self.bodies[b]);
			let (dx, dy) = (nb.x - na.x, nb.y - na.y);
			let dist = dx.hypot(dy);
			if dist < COINCIDENT {
				continue;
			}
			let f = stiffness * (dist - length);
			let (fx, fy) = (f * dx / dist, f * dy / dist);
			forces[a].0 += fx;
			forces[a].1 += fy;
			forces[b].0 -= fx;
			forces[b].1 -= fy;
		}
	}

	fn accumulate_gravity(&self, forces: &mut [(f64, f64)]) {
		let canvas_center = (self.width / 2.0, self.height / 2.0);
		for (i, body) in self.bodies.iter().enumerate() {
			let (cx, cy) = self
				.centers
				.as_ref()
				.map_or(canvas_center, |centers| centers[i]);
			forces[i].0 += (cx - body.x) * self.center_strength;
			forces[i].1 += (cy - body.y) * self.center_strength;
		}
	}

	fn clamp_point(&self, node: usize, x: f64, y: f64) -> (f64, f64) {
		let (min_x, max_x, min_y, max_y) = bounds(self.width, self.height, self.radius(node));
		(x.clamp(min_x, max_x), y.clamp(min_y, max_y))
	}

	fn clamp_all(&mut self) {
		for i in 0..self.bodies.len() {
			let (x, y) = self.clamp_point(i, self.bodies[i].x, self.bodies[i].y);
			self.bodies[i].x = x;
			self.bodies[i].y = y;
		}
		if let Some(pin) = self.pin {
			let (x, y) = self.clamp_point(pin.node, pin.x, pin.y);
			self.pin = Some(Pin { x, y, ..pin });
		}
	}
}

/// Center range that keeps a disc of radius `r` fully on the canvas.
fn bounds(width: f64, height: f64, r: f64) -> (f64, f64, f64, f64) {
	(r, (width - r).max(r), r, (height - r).max(r))
}

/// Evenly spaced starting points on a circle around the canvas center.
pub fn ring_positions(count: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
	let (cx, cy) = (width / 2.0, height / 2.0);
	if count == 1 {
		return vec![(cx, cy)];
	}
	let radius = width.min(height) * 0.3;
	(0..count)
		.map(|i| {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

/// Points evenly spaced on a circle, used as per-group cluster centers.
pub fn cluster_centers(groups: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
	let (cx, cy) = (width / 2.0, height / 2.0);
	if groups <= 1 {
		return vec![(cx, cy); groups];
	}
	let radius = width.min(height) * 0.28;
	(0..groups)
		.map(|g| {
			let angle = (g as f64) * 2.0 * PI / groups as f64 - PI / 2.0;
			(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

fn separation_angle(i: usize, j: usize) -> f64 {
	// golden angle keeps stacked pairs from all leaving along the same line
	((i * 31 + j * 17) as f64) * 2.399_963
}

#[cfg(test)]
mod tests {
	use super::*;

	fn still(params: ForceParams) -> ForceParams {
		params.with_repulsion(0.0).with_gravity(0.0)
	}

	#[test]
	fn ring_places_nodes_inside_canvas() {
		let pts = ring_positions(12, 800.0, 600.0);
		assert_eq!(pts.len(), 12);
		for (x, y) in pts {
			assert!((0.0..=800.0).contains(&x));
			assert!((0.0..=600.0).contains(&y));
		}
		assert_eq!(ring_positions(1, 800.0, 600.0), vec![(400.0, 300.0)]);
	}

	#[test]
	fn invalid_springs_are_dropped() {
		let layout = ForceLayout::new(3, vec![(0, 1), (1, 1), (2, 7)], 400.0, 400.0, ForceParams::default());
		assert_eq!(layout.springs(), &[(0, 1)]);
	}

	#[test]
	fn lone_centered_node_comes_to_rest() {
		let mut layout = ForceLayout::new(1, vec![], 400.0, 400.0, ForceParams::default());
		let steps = layout.settle(1000);
		assert!(!layout.is_running());
		assert_eq!(steps, ForceParams::default().rest_frames as usize);
		assert!(!layout.step());
	}

	#[test]
	fn drag_wakes_a_resting_layout() {
		let mut layout = ForceLayout::new(3, vec![(0, 1), (1, 2)], 600.0, 600.0, ForceParams::default());
		layout.settle(20_000);
		assert!(!layout.is_running());

		layout.pin(1, 50.0, 50.0);
		assert!(layout.is_running());
		layout.drag_to(80.0, 90.0);
		assert_eq!(layout.position(1), Some((80.0, 90.0)));
		for _ in 0..200 {
			layout.step();
		}
		assert!(layout.is_running());

		layout.release();
		assert_eq!(layout.pinned(), None);
		assert!(layout.is_running());
	}

	#[test]
	fn pin_target_is_clamped_into_canvas() {
		let mut layout = ForceLayout::new(2, vec![], 300.0, 200.0, ForceParams::default());
		layout.pin(0, -50.0, 500.0);
		let r = layout.params().node_radius;
		assert_eq!(layout.position(0), Some((r, 200.0 - r)));
	}

	#[test]
	fn reset_restores_initial_ring() {
		let mut layout = ForceLayout::new(4, vec![(0, 1)], 500.0, 500.0, ForceParams::default());
		let start: Vec<_> = layout.bodies().to_vec();
		for _ in 0..50 {
			layout.step();
		}
		layout.reset();
		assert_eq!(layout.bodies(), start.as_slice());
	}

	#[test]
	fn hit_test_prefers_nearest_node() {
		let layout = ForceLayout::with_positions(
			vec![(100.0, 100.0), (110.0, 100.0)],
			vec![],
			400.0,
			400.0,
			ForceParams::default(),
		);
		assert_eq!(layout.node_at(108.0, 100.0, 0.0), Some(1));
		assert_eq!(layout.node_at(101.0, 100.0, 0.0), Some(0));
		assert_eq!(layout.node_at(300.0, 300.0, 4.0), None);
	}

	#[test]
	fn cluster_centers_pull_nodes_apart() {
		let params = still(ForceParams::default());
		let mut layout = ForceLayout::with_positions(
			vec![(200.0, 200.0), (210.0, 200.0)],
			vec![],
			400.0,
			400.0,
			params,
		);
		layout.set_centers(Some(vec![(50.0, 200.0), (350.0, 200.0)]), 0.05);
		layout.settle(10_000);
		let (a, b) = (layout.position(0).unwrap(), layout.position(1).unwrap());
		assert!((a.0 - 50.0).abs() < 1.0, "left node at {a:?}");
		assert!((b.0 - 350.0).abs() < 1.0, "right node at {b:?}");
	}

	#[test]
	fn larger_discs_stay_inside_and_are_easier_to_hit() {
		let mut layout = ForceLayout::with_positions(
			vec![(15.0, 15.0), (200.0, 200.0)],
			vec![],
			400.0,
			400.0,
			ForceParams::default(),
		);
		layout.set_radii(vec![30.0, 24.0]);
		assert_eq!(layout.position(0), Some((30.0, 30.0)));
		assert_eq!(layout.node_at(222.0, 200.0, 0.0), Some(1));

		layout.pin(1, -100.0, -100.0);
		assert_eq!(layout.position(1), Some((24.0, 24.0)));
		layout.drag_to(900.0, 900.0);
		assert_eq!(layout.position(1), Some((376.0, 376.0)));
		layout.release();
		for _ in 0..500 {
			layout.step();
			for (i, b) in layout.bodies().iter().enumerate() {
				let r = layout.radius(i);
				assert!(b.x - r >= 0.0 && b.x + r <= 400.0);
				assert!(b.y - r >= 0.0 && b.y + r <= 400.0);
			}
		}
	}

	#[test]
	fn mismatched_radii_are_ignored() {
		let mut layout = ForceLayout::new(3, vec![], 400.0, 400.0, ForceParams::default());
		layout.set_radii(vec![40.0]);
		assert_eq!(layout.radius(0), ForceParams::default().node_radius);
	}

	#[test]
	fn mismatched_centers_are_ignored() {
		let mut layout = ForceLayout::new(3, vec![], 400.0, 400.0, ForceParams::default());
		layout.settle(20_000);
		layout.set_centers(Some(vec![(0.0, 0.0)]), 0.1);
		assert!(!layout.is_running());
	}
}

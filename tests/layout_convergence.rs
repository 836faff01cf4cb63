#![allow(unused_crate_dependencies)]

use ona_microsims::layout::{ForceLayout, ForceParams};

const W: f64 = 800.0;
const H: f64 = 560.0;
const MAX_STEPS: usize = 20_000;

fn chain(n: usize) -> Vec<(usize, usize)> {
	(1..n).map(|i| (i - 1, i)).collect()
}

fn distance(layout: &ForceLayout, a: usize, b: usize) -> f64 {
	let (pa, pb) = (layout.bodies()[a], layout.bodies()[b]);
	(pa.x - pb.x).hypot(pa.y - pb.y)
}

fn assert_inside(layout: &ForceLayout) {
	let r = layout.params().node_radius;
	for (i, b) in layout.bodies().iter().enumerate() {
		assert!(b.x >= r && b.x <= W - r, "node {i} x={} outside", b.x);
		assert!(b.y >= r && b.y <= H - r, "node {i} y={} outside", b.y);
	}
}

#[test]
fn chains_of_every_size_come_to_rest() {
	for n in 1..=32 {
		let mut layout = ForceLayout::new(n, chain(n), W, H, ForceParams::default());
		layout.settle(MAX_STEPS);
		assert!(!layout.is_running(), "{n} nodes still moving");
		assert!(layout.energy() < layout.params().rest_threshold);
		assert_inside(&layout);
	}
}

#[test]
fn coincident_nodes_are_pushed_apart() {
	let mut layout = ForceLayout::with_positions(
		vec![(400.0, 280.0), (400.0, 280.0), (400.0, 280.0)],
		Vec::new(),
		W,
		H,
		ForceParams::default(),
	);
	layout.step();
	assert!(distance(&layout, 0, 1) > 0.0);
	assert!(distance(&layout, 1, 2) > 0.0);
	assert!(distance(&layout, 0, 2) > 0.0);
	for b in layout.bodies() {
		assert!(b.x.is_finite() && b.y.is_finite());
	}
}

#[test]
fn pinned_node_holds_while_others_settle() {
	let mut layout = ForceLayout::new(6, chain(6), W, H, ForceParams::default());
	layout.pin(0, 120.0, 90.0);
	for _ in 0..500 {
		layout.step();
		assert_eq!(layout.position(0), Some((120.0, 90.0)));
	}
	// a held node keeps the layout awake
	assert!(layout.is_running());

	layout.release();
	layout.settle(MAX_STEPS);
	assert!(!layout.is_running());
}

#[test]
fn woken_resting_layout_barely_moves() {
	let mut layout = ForceLayout::new(10, chain(10), W, H, ForceParams::default());
	layout.settle(MAX_STEPS);
	assert!(!layout.is_running());
	assert!(!layout.step());

	let start: Vec<(f64, f64)> = layout.bodies().iter().map(|b| (b.x, b.y)).collect();
	layout.wake();
	assert!(layout.is_running());
	let frames = layout.params().rest_frames;
	for frame in 0..frames {
		let before: Vec<(f64, f64)> = layout.bodies().iter().map(|b| (b.x, b.y)).collect();
		layout.step();
		for (i, (b, &(x, y))) in layout.bodies().iter().zip(&before).enumerate() {
			let delta = (b.x - x).hypot(b.y - y);
			assert!(delta < 0.1, "frame {frame}: node {i} moved {delta}");
		}
	}
	// the calm run puts it straight back to rest
	assert!(!layout.is_running());
	for (b, &(x, y)) in layout.bodies().iter().zip(&start) {
		assert!((b.x - x).hypot(b.y - y) < 1.0);
	}
}

#[test]
fn nodes_never_leave_the_canvas() {
	let positions = vec![
		(-500.0, -500.0),
		(2000.0, 40.0),
		(400.0, 9000.0),
		(400.0, 280.0),
		(401.0, 280.0),
	];
	let mut layout = ForceLayout::with_positions(
		positions,
		vec![(0, 1), (1, 2), (2, 3), (3, 4)],
		W,
		H,
		ForceParams::default().with_repulsion(40_000.0),
	);
	assert_inside(&layout);
	for _ in 0..2000 {
		layout.step();
		assert_inside(&layout);
	}
}

#[test]
fn lone_spring_relaxes_to_its_rest_length() {
	let params = ForceParams::default()
		.with_repulsion(0.0)
		.with_gravity(0.0)
		.with_spring(80.0, 0.04);
	let mut layout =
		ForceLayout::with_positions(vec![(250.0, 280.0), (550.0, 280.0)], vec![(0, 1)], W, H, params);
	layout.settle(MAX_STEPS);
	assert!(!layout.is_running());
	assert!((distance(&layout, 0, 1) - 80.0).abs() < 1.0);
	// the pair contracts symmetrically about its midpoint
	let mid = (layout.bodies()[0].x + layout.bodies()[1].x) / 2.0;
	assert!((mid - 400.0).abs() < 1e-6);
}

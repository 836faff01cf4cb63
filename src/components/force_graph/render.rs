use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::NetworkState;
use crate::graph::Edge;

pub const NODE_RADIUS: f64 = 12.0;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Categorical color for group (or community) `i`.
pub fn group_color(i: usize) -> &'static str {
	COLORS[i % COLORS.len()]
}

/// How one node is drawn this frame.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub color: String,
	pub radius: f64,
	pub label: Option<String>,
	/// Outline drawn around the disc, e.g. to mark a selection.
	pub ring: Option<&'static str>,
}

/// How one edge is drawn this frame.
#[derive(Clone, Copy, Debug)]
pub struct EdgeStyle {
	pub rgb: (u8, u8, u8),
	pub width: f64,
	pub arrow: bool,
	/// Dashes crawl from source to target.
	pub flowing: bool,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			rgb: (100, 180, 255),
			width: 1.5,
			arrow: false,
			flowing: false,
		}
	}
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Draw active edges then nodes, dimming everything outside the hovered
/// neighborhood. The edge callback may return `None` to skip an edge.
pub fn render_network(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	edge_style: impl Fn(usize, &Edge) -> Option<EdgeStyle>,
	node_style: impl Fn(usize) -> NodeStyle,
) {
	let styles: Vec<NodeStyle> = (0..state.graph.node_count()).map(node_style).collect();
	draw_edges(state, ctx, &styles, edge_style);
	draw_nodes(state, ctx, &styles);
}

fn draw_edges(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	nodes: &[NodeStyle],
	edge_style: impl Fn(usize, &Edge) -> Option<EdgeStyle>,
) {
	let (dash, gap, arrow_size) = (8.0, 4.0, 8.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, edge) in state.active_edges() {
		let Some(style) = edge_style(i, edge) else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = (state.position(edge.source), state.position(edge.target));
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted =
			state.is_highlighted(edge.source) && state.is_highlighted(edge.target);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, style.width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, style.width * (1.0 - 0.3 * t))
		};
		let (r, g, b) = style.rgb;

		ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {b}, {edge_alpha})"));
		ctx.set_line_width(width);
		if style.flowing {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (r1, r2) = (nodes[edge.source].radius, nodes[edge.target].radius);
		let tip_gap = if style.arrow { r2 + arrow_size } else { r2 };
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * tip_gap, y2 - uy * tip_gap);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if style.arrow {
			ctx.set_fill_style_str(&format!("rgba({r}, {g}, {b}, {arrow_alpha})"));
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	}
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d, styles: &[NodeStyle]) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	// dimmed nodes first so the highlighted neighborhood draws on top
	for (idx, style) in styles.iter().enumerate() {
		if has_highlight && state.is_highlighted(idx) {
			continue;
		}
		let (x, y) = state.position(idx);
		let (alpha, radius) = (1.0 - 0.7 * t, style.radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		draw_disc(ctx, x, y, radius, style);
		ctx.set_global_alpha(1.0);

		if let Some(label) = &style.label {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 4.0);
		}
	}

	if !has_highlight {
		return;
	}

	for (idx, style) in styles.iter().enumerate() {
		if !state.is_highlighted(idx) {
			continue;
		}
		let (x, y) = state.position(idx);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let base = style.radius;
		let (radius, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
		} else {
			(base, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_disc(ctx, x, y, radius, style);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if let Some(label) = &style.label {
			ctx.set_fill_style_str("white");
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 4.0);
		}
	}
}

fn draw_disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, style: &NodeStyle) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&style.color);
	ctx.fill();
	if let Some(ring) = style.ring {
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(3.0);
		ctx.stroke();
	}
}

/// Straight overlay line between two nodes, e.g. a path or a predicted tie.
pub fn draw_overlay_edge(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	a: usize,
	b: usize,
	color: &str,
	width: f64,
	dashed: bool,
) {
	let ((x1, y1), (x2, y2)) = (state.position(a), state.position(b));
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	if dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(5.0),
		));
	}
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

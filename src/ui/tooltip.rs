use super::geometry::{Rect, estimate_text_width};

pub const TOOLTIP_FONT_PX: f64 = 12.0;
pub const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
pub const TOOLTIP_PADDING: f64 = 8.0;
const TOOLTIP_OFFSET: f64 = 14.0;

/// Text box attached to a hovered shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub lines: Vec<String>,
	pub anchor: (f64, f64),
}

impl Tooltip {
	pub fn new(anchor: (f64, f64), lines: Vec<String>) -> Self {
		Self { lines, anchor }
	}

	/// Box size given the widest line as measured by the caller.
	pub fn size_for(&self, widest_line: f64) -> (f64, f64) {
		(
			widest_line + 2.0 * TOOLTIP_PADDING,
			self.lines.len() as f64 * TOOLTIP_LINE_HEIGHT + 2.0 * TOOLTIP_PADDING,
		)
	}

	pub fn estimated_size(&self) -> (f64, f64) {
		let widest = self
			.lines
			.iter()
			.map(|l| estimate_text_width(l, TOOLTIP_FONT_PX))
			.fold(0.0, f64::max);
		self.size_for(widest)
	}
}

/// Place a `w` x `h` box below-right of the anchor, flipping to the other side
/// when it would leave the canvas and clamping as a last resort.
pub fn place(anchor: (f64, f64), w: f64, h: f64, canvas_w: f64, canvas_h: f64) -> Rect {
	let (ax, ay) = anchor;
	let mut x = ax + TOOLTIP_OFFSET;
	let mut y = ay + TOOLTIP_OFFSET;
	if x + w > canvas_w {
		x = ax - TOOLTIP_OFFSET - w;
	}
	if y + h > canvas_h {
		y = ay - TOOLTIP_OFFSET - h;
	}
	x = x.clamp(0.0, (canvas_w - w).max(0.0));
	y = y.clamp(0.0, (canvas_h - h).max(0.0));
	Rect::new(x, y, w, h)
}

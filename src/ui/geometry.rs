/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Self { x, y, w, h }
	}

	pub fn right(&self) -> f64 {
		self.x + self.w
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.h
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
	}

	/// Grow (or shrink, for negative `by`) on every side.
	pub fn inflate(&self, by: f64) -> Self {
		Self::new(self.x - by, self.y - by, self.w + 2.0 * by, self.h + 2.0 * by)
	}
}

/// Rough label width for layout before a canvas context is available.
pub fn estimate_text_width(text: &str, font_px: f64) -> f64 {
	text.chars().count() as f64 * font_px * 0.58
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn contains_includes_edges() {
		let r = Rect::new(10.0, 10.0, 20.0, 10.0);
		assert!(r.contains(10.0, 10.0));
		assert!(r.contains(30.0, 20.0));
		assert!(!r.contains(30.1, 15.0));
		assert!(r.inflate(1.0).contains(30.5, 15.0));
		assert_eq!(r.center(), (20.0, 15.0));
	}
}

use super::geometry::{Rect, estimate_text_width};

pub const BUTTON_HEIGHT: f64 = 30.0;
pub const BUTTON_FONT_PX: f64 = 13.0;
const BUTTON_PADDING: f64 = 14.0;

/// Labelled rectangle that reports `action` when clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct Button<A> {
	pub action: A,
	pub label: String,
	pub rect: Rect,
	/// Drawn as pressed-in; used for toggles and radio groups.
	pub active: bool,
	pub hovered: bool,
}

impl<A: Copy> Button<A> {
	pub fn new(action: A, label: impl Into<String>) -> Self {
		Self {
			action,
			label: label.into(),
			rect: Rect::default(),
			active: false,
			hovered: false,
		}
	}

	pub fn active(mut self, active: bool) -> Self {
		self.active = active;
		self
	}

	pub fn preferred_width(&self) -> f64 {
		estimate_text_width(&self.label, BUTTON_FONT_PX) + 2.0 * BUTTON_PADDING
	}

	pub fn hit(&self, x: f64, y: f64) -> bool {
		self.rect.contains(x, y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wider_labels_get_wider_buttons() {
		let short = Button::new((), "Go");
		let long = Button::new((), "Reset layout");
		assert!(long.preferred_width() > short.preferred_width());
		assert!(short.preferred_width() > 2.0 * BUTTON_PADDING);
	}

	#[test]
	fn hit_uses_rect() {
		let mut b = Button::new(1u8, "Pause");
		b.rect = Rect::new(0.0, 0.0, 60.0, BUTTON_HEIGHT);
		assert!(b.hit(59.0, 29.0));
		assert!(!b.hit(61.0, 10.0));
	}
}

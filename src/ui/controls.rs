use super::button::{BUTTON_HEIGHT, Button};
use super::geometry::Rect;
use super::slider::Slider;

/// Height of the strip along the bottom of the canvas that holds the controls.
pub const CONTROL_BAND: f64 = 56.0;
const MARGIN: f64 = 12.0;
const GAP: f64 = 8.0;
const SLIDER_WIDTH: f64 = 220.0;
const MIN_SLIDER_WIDTH: f64 = 60.0;

/// What a pointer press or drag did to the controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent<A> {
	Clicked(A),
	SliderMoved(f64),
}

/// A row of buttons and an optional slider, hit-tested every event against
/// geometry cached by [`layout`](Self::layout).
#[derive(Clone, Debug)]
pub struct ControlBar<A> {
	pub buttons: Vec<Button<A>>,
	slider: Option<Slider>,
	band: Rect,
}

impl<A: Copy + PartialEq> ControlBar<A> {
	pub fn new(buttons: Vec<Button<A>>) -> Self {
		Self {
			buttons,
			slider: None,
			band: Rect::default(),
		}
	}

	pub fn with_slider(mut self, slider: Slider) -> Self {
		self.slider = Some(slider);
		self
	}

	pub fn band(&self) -> Rect {
		self.band
	}

	pub fn slider(&self) -> Option<&Slider> {
		self.slider.as_ref()
	}

	pub fn slider_mut(&mut self) -> Option<&mut Slider> {
		self.slider.as_mut()
	}

	/// Recompute control geometry for a canvas of the given size.
	pub fn layout(&mut self, width: f64, height: f64) {
		self.band = Rect::new(0.0, (height - CONTROL_BAND).max(0.0), width, CONTROL_BAND);
		let y = self.band.y + (CONTROL_BAND - BUTTON_HEIGHT) / 2.0;
		let mut x = MARGIN;
		for button in &mut self.buttons {
			let w = button.preferred_width();
			button.rect = Rect::new(x, y, w, BUTTON_HEIGHT);
			x += w + GAP;
		}

		if let Some(slider) = self.slider.as_mut() {
			let start = (width - MARGIN - SLIDER_WIDTH).max(x + GAP);
			let w = (width - MARGIN - start).max(MIN_SLIDER_WIDTH);
			// leave the upper half of the band for the slider's caption
			let track_y = self.band.y + CONTROL_BAND * 0.62;
			slider.set_track(Rect::new(start, track_y, w, 6.0));
		}
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		self.band.contains(x, y)
	}

	/// Update hover flags. Returns true when the pointer is over a button.
	pub fn hover(&mut self, x: f64, y: f64) -> bool {
		let mut any = false;
		for button in &mut self.buttons {
			button.hovered = button.hit(x, y);
			any |= button.hovered;
		}
		any
	}

	pub fn press(&mut self, x: f64, y: f64) -> Option<ControlEvent<A>> {
		if let Some(button) = self.buttons.iter().find(|b| b.hit(x, y)) {
			return Some(ControlEvent::Clicked(button.action));
		}
		let slider = self.slider.as_mut()?;
		slider
			.press(x, y)
			.then(|| ControlEvent::SliderMoved(slider.value()))
	}

	pub fn drag(&mut self, x: f64) -> Option<ControlEvent<A>> {
		let slider = self.slider.as_mut()?;
		slider
			.drag(x)
			.then(|| ControlEvent::SliderMoved(slider.value()))
	}

	pub fn release(&mut self) {
		if let Some(slider) = self.slider.as_mut() {
			slider.release();
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.slider.as_ref().is_some_and(Slider::is_dragging)
	}

	pub fn clear_hover(&mut self) {
		for button in &mut self.buttons {
			button.hovered = false;
		}
	}

	pub fn set_active(&mut self, action: A, active: bool) {
		for button in self.buttons.iter_mut().filter(|b| b.action == action) {
			button.active = active;
		}
	}

	/// Radio behavior: `chosen` is active, the rest of `group` is not.
	pub fn select(&mut self, group: &[A], chosen: A) {
		for button in self.buttons.iter_mut().filter(|b| group.contains(&b.action)) {
			button.active = button.action == chosen;
		}
	}

	pub fn set_label(&mut self, action: A, label: impl Into<String>) {
		if let Some(button) = self.buttons.iter_mut().find(|b| b.action == action) {
			button.label = label.into();
		}
	}
}

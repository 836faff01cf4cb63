use super::geometry::Rect;

/// Grab tolerance around the knob, in pixels.
const KNOB_REACH: f64 = 10.0;

/// Horizontal track with a knob mapping linearly onto `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
	pub label: String,
	pub min: f64,
	pub max: f64,
	pub step: f64,
	value: f64,
	track: Rect,
	dragging: bool,
}

impl Slider {
	pub fn new(label: impl Into<String>, min: f64, max: f64, step: f64, value: f64) -> Self {
		let mut slider = Self {
			label: label.into(),
			min,
			max: max.max(min),
			step: step.max(0.0),
			value: min,
			track: Rect::default(),
			dragging: false,
		};
		slider.value = slider.snap(value);
		slider
	}

	pub fn value(&self) -> f64 {
		self.value
	}

	pub fn track(&self) -> Rect {
		self.track
	}

	pub fn is_dragging(&self) -> bool {
		self.dragging
	}

	pub fn set_track(&mut self, track: Rect) {
		self.track = track;
	}

	/// Set the value directly. Returns true if it changed.
	pub fn set_value(&mut self, value: f64) -> bool {
		let snapped = self.snap(value);
		let changed = snapped != self.value;
		self.value = snapped;
		changed
	}

	/// Position of the value along the track, 0 at `min`, 1 at `max`.
	pub fn fraction(&self) -> f64 {
		if self.max > self.min {
			(self.value - self.min) / (self.max - self.min)
		} else {
			0.0
		}
	}

	pub fn knob_x(&self) -> f64 {
		self.track.x + self.fraction() * self.track.w
	}

	/// Value under a horizontal pointer position, clamped and snapped.
	pub fn value_at(&self, x: f64) -> f64 {
		let t = if self.track.w > 0.0 {
			((x - self.track.x) / self.track.w).clamp(0.0, 1.0)
		} else {
			0.0
		};
		self.snap(self.min + t * (self.max - self.min))
	}

	/// Start a drag if the point hits the track or knob; jumps to the point.
	pub fn press(&mut self, x: f64, y: f64) -> bool {
		let (_, cy) = self.track.center();
		let on_knob = (x - self.knob_x()).abs() <= KNOB_REACH && (y - cy).abs() <= KNOB_REACH;
		let on_track = self.track.inflate(KNOB_REACH / 2.0).contains(x, y);
		if !(on_knob || on_track) {
			return false;
		}
		self.dragging = true;
		self.value = self.value_at(x);
		true
	}

	/// Follow the pointer while dragging. Returns true if the value changed.
	pub fn drag(&mut self, x: f64) -> bool {
		if !self.dragging {
			return false;
		}
		let next = self.value_at(x);
		let changed = next != self.value;
		self.value = next;
		changed
	}

	pub fn release(&mut self) {
		self.dragging = false;
	}

	fn snap(&self, value: f64) -> f64 {
		let v = value.clamp(self.min, self.max);
		if self.step > 0.0 {
			let snapped = self.min + ((v - self.min) / self.step).round() * self.step;
			snapped.clamp(self.min, self.max)
		} else {
			v
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn slider() -> Slider {
		let mut s = Slider::new("Month", 0.0, 12.0, 1.0, 3.0);
		s.set_track(Rect::new(100.0, 50.0, 240.0, 6.0));
		s
	}

	#[test]
	fn maps_linearly_and_snaps() {
		let s = slider();
		assert_eq!(s.value_at(100.0), 0.0);
		assert_eq!(s.value_at(340.0), 12.0);
		assert_eq!(s.value_at(221.0), 6.0);
		assert_eq!(s.value_at(-40.0), 0.0);
		assert_eq!(s.knob_x(), 160.0);
	}

	#[test]
	fn press_on_track_jumps_and_drags() {
		let mut s = slider();
		assert!(s.press(300.0, 53.0));
		assert_eq!(s.value(), 10.0);
		assert!(s.drag(120.0));
		assert_eq!(s.value(), 1.0);
		assert!(!s.drag(121.0));
		s.release();
		assert!(!s.drag(340.0));
		assert_eq!(s.value(), 1.0);
	}

	#[test]
	fn press_off_track_is_ignored() {
		let mut s = slider();
		assert!(!s.press(200.0, 120.0));
		assert!(!s.is_dragging());
	}

	#[test]
	fn initial_value_is_clamped() {
		let s = Slider::new("x", 1.0, 5.0, 1.0, 9.0);
		assert_eq!(s.value(), 5.0);
		let mut s = Slider::new("x", 1.0, 5.0, 0.5, 2.2);
		assert_eq!(s.value(), 2.0);
		assert!(s.set_value(4.8));
		assert_eq!(s.value(), 5.0);
	}
}

//! Immediate-mode controls drawn on the canvas: geometry and hit-testing only.
//! Drawing lives in [`crate::components::controls`].

pub mod button;
pub mod controls;
pub mod geometry;
pub mod slider;
pub mod tooltip;

pub use button::Button;
pub use controls::{CONTROL_BAND, ControlBar, ControlEvent};
pub use geometry::Rect;
pub use slider::Slider;
pub use tooltip::Tooltip;

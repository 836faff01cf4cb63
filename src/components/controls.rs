//! Canvas drawing for the immediate-mode controls in [`crate::ui`].

use web_sys::CanvasRenderingContext2d;

use crate::ui::button::BUTTON_FONT_PX;
use crate::ui::tooltip::{
	TOOLTIP_FONT_PX, TOOLTIP_LINE_HEIGHT, TOOLTIP_PADDING, place,
};
use crate::ui::{Button, ControlBar, Slider, Tooltip};

pub const BACKGROUND: &str = "#1a1a2e";
const BAND_FILL: &str = "#12121f";
const TEXT: &str = "rgba(255, 255, 255, 0.9)";
const MUTED: &str = "rgba(255, 255, 255, 0.6)";
const ACCENT: &str = "#64b4ff";

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Title and one-line subtitle in the top-left corner.
pub fn draw_heading(ctx: &CanvasRenderingContext2d, title: &str, subtitle: &str) {
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(TEXT);
	ctx.set_font("bold 16px sans-serif");
	let _ = ctx.fill_text(title, 14.0, 26.0);
	ctx.set_fill_style_str(MUTED);
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(subtitle, 14.0, 44.0);
}

/// Block of text lines in the top-right corner, used for live statistics.
pub fn draw_panel(ctx: &CanvasRenderingContext2d, width: f64, lines: &[String]) {
	if lines.is_empty() {
		return;
	}
	ctx.set_font("12px sans-serif");
	let widest = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (
		widest + 2.0 * TOOLTIP_PADDING,
		lines.len() as f64 * TOOLTIP_LINE_HEIGHT + 2.0 * TOOLTIP_PADDING,
	);
	let x = (width - w - 12.0).max(0.0);
	ctx.set_fill_style_str("rgba(18, 18, 31, 0.85)");
	ctx.fill_rect(x, 12.0, w, h);
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		ctx.set_fill_style_str(if i == 0 { TEXT } else { MUTED });
		let _ = ctx.fill_text(
			line,
			x + TOOLTIP_PADDING,
			12.0 + TOOLTIP_PADDING + i as f64 * TOOLTIP_LINE_HEIGHT,
		);
	}
	ctx.set_text_baseline("alphabetic");
}

pub fn draw_control_bar<A: Copy + PartialEq>(ctx: &CanvasRenderingContext2d, bar: &ControlBar<A>) {
	let band = bar.band();
	ctx.set_fill_style_str(BAND_FILL);
	ctx.fill_rect(band.x, band.y, band.w, band.h);
	for button in &bar.buttons {
		draw_button(ctx, button);
	}
	if let Some(slider) = bar.slider() {
		draw_slider(ctx, slider);
	}
}

fn draw_button<A>(ctx: &CanvasRenderingContext2d, button: &Button<A>) {
	let r = button.rect;
	let fill = match (button.active, button.hovered) {
		(true, _) => ACCENT,
		(false, true) => "#3a3a5c",
		(false, false) => "#2a2a44",
	};
	ctx.set_fill_style_str(fill);
	ctx.fill_rect(r.x, r.y, r.w, r.h);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.25)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(r.x + 0.5, r.y + 0.5, r.w - 1.0, r.h - 1.0);

	let (cx, cy) = r.center();
	ctx.set_fill_style_str(if button.active { "#0d0d1a" } else { TEXT });
	ctx.set_font(&format!("{BUTTON_FONT_PX}px sans-serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&button.label, cx, cy);
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");
}

fn draw_slider(ctx: &CanvasRenderingContext2d, slider: &Slider) {
	let track = slider.track();
	ctx.set_fill_style_str("#3a3a5c");
	ctx.fill_rect(track.x, track.y, track.w, track.h);
	ctx.set_fill_style_str(ACCENT);
	ctx.fill_rect(track.x, track.y, slider.fraction() * track.w, track.h);

	let (_, cy) = track.center();
	ctx.begin_path();
	let _ = ctx.arc(slider.knob_x(), cy, 8.0, 0.0, std::f64::consts::TAU);
	ctx.set_fill_style_str(if slider.is_dragging() { "white" } else { "#dde8ff" });
	ctx.fill();

	ctx.set_fill_style_str(MUTED);
	ctx.set_font("12px sans-serif");
	let caption = format!("{}: {}", slider.label, format_value(slider.value()));
	let _ = ctx.fill_text(&caption, track.x, track.y - 10.0);
}

/// Measure, place and draw a tooltip so it stays on the canvas.
pub fn draw_tooltip(ctx: &CanvasRenderingContext2d, tooltip: &Tooltip, width: f64, height: f64) {
	ctx.set_font(&format!("{TOOLTIP_FONT_PX}px sans-serif"));
	let widest = tooltip
		.lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = tooltip.size_for(widest);
	let rect = place(tooltip.anchor, w, h, width, height);

	ctx.set_fill_style_str("rgba(250, 250, 255, 0.95)");
	ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
	ctx.set_text_baseline("top");
	for (i, line) in tooltip.lines.iter().enumerate() {
		ctx.set_fill_style_str(if i == 0 { "#111" } else { "#444" });
		ctx.set_font(&if i == 0 {
			format!("bold {TOOLTIP_FONT_PX}px sans-serif")
		} else {
			format!("{TOOLTIP_FONT_PX}px sans-serif")
		});
		let _ = ctx.fill_text(
			line,
			rect.x + TOOLTIP_PADDING,
			rect.y + TOOLTIP_PADDING + i as f64 * TOOLTIP_LINE_HEIGHT,
		);
	}
	ctx.set_text_baseline("alphabetic");
}

/// Whole numbers without a trailing `.0`.
pub fn format_value(v: f64) -> String {
	if v.fract() == 0.0 {
		format!("{v:.0}")
	} else {
		format!("{v:.2}")
	}
}

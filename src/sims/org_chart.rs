use log::info;
use web_sys::CanvasRenderingContext2d;

use super::MicroSim;
use crate::components::controls::{
	clear, draw_control_bar, draw_heading, draw_panel, draw_tooltip,
};
use crate::components::force_graph::{group_color, plot_height};
use crate::data::OrgUnit;
use crate::layout::TreeLayout;
use crate::ui::geometry::estimate_text_width;
use crate::ui::{Button, ControlBar, ControlEvent, Rect, Tooltip};

const BOX_W: f64 = 132.0;
const MIN_BOX_W: f64 = 44.0;
const BOX_H: f64 = 38.0;
const BOX_GAP: f64 = 8.0;
/// Top of the first row, below the heading.
const TOP: f64 = 84.0;
const MAX_LEVEL_HEIGHT: f64 = 96.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	ExpandAll,
	CollapseAll,
}

/// The formal hierarchy as collapsible boxes. Clicking a manager folds or
/// unfolds their reports.
pub struct OrgChartSim {
	tree: TreeLayout,
	controls: ControlBar<Action>,
	width: f64,
	height: f64,
	box_w: f64,
	hover: Option<usize>,
	pressed: Option<usize>,
}

impl OrgChartSim {
	pub fn new(root: OrgUnit, width: f64, height: f64) -> Self {
		let tree = TreeLayout::from_unit(&root);
		info!(
			"org chart: {} people over {} levels",
			tree.nodes().len(),
			tree.depth() + 1
		);
		let mut sim = Self {
			tree,
			controls: ControlBar::new(vec![
				Button::new(Action::ExpandAll, "Expand all"),
				Button::new(Action::CollapseAll, "Collapse all"),
			]),
			width,
			height,
			box_w: BOX_W,
			hover: None,
			pressed: None,
		};
		sim.arrange();
		sim
	}

	/// Single box shown before the real chart arrives.
	pub fn placeholder(width: f64, height: f64) -> Self {
		Self::new(
			OrgUnit {
				name: "Org chart".to_string(),
				title: "Loading…".to_string(),
				reports: Vec::new(),
			},
			width,
			height,
		)
	}

	fn arrange(&mut self) {
		self.controls.layout(self.width, self.height);
		let slots = self.tree.visible_leaves().max(1) as f64;
		self.box_w = (self.width / slots - BOX_GAP).clamp(MIN_BOX_W, BOX_W);
		let gaps = self.tree.depth().max(1) as f64;
		let level = ((plot_height(self.height) - TOP - BOX_H / 2.0) / gaps)
			.clamp(BOX_H + BOX_GAP, MAX_LEVEL_HEIGHT);
		self.tree.arrange(self.width, TOP, level);
	}

	fn box_at(&self, x: f64, y: f64) -> Option<usize> {
		self.tree.node_at(x, y, self.box_w, BOX_H)
	}

	fn box_rect(&self, idx: usize) -> Rect {
		let n = &self.tree.nodes()[idx];
		Rect::new(n.x - self.box_w / 2.0, n.y - BOX_H / 2.0, self.box_w, BOX_H)
	}

	fn toggle(&mut self, idx: usize) {
		if self.tree.toggle(idx) {
			self.arrange();
		}
	}

	fn handle(&mut self, event: ControlEvent<Action>) {
		match event {
			ControlEvent::Clicked(Action::ExpandAll) => self.tree.expand_all(),
			ControlEvent::Clicked(Action::CollapseAll) => self.tree.collapse_from(1),
			ControlEvent::SliderMoved(_) => {}
		}
		self.hover = None;
		self.arrange();
	}

	fn stats(&self) -> Vec<String> {
		vec![
			format!("People: {}", self.tree.nodes().len()),
			format!("Levels: {}", self.tree.depth() + 1),
			format!("Showing: {}", self.tree.visible().count()),
		]
	}

	fn tooltip(&self) -> Option<Tooltip> {
		let idx = self.hover?;
		let node = &self.tree.nodes()[idx];
		let mut lines = vec![node.name.clone()];
		if !node.title.is_empty() {
			lines.push(node.title.clone());
		}
		if !node.children.is_empty() {
			lines.push(format!(
				"Direct reports: {} · in total: {}",
				node.children.len(),
				self.tree.descendant_count(idx)
			));
			lines.push(if node.collapsed { "Click to expand" } else { "Click to collapse" }.to_string());
		}
		Some(Tooltip::new((node.x, node.y + BOX_H / 2.0), lines))
	}

	fn draw_links(&self, ctx: &CanvasRenderingContext2d) {
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.35)");
		ctx.set_line_width(1.5);
		ctx.begin_path();
		for (_, node) in self.tree.visible() {
			if node.collapsed {
				continue;
			}
			for &c in &node.children {
				let child = &self.tree.nodes()[c];
				let mid = (node.y + child.y) / 2.0;
				ctx.move_to(node.x, node.y + BOX_H / 2.0);
				ctx.line_to(node.x, mid);
				ctx.line_to(child.x, mid);
				ctx.line_to(child.x, child.y - BOX_H / 2.0);
			}
		}
		ctx.stroke();
	}

	fn draw_box(&self, ctx: &CanvasRenderingContext2d, idx: usize) {
		let node = &self.tree.nodes()[idx];
		let r = self.box_rect(idx);
		ctx.set_fill_style_str(group_color(node.depth));
		ctx.set_global_alpha(if self.hover == Some(idx) { 1.0 } else { 0.85 });
		ctx.fill_rect(r.x, r.y, r.w, r.h);
		ctx.set_global_alpha(1.0);
		if node.collapsed {
			// stacked edge marks hidden reports
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(2.0);
			ctx.stroke_rect(r.x + 3.0, r.y + 3.0, r.w, r.h);
		}

		ctx.set_fill_style_str("white");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let (cx, cy) = r.center();
		ctx.set_font("bold 12px sans-serif");
		let _ = ctx.fill_text(&fit(&node.name, r.w - 6.0, 12.0), cx, cy - 7.0);
		ctx.set_font("10px sans-serif");
		let _ = ctx.fill_text(&fit(&node.title, r.w - 6.0, 10.0), cx, cy + 8.0);
		ctx.set_text_align("left");
		ctx.set_text_baseline("alphabetic");
	}
}

/// Shorten `text` with an ellipsis until it roughly fits `width`.
fn fit(text: &str, width: f64, font_px: f64) -> String {
	if estimate_text_width(text, font_px) <= width {
		return text.to_string();
	}
	let mut out: String = text.to_string();
	while !out.is_empty() && estimate_text_width(&out, font_px) + font_px > width {
		out.pop();
	}
	out.push('…');
	out
}

impl MicroSim for OrgChartSim {
	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.arrange();
	}

	fn tick(&mut self, _dt: f64) {}

	fn render(&self, ctx: &CanvasRenderingContext2d) {
		clear(ctx, self.width, self.height);
		self.draw_links(ctx);
		for (idx, _) in self.tree.visible() {
			self.draw_box(ctx, idx);
		}
		draw_heading(
			ctx,
			"Org Chart",
			"Formal reporting lines. Click a manager to fold or unfold their team.",
		);
		draw_panel(ctx, self.width, &self.stats());
		draw_control_bar(ctx, &self.controls);
		if let Some(tooltip) = self.tooltip() {
			draw_tooltip(ctx, &tooltip, self.width, self.height);
		}
	}

	fn pointer_down(&mut self, x: f64, y: f64) {
		if self.controls.contains(x, y) {
			if let Some(event) = self.controls.press(x, y) {
				self.handle(event);
			}
			return;
		}
		self.pressed = self.box_at(x, y);
	}

	fn pointer_move(&mut self, x: f64, y: f64) {
		self.controls.hover(x, y);
		self.hover = if self.controls.contains(x, y) {
			None
		} else {
			self.box_at(x, y)
		};
	}

	fn pointer_up(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.pressed.take().filter(|&i| self.box_at(x, y) == Some(i)) {
			self.toggle(idx);
		}
	}

	fn pointer_leave(&mut self) {
		self.controls.clear_hover();
		self.hover = None;
		self.pressed = None;
	}

	fn key_down(&mut self, key: &str) {
		match key {
			"e" | "E" | "r" | "R" => self.handle(ControlEvent::Clicked(Action::ExpandAll)),
			"c" | "C" => self.handle(ControlEvent::Clicked(Action::CollapseAll)),
			_ => {}
		}
	}

	fn cursor(&self) -> &'static str {
		let over_manager = self
			.hover
			.is_some_and(|i| !self.tree.nodes()[i].children.is_empty());
		if over_manager || self.controls.buttons.iter().any(|b| b.hovered) {
			"pointer"
		} else {
			"default"
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::parse_org_chart;

	fn unit(name: &str, reports: Vec<OrgUnit>) -> OrgUnit {
		OrgUnit {
			name: name.to_string(),
			title: String::new(),
			reports,
		}
	}

	fn sim() -> OrgChartSim {
		let root = unit(
			"Ada",
			vec![
				unit("Ben", vec![unit("Cy", vec![]), unit("Di", vec![])]),
				unit("Eve", vec![unit("Fay", vec![])]),
			],
		);
		OrgChartSim::new(root, 800.0, 560.0)
	}

	fn click(sim: &mut OrgChartSim, idx: usize) {
		let (x, y) = (sim.tree.nodes()[idx].x, sim.tree.nodes()[idx].y);
		sim.pointer_move(x, y);
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
	}

	#[test]
	fn boxes_sit_above_the_controls_without_overlap() {
		let sim = sim();
		let band = sim.controls.band();
		let visible: Vec<usize> = sim.tree.visible().map(|(i, _)| i).collect();
		for &i in &visible {
			assert!(sim.box_rect(i).bottom() <= band.y);
		}
		let leaves = [2, 3, 5].map(|i| sim.box_rect(i));
		assert!(leaves[0].right() <= leaves[1].x);
		assert!(leaves[1].right() <= leaves[2].x);
	}

	#[test]
	fn clicking_a_manager_folds_their_team() {
		let mut sim = sim();
		click(&mut sim, 1);
		assert!(sim.tree.nodes()[1].collapsed);
		assert_eq!(sim.tree.visible().count(), 4);
		assert_eq!(sim.cursor(), "pointer");
		click(&mut sim, 1);
		assert_eq!(sim.tree.visible().count(), 6);
	}

	#[test]
	fn press_then_release_elsewhere_does_nothing() {
		let mut sim = sim();
		let n = sim.tree.nodes()[1].clone();
		sim.pointer_down(n.x, n.y);
		sim.pointer_up(n.x + 300.0, n.y + 200.0);
		assert!(!sim.tree.nodes()[1].collapsed);
	}

	#[test]
	fn buttons_collapse_and_expand_everything() {
		let mut sim = sim();
		sim.key_down("c");
		assert_eq!(sim.tree.visible().count(), 3);
		let (x, y) = sim.controls.buttons[0].rect.center();
		sim.pointer_down(x, y);
		sim.pointer_up(x, y);
		assert_eq!(sim.tree.visible().count(), 6);
	}

	#[test]
	fn tooltip_counts_reports() {
		let mut sim = sim();
		let n = sim.tree.nodes()[0].clone();
		sim.pointer_move(n.x, n.y);
		let tip = sim.tooltip().unwrap();
		assert_eq!(tip.lines[0], "Ada");
		assert!(tip.lines.iter().any(|l| l == "Direct reports: 2 · in total: 5"));
	}

	#[test]
	fn long_names_are_shortened() {
		assert_eq!(fit("Ada", 100.0, 12.0), "Ada");
		let short = fit("A very long job title indeed", 60.0, 10.0);
		assert!(short.ends_with('…'));
		assert!(estimate_text_width(&short, 10.0) <= 60.0);
	}

	#[test]
	fn shipped_chart_lays_out() {
		let json = include_str!("../../public/data/org-chart.json");
		let root = parse_org_chart(json).unwrap();
		let mut sim = OrgChartSim::new(root, 960.0, 640.0);
		sim.key_down("c");
		assert!(sim.tree.visible().count() < sim.tree.nodes().len());
		sim.resize(480.0, 400.0);
		assert!(sim.box_w >= MIN_BOX_W);
	}
}

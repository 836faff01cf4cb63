use crate::data::OrgUnit;

/// One box of the org chart.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
	pub name: String,
	pub title: String,
	pub parent: Option<usize>,
	pub children: Vec<usize>,
	pub depth: usize,
	pub collapsed: bool,
	pub visible: bool,
	pub x: f64,
	pub y: f64,
}

/// Arena-backed hierarchy with a simple tidy layout: visible leaves take
/// consecutive slots and every parent sits centered over its children.
#[derive(Clone, Debug)]
pub struct TreeLayout {
	nodes: Vec<TreeNode>,
}

impl TreeLayout {
	pub fn from_unit(root: &OrgUnit) -> Self {
		let mut nodes = Vec::new();
		let mut stack: Vec<(&OrgUnit, Option<usize>, usize)> = vec![(root, None, 0)];
		while let Some((unit, parent, depth)) = stack.pop() {
			let idx = nodes.len();
			nodes.push(TreeNode {
				name: unit.name.clone(),
				title: unit.title.clone(),
				parent,
				children: Vec::new(),
				depth,
				collapsed: false,
				visible: true,
				x: 0.0,
				y: 0.0,
			});
			if let Some(p) = parent {
				let siblings: &mut Vec<usize> = &mut nodes[p].children;
				siblings.push(idx);
			}
			// reversed so the first report is popped (and numbered) first
			for child in unit.reports.iter().rev() {
				stack.push((child, Some(idx), depth + 1));
			}
		}
		Self { nodes }
	}

	pub fn nodes(&self) -> &[TreeNode] {
		&self.nodes
	}

	pub fn depth(&self) -> usize {
		self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
	}

	pub fn visible(&self) -> impl Iterator<Item = (usize, &TreeNode)> {
		self.nodes.iter().enumerate().filter(|(_, n)| n.visible)
	}

	/// Number of people below `idx`, collapsed or not.
	pub fn descendant_count(&self, idx: usize) -> usize {
		let mut count = 0;
		let mut stack = self.nodes[idx].children.clone();
		while let Some(i) = stack.pop() {
			count += 1;
			stack.extend_from_slice(&self.nodes[i].children);
		}
		count
	}

	/// Collapse or expand one unit. Leaves cannot be collapsed.
	pub fn toggle(&mut self, idx: usize) -> bool {
		let Some(node) = self.nodes.get_mut(idx) else {
			return false;
		};
		if node.children.is_empty() {
			return false;
		}
		node.collapsed = !node.collapsed;
		self.refresh_visibility();
		true
	}

	pub fn expand_all(&mut self) {
		for node in &mut self.nodes {
			node.collapsed = false;
		}
		self.refresh_visibility();
	}

	/// Collapse every unit at `depth` or deeper that has reports.
	pub fn collapse_from(&mut self, depth: usize) {
		for node in &mut self.nodes {
			node.collapsed = node.depth >= depth && !node.children.is_empty();
		}
		self.refresh_visibility();
	}

	/// Slots the current layout needs along one row.
	pub fn visible_leaves(&self) -> usize {
		if self.nodes.is_empty() {
			0
		} else {
			self.visible_leaf_count(0)
		}
	}

	/// Assign coordinates to every visible box.
	pub fn arrange(&mut self, width: f64, top: f64, level_height: f64) {
		if self.nodes.is_empty() {
			return;
		}
		let leaves = self.visible_leaves().max(1);
		let slot = width / leaves as f64;
		let mut next = 0;
		self.place(0, &mut next, slot, top, level_height);
	}

	/// Visible box whose rectangle centered on its coordinates contains the point.
	pub fn node_at(&self, x: f64, y: f64, box_w: f64, box_h: f64) -> Option<usize> {
		self.visible()
			.find(|(_, n)| (x - n.x).abs() <= box_w / 2.0 && (y - n.y).abs() <= box_h / 2.0)
			.map(|(i, _)| i)
	}

	fn visible_leaf_count(&self, idx: usize) -> usize {
		let node = &self.nodes[idx];
		if node.collapsed || node.children.is_empty() {
			return 1;
		}
		node.children.iter().map(|&c| self.visible_leaf_count(c)).sum()
	}

	fn place(&mut self, idx: usize, next: &mut usize, slot: f64, top: f64, level_height: f64) {
		let depth = self.nodes[idx].depth;
		self.nodes[idx].y = top + depth as f64 * level_height;

		if self.nodes[idx].collapsed || self.nodes[idx].children.is_empty() {
			self.nodes[idx].x = (*next as f64 + 0.5) * slot;
			*next += 1;
			return;
		}

		let children = self.nodes[idx].children.clone();
		for &child in &children {
			self.place(child, next, slot, top, level_height);
		}
		let first = self.nodes[children[0]].x;
		let last = self.nodes[children[children.len() - 1]].x;
		self.nodes[idx].x = (first + last) / 2.0;
	}

	fn refresh_visibility(&mut self) {
		// parents always precede their reports in the arena
		for i in 0..self.nodes.len() {
			let visible = match self.nodes[i].parent {
				None => true,
				Some(p) => self.nodes[p].visible && !self.nodes[p].collapsed,
			};
			self.nodes[i].visible = visible;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn unit(name: &str, reports: Vec<OrgUnit>) -> OrgUnit {
		OrgUnit {
			name: name.to_string(),
			title: format!("{name} title"),
			reports,
		}
	}

	fn sample() -> TreeLayout {
		TreeLayout::from_unit(&unit(
			"ceo",
			vec![
				unit("cto", vec![unit("dev1", vec![]), unit("dev2", vec![])]),
				unit("cfo", vec![unit("acct", vec![])]),
			],
		))
	}

	#[test]
	fn arena_is_preorder() {
		let tree = sample();
		let names: Vec<_> = tree.nodes().iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, ["ceo", "cto", "dev1", "dev2", "cfo", "acct"]);
		assert_eq!(tree.nodes()[0].children, vec![1, 4]);
		assert_eq!(tree.depth(), 2);
		assert_eq!(tree.descendant_count(0), 5);
	}

	#[test]
	fn parents_center_over_children() {
		let mut tree = sample();
		tree.arrange(300.0, 40.0, 100.0);
		let n = tree.nodes();
		assert_eq!(n[2].x, 50.0);
		assert_eq!(n[3].x, 150.0);
		assert_eq!(n[5].x, 250.0);
		assert_eq!(n[1].x, 100.0);
		assert_eq!(n[0].x, (100.0 + 250.0) / 2.0);
		assert_eq!(n[5].y, 240.0);
	}

	#[test]
	fn collapsing_hides_reports_and_frees_slots() {
		let mut tree = sample();
		assert!(tree.toggle(1));
		assert!(!tree.nodes()[2].visible);
		assert!(!tree.nodes()[3].visible);
		assert_eq!(tree.visible_leaves(), 2);
		tree.arrange(200.0, 0.0, 50.0);
		assert_eq!(tree.nodes()[1].x, 50.0);
		assert_eq!(tree.nodes()[5].x, 150.0);

		assert!(!tree.toggle(5), "leaves do not collapse");
		tree.expand_all();
		assert_eq!(tree.visible().count(), 6);
	}

	#[test]
	fn collapse_from_depth_keeps_top_levels() {
		let mut tree = sample();
		tree.collapse_from(1);
		let shown: Vec<_> = tree.visible().map(|(_, n)| n.name.as_str()).collect();
		assert_eq!(shown, ["ceo", "cto", "cfo"]);
	}

	#[test]
	fn hit_test_uses_box_extent() {
		let mut tree = sample();
		tree.arrange(300.0, 40.0, 100.0);
		assert_eq!(tree.node_at(52.0, 245.0, 80.0, 30.0), Some(2));
		assert_eq!(tree.node_at(52.0, 300.0, 80.0, 30.0), None);
	}
}

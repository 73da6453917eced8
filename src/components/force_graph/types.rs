/// A node as the canvas draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
	/// Stable id, reported back on selection.
	pub id: String,
	/// Text drawn beside the node.
	pub label: Option<String>,
	/// Palette slot; nodes in the same group share a fill.
	pub group: Option<u32>,
}

/// A directed link between two [`CanvasNode`] ids.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLink {
	/// Tail node id.
	pub source: String,
	/// Head node id.
	pub target: String,
	/// Text drawn at the midpoint.
	pub label: Option<String>,
}

/// Everything one frame of the canvas is built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasData {
	/// Nodes to simulate.
	pub nodes: Vec<CanvasNode>,
	/// Links between them; dangling ones are skipped.
	pub links: Vec<CanvasLink>,
}

use std::collections::HashSet;

use serde_json::Value;

/// A vertex as the graph view shows it.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Neo4j element id.
	pub id: String,
	/// All labels, joined with ", ".
	pub label: String,
	/// Property map as returned by the server.
	pub properties: Value,
}

/// A relationship between two [`GraphNode`]s, unique by `(from, to, label)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	/// Start node id.
	pub from: String,
	/// End node id.
	pub to: String,
	/// Relationship type.
	pub label: String,
	/// Property map as returned by the server.
	pub properties: Value,
}

impl GraphEdge {
	/// Identity used for deduplication and comparison.
	pub fn key(&self) -> (&str, &str, &str) {
		(&self.from, &self.to, &self.label)
	}
}

/// The node and edge collections shown at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	/// Unique by id, in first-seen order.
	pub nodes: Vec<GraphNode>,
	/// Unique by [`GraphEdge::key`], in first-seen order.
	pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Compares membership only: node ids and edge keys. Properties and
	/// ordering are ignored.
	pub fn differs_from(&self, other: &GraphSnapshot) -> bool {
		if self.nodes.len() != other.nodes.len() || self.edges.len() != other.edges.len() {
			return true;
		}
		let ids: HashSet<&str> = other.nodes.iter().map(|n| n.id.as_str()).collect();
		if self.nodes.iter().any(|n| !ids.contains(n.id.as_str())) {
			return true;
		}
		let keys: HashSet<_> = other.edges.iter().map(GraphEdge::key).collect();
		self.edges.iter().any(|e| !keys.contains(&e.key()))
	}
}

/// Swaps `next` into `current` unless both hold the same members.
/// Returns whether anything changed.
pub fn replace_if_changed(current: &mut GraphSnapshot, next: GraphSnapshot) -> bool {
	if current.differs_from(&next) {
		*current = next;
		true
	} else {
		false
	}
}

/// Accumulates one fetch worth of nodes and edges, keeping the first
/// occurrence of each.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
	snapshot: GraphSnapshot,
	node_ids: HashSet<String>,
	edge_keys: HashSet<(String, String, String)>,
}

impl SnapshotBuilder {
	/// An empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns false if a node with the same id was already added.
	pub fn add_node(&mut self, node: GraphNode) -> bool {
		if !self.node_ids.insert(node.id.clone()) {
			return false;
		}
		self.snapshot.nodes.push(node);
		true
	}

	/// Returns false if an edge with the same key was already added.
	pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
		let key = (edge.from.clone(), edge.to.clone(), edge.label.clone());
		if !self.edge_keys.insert(key) {
			return false;
		}
		self.snapshot.edges.push(edge);
		true
	}

	/// The accumulated snapshot.
	pub fn finish(self) -> GraphSnapshot {
		self.snapshot
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: "Paper".into(),
			properties: json!({}),
		}
	}

	fn edge(from: &str, to: &str, label: &str, props: Value) -> GraphEdge {
		GraphEdge {
			from: from.into(),
			to: to.into(),
			label: label.into(),
			properties: props,
		}
	}

	#[test]
	fn duplicate_nodes_collapse() {
		let mut b = SnapshotBuilder::new();
		assert!(b.add_node(node("1")));
		assert!(!b.add_node(GraphNode {
			label: "Author".into(),
			..node("1")
		}));
		let snap = b.finish();
		assert_eq!(snap.nodes.len(), 1);
		assert_eq!(snap.nodes[0].label, "Paper");
	}

	#[test]
	fn edges_dedup_by_triple_first_wins() {
		let mut b = SnapshotBuilder::new();
		b.add_edge(edge("1", "2", "WROTE", json!({"year": 2020})));
		b.add_edge(edge("1", "2", "WROTE", json!({"year": 1999})));
		b.add_edge(edge("1", "2", "CITES", json!({})));
		b.add_edge(edge("2", "1", "WROTE", json!({})));
		let snap = b.finish();

		assert_eq!(snap.edges.len(), 3);
		assert_eq!(snap.edges[0].properties, json!({"year": 2020}));
	}

	#[test]
	fn same_members_keep_previous_snapshot() {
		let mut current = GraphSnapshot {
			nodes: vec![node("1"), node("2")],
			edges: vec![edge("1", "2", "CITES", json!({"w": 1}))],
		};
		let reordered = GraphSnapshot {
			nodes: vec![node("2"), node("1")],
			edges: vec![edge("1", "2", "CITES", json!({"w": 2}))],
		};
		assert!(!replace_if_changed(&mut current, reordered));
		assert_eq!(current.nodes[0].id, "1");
		assert_eq!(current.edges[0].properties, json!({"w": 1}));
	}

	#[test]
	fn changed_edge_type_replaces_snapshot() {
		let mut current = GraphSnapshot {
			nodes: vec![node("1"), node("2")],
			edges: vec![edge("1", "2", "CITES", json!({}))],
		};
		let next = GraphSnapshot {
			nodes: vec![node("1"), node("2")],
			edges: vec![edge("1", "2", "MENTIONS", json!({}))],
		};
		assert!(replace_if_changed(&mut current, next));
		assert_eq!(current.edges[0].label, "MENTIONS");
	}

	#[test]
	fn empty_fetch_after_empty_is_no_change() {
		let mut current = GraphSnapshot::default();
		assert!(!replace_if_changed(&mut current, GraphSnapshot::default()));
		assert!(current.is_empty());
	}
}

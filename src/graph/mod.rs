//! Knowledge graph ingestion: Neo4j records in, deduplicated snapshot out.

mod neo4j;
mod snapshot;

use std::collections::HashMap;

pub use neo4j::{FieldValue, Neo4jClient, QueryResult, Session, fetch_snapshot, ingest, report};
pub use snapshot::{GraphEdge, GraphNode, GraphSnapshot, SnapshotBuilder, replace_if_changed};

use crate::components::force_graph::{CanvasData, CanvasLink, CanvasNode};

/// Lays a snapshot out for the canvas. Nodes sharing a label set share a
/// colour group, numbered in first-seen order.
pub fn canvas_data(snapshot: &GraphSnapshot) -> CanvasData {
	let mut groups: HashMap<&str, u32> = HashMap::new();
	let nodes = snapshot
		.nodes
		.iter()
		.map(|node| {
			let next = groups.len() as u32;
			let group = *groups.entry(node.label.as_str()).or_insert(next);
			CanvasNode {
				id: node.id.clone(),
				label: (!node.label.is_empty()).then(|| node.label.clone()),
				group: Some(group),
			}
		})
		.collect();
	let links = snapshot
		.edges
		.iter()
		.map(|edge| CanvasLink {
			source: edge.from.clone(),
			target: edge.to.clone(),
			label: Some(edge.label.clone()),
		})
		.collect();
	CanvasData { nodes, links }
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn groups_follow_first_seen_labels() {
		let node = |id: &str, label: &str| GraphNode {
			id: id.into(),
			label: label.into(),
			properties: json!({}),
		};
		let snapshot = GraphSnapshot {
			nodes: vec![node("a", "Author"), node("p", "Paper"), node("b", "Author"), node("x", "")],
			edges: vec![GraphEdge {
				from: "a".into(),
				to: "p".into(),
				label: "WROTE".into(),
				properties: json!({}),
			}],
		};

		let data = canvas_data(&snapshot);
		let groups: Vec<_> = data.nodes.iter().map(|n| n.group).collect();
		assert_eq!(groups, [Some(0), Some(1), Some(0), Some(2)]);
		assert_eq!(data.nodes[3].label, None);
		assert_eq!(data.links[0].label.as_deref(), Some("WROTE"));
	}
}

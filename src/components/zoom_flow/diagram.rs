//! Diagram definitions: the built-in sample and JSON parsing.

use log::{info, warn};

use super::types::{AnchorSide, DiagramData, DiagramEdge, DiagramNode, NodeContent, Position};

/// Parse a JSON diagram definition, logging and returning `None` on failure.
pub fn parse_diagram(json: &str) -> Option<DiagramData> {
	match serde_json::from_str::<DiagramData>(json) {
		Ok(data) => {
			info!(
				"zoom-flow: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("zoom-flow: failed to parse diagram data: {}", e);
			None
		}
	}
}

/// The diagram to show for the page's definition text, if it has one.
///
/// A page without a definition gets the sample quietly; a definition that
/// fails to parse also falls back to the sample, with a warning.
pub fn diagram_or_sample(json: Option<&str>) -> DiagramData {
	let Some(json) = json else {
		info!("zoom-flow: no diagram definition on the page, using sample diagram");
		return sample_diagram();
	};
	parse_diagram(json).unwrap_or_else(|| {
		warn!("zoom-flow: diagram definition unusable, falling back to sample diagram");
		sample_diagram()
	})
}

/// Six UI-design topics around a central introduction.
pub fn sample_diagram() -> DiagramData {
	let node = |id: &str, x: f64, y: f64, title: &str, body: &str| {
		DiagramNode::new(id, Position::new(x, y), NodeContent::new(title, body))
	};

	let nodes = vec![
		node(
			"1",
			500.0,
			250.0,
			"Unveiling the Mysteries of UI",
			"Welcome to an exciting exploration of the fascinating world of User Interface (UI) \
			 design! In this blog, we embark on a journey of discovery as we delve into the most \
			 common questions surrounding UI design and provide simple and insightful answers.",
		),
		node(
			"2",
			50.0,
			50.0,
			"Interaction Metaphors",
			"Interaction design creates technology experiences that seamlessly respond to human \
			 intent, balancing form and function for intuitive use.",
		),
		node(
			"3",
			50.0,
			250.0,
			"Kinetics Physics",
			"In physics and engineering, kinetics is the branch of classical mechanics that is \
			 concerned with the relationship between the motion and its causes, specifically, \
			 forces and torques.",
		),
		node(
			"4",
			50.0,
			450.0,
			"Swipe gestures",
			"A swipe gesture occurs when a person moves one or more fingers across the screen in \
			 a specific horizontal or vertical direction.",
		),
		node(
			"5",
			900.0,
			50.0,
			"Frequency and Novelty",
			"Frequency (matching) and novelty principles have been shown previously to operate \
			 in transfer tests following paired-associate learning, but not under the same \
			 stimulus and response conditions.",
		),
		node(
			"6",
			900.0,
			350.0,
			"Fitts’ Law",
			"Fitts’ law states that the amount of time required for a person to move a pointer \
			 (e.g., mouse cursor) to a target area is a function of the distance to the target \
			 divided by the size of the target.",
		),
	];

	let inbound = |id: &str, source: &str| {
		DiagramEdge::new(id, source, "1").with_source_handle(AnchorSide::Right)
	};
	let outbound = |id: &str, target: &str| {
		DiagramEdge::new(id, "1", target).with_target_handle(AnchorSide::Left)
	};

	DiagramData {
		nodes,
		edges: vec![
			inbound("e1-2", "2"),
			inbound("e1-3", "3"),
			inbound("e1-4", "4"),
			outbound("e1-5", "5"),
			outbound("e1-6", "6"),
		],
		..Default::default()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn sample_has_unique_ids_and_valid_edges() {
		let data = sample_diagram();
		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), 6);
		assert_eq!(data.edges.len(), 5);
		for edge in &data.edges {
			assert!(ids.contains(edge.source.as_str()));
			assert!(ids.contains(edge.target.as_str()));
		}
		assert!(data.nodes.iter().all(|n| n.zoom_factor == 1.0));
		assert!(data.nodes.iter().all(|n| !n.content.title.is_empty()));
	}

	#[test]
	fn parse_rejects_garbage() {
		assert!(parse_diagram("not json").is_none());
		assert!(parse_diagram(r#"{ "edges": [] }"#).is_none());
	}

	#[test]
	fn missing_or_broken_definition_falls_back_to_sample() {
		assert_eq!(diagram_or_sample(None).nodes.len(), 6);
		assert_eq!(diagram_or_sample(Some("{ nodes: oops")).nodes.len(), 6);

		let own = diagram_or_sample(Some(
			r#"{ "nodes": [{ "id": "x", "position": { "x": 0, "y": 0 } }] }"#,
		));
		assert_eq!(own.nodes.len(), 1);
		assert_eq!(own.nodes[0].id, "x");
	}

	#[test]
	fn parse_accepts_policy_overrides() {
		let data = parse_diagram(
			r#"{ "nodes": [], "zoom": { "floor": 0.4 }, "tiers": { "summary_chars": 20 } }"#,
		)
		.unwrap();
		assert_eq!(data.zoom.floor, 0.4);
		assert_eq!(data.zoom.max_zoom, 3.0);
		assert_eq!(data.tiers.summary_chars, 20);
		assert_eq!(data.tiers.minimized_below, 0.8);
	}
}

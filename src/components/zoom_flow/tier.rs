//! Node rendering policy: detail tiers, border treatment and anchors.
//!
//! [`render_node`] is pure. Given one [`NodeView`] it decides how much of the
//! node's content to show, which border to draw and how far to scale the
//! surface. Geometry is left to the canvas renderer.

use serde::Deserialize;

use super::state::NodeView;
use super::types::AnchorSide;

/// Zoom thresholds for the detail tiers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierConfig {
	/// Below this zoom only the title is shown.
	pub minimized_below: f64,
	/// Below this zoom (and at or above `minimized_below`) the body is cut short.
	pub partial_below: f64,
	/// Characters of body kept in the partial tier.
	pub summary_chars: usize,
}

impl Default for TierConfig {
	fn default() -> Self {
		Self {
			minimized_below: 0.8,
			partial_below: 1.0,
			summary_chars: 60,
		}
	}
}

/// How much of a node's content is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetailTier {
	/// Title only.
	Minimized,
	/// Title and a truncated body.
	Partial,
	/// Title and the complete body.
	Full,
}

impl DetailTier {
	/// Tier for a zoom factor under the given thresholds.
	pub fn for_zoom(zoom_factor: f64, config: &TierConfig) -> Self {
		if zoom_factor < config.minimized_below {
			DetailTier::Minimized
		} else if zoom_factor < config.partial_below {
			DetailTier::Partial
		} else {
			DetailTier::Full
		}
	}
}

/// Border drawn around a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
	/// Highlighted border of the focused node.
	Focused,
	/// Plain border.
	Neutral,
}

/// Incoming or outgoing connection point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorKind {
	/// Incoming edges end here.
	Target,
	/// Outgoing edges start here.
	Source,
}

/// A fixed connection point on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
	/// Which end of an edge attaches here.
	pub kind: AnchorKind,
	/// Box side the anchor sits on.
	pub side: AnchorSide,
}

/// Every node exposes these two anchors: incoming on the left, outgoing on
/// the right.
pub const NODE_ANCHORS: [Anchor; 2] = [
	Anchor {
		kind: AnchorKind::Target,
		side: AnchorSide::Left,
	},
	Anchor {
		kind: AnchorKind::Source,
		side: AnchorSide::Right,
	},
];

/// The slice of a node that should reach the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSlice {
	/// Tier the slice was cut for.
	pub tier: DetailTier,
	/// Always shown.
	pub title: String,
	/// `None` in the minimized tier.
	pub body: Option<String>,
	/// Focused or neutral border.
	pub border: Border,
	/// Uniform scale applied to the node surface.
	pub scale: f64,
	/// Target and source anchors.
	pub anchors: [Anchor; 2],
}

/// Cut `body` to `max_chars` characters, appending an ellipsis when anything
/// was dropped.
pub fn summarize(body: &str, max_chars: usize) -> String {
	match body.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}…", &body[..cut]),
		None => body.to_string(),
	}
}

/// Select the detail tier for a node and slice its content accordingly.
pub fn render_node(view: &NodeView<'_>, config: &TierConfig) -> NodeSlice {
	let node = view.node;
	let tier = DetailTier::for_zoom(node.zoom_factor, config);
	let body = match tier {
		DetailTier::Minimized => None,
		DetailTier::Partial => Some(summarize(&node.content.body, config.summary_chars)),
		DetailTier::Full => Some(node.content.body.clone()),
	};

	NodeSlice {
		tier,
		title: node.content.title.clone(),
		body,
		border: if view.is_focused {
			Border::Focused
		} else {
			Border::Neutral
		},
		scale: node.zoom_factor,
		anchors: NODE_ANCHORS,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::zoom_flow::types::{DiagramNode, NodeContent, Position};

	fn node_at(zoom: f64, body: &str) -> DiagramNode {
		let mut node = DiagramNode::new("n", Position::default(), NodeContent::new("Title", body));
		node.zoom_factor = zoom;
		node
	}

	#[test]
	fn tier_boundaries() {
		let cfg = TierConfig::default();
		assert_eq!(DetailTier::for_zoom(0.3, &cfg), DetailTier::Minimized);
		assert_eq!(DetailTier::for_zoom(0.79, &cfg), DetailTier::Minimized);
		assert_eq!(DetailTier::for_zoom(0.8, &cfg), DetailTier::Partial);
		assert_eq!(DetailTier::for_zoom(0.99, &cfg), DetailTier::Partial);
		assert_eq!(DetailTier::for_zoom(1.0, &cfg), DetailTier::Full);
		assert_eq!(DetailTier::for_zoom(3.0, &cfg), DetailTier::Full);
	}

	#[test]
	fn summarize_counts_characters() {
		assert_eq!(summarize("short", 60), "short");
		assert_eq!(summarize("abcdef", 3), "abc…");
		assert_eq!(summarize("abc", 3), "abc");
		// Multi-byte characters are never split.
		assert_eq!(summarize("Fitts’ law", 6), "Fitts’…");
		assert_eq!(summarize("", 60), "");
	}

	#[test]
	fn minimized_renders_title_only() {
		let node = node_at(0.79, "body text");
		let view = NodeView {
			node: &node,
			is_focused: false,
		};
		let slice = render_node(&view, &TierConfig::default());
		assert_eq!(slice.tier, DetailTier::Minimized);
		assert_eq!(slice.title, "Title");
		assert_eq!(slice.body, None);
		assert_eq!(slice.border, Border::Neutral);
		assert_eq!(slice.scale, 0.79);
	}

	#[test]
	fn partial_truncates_to_sixty_characters() {
		let body = "x".repeat(100);
		let node = node_at(0.8, &body);
		let view = NodeView {
			node: &node,
			is_focused: true,
		};
		let slice = render_node(&view, &TierConfig::default());
		assert_eq!(slice.tier, DetailTier::Partial);
		assert_eq!(slice.body, Some(format!("{}…", "x".repeat(60))));
		assert_eq!(slice.border, Border::Focused);
	}

	#[test]
	fn full_keeps_complete_body() {
		let body = "y".repeat(100);
		let node = node_at(1.0, &body);
		let view = NodeView {
			node: &node,
			is_focused: false,
		};
		let slice = render_node(&view, &TierConfig::default());
		assert_eq!(slice.tier, DetailTier::Full);
		assert_eq!(slice.body.as_deref(), Some(body.as_str()));
	}

	#[test]
	fn missing_body_renders_empty() {
		let node = node_at(1.0, "");
		let view = NodeView {
			node: &node,
			is_focused: false,
		};
		assert_eq!(render_node(&view, &TierConfig::default()).body, Some(String::new()));
	}

	#[test]
	fn rendering_is_repeatable() {
		let node = node_at(0.9, "The same input always yields the same slice.");
		let view = NodeView {
			node: &node,
			is_focused: true,
		};
		let cfg = TierConfig::default();
		assert_eq!(render_node(&view, &cfg), render_node(&view, &cfg));
	}

	#[test]
	fn anchors_sit_on_opposite_sides() {
		let [incoming, outgoing] = NODE_ANCHORS;
		assert_eq!(incoming.kind, AnchorKind::Target);
		assert_eq!(incoming.side, AnchorSide::Left);
		assert_eq!(outgoing.kind, AnchorKind::Source);
		assert_eq!(outgoing.side, AnchorSide::Right);
	}
}

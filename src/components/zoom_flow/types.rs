//! Diagram data structures: the static definition plus the per-node fields
//! mutated at runtime.

use serde::Deserialize;

use super::state::ZoomConfig;
use super::tier::TierConfig;

fn default_zoom_factor() -> f64 {
	1.0
}

/// A point in diagram (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Position {
	/// Horizontal world coordinate.
	pub x: f64,
	/// Vertical world coordinate.
	pub y: f64,
}

impl Position {
	/// Position at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Structured node content. Either part may be missing from a definition,
/// in which case it is treated as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeContent {
	/// Heading, shown in every tier.
	pub title: String,
	/// Body text, cut short or hidden at low zoom.
	pub body: String,
}

impl NodeContent {
	/// Content with the given title and body.
	pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
		}
	}
}

/// A node in the diagram.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DiagramNode {
	/// Unique identifier. Edges reference nodes by this id.
	pub id: String,
	/// Top-left corner of the node's unscaled box.
	pub position: Position,
	/// Title and body.
	#[serde(default)]
	pub content: NodeContent,
	/// Semantic zoom factor. Only the focus/zoom transitions write it, so it
	/// is never read from a definition.
	#[serde(skip_deserializing, default = "default_zoom_factor")]
	pub zoom_factor: f64,
	/// Canvas selection, unrelated to focus.
	#[serde(skip_deserializing)]
	pub selected: bool,
}

impl DiagramNode {
	/// Unfocused, unselected node at the default zoom.
	pub fn new(id: impl Into<String>, position: Position, content: NodeContent) -> Self {
		Self {
			id: id.into(),
			position,
			content,
			zoom_factor: default_zoom_factor(),
			selected: false,
		}
	}
}

/// Which side of a node an anchor sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
	/// Left edge of the box.
	Left,
	/// Right edge of the box.
	Right,
}

impl AnchorSide {
	/// Lowercase name, as used in JSON and edge ids.
	pub fn as_str(self) -> &'static str {
		match self {
			AnchorSide::Left => "left",
			AnchorSide::Right => "right",
		}
	}
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
	/// Unique edge identifier.
	pub id: String,
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Anchor the edge leaves from, if pinned.
	#[serde(default)]
	pub source_handle: Option<AnchorSide>,
	/// Anchor the edge arrives at, if pinned.
	#[serde(default)]
	pub target_handle: Option<AnchorSide>,
	/// Draws a moving dash along the edge.
	#[serde(default)]
	pub animated: bool,
	/// Canvas selection.
	#[serde(skip_deserializing)]
	pub selected: bool,
}

impl DiagramEdge {
	/// Plain edge from `source` to `target` without handles.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			source_handle: None,
			target_handle: None,
			animated: false,
			selected: false,
		}
	}

	/// Pin the source anchor.
	pub fn with_source_handle(mut self, side: AnchorSide) -> Self {
		self.source_handle = Some(side);
		self
	}

	/// Pin the target anchor.
	pub fn with_target_handle(mut self, side: AnchorSide) -> Self {
		self.target_handle = Some(side);
		self
	}
}

/// A new connection requested by the user, before it becomes an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
	/// Node the new edge starts at.
	pub source: String,
	/// Node the new edge ends at.
	pub target: String,
	/// Anchor on the source node.
	pub source_handle: Option<AnchorSide>,
	/// Anchor on the target node.
	pub target_handle: Option<AnchorSide>,
}

/// Complete diagram definition: nodes, edges and optional policy overrides.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DiagramData {
	/// Required; a definition without nodes does not parse.
	pub nodes: Vec<DiagramNode>,
	/// Initial edges.
	#[serde(default)]
	pub edges: Vec<DiagramEdge>,
	/// Focus zoom policy override.
	#[serde(default)]
	pub zoom: ZoomConfig,
	/// Detail tier threshold override.
	#[serde(default)]
	pub tiers: TierConfig,
}

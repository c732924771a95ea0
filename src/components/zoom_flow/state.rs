//! Diagram state and the focus/zoom state machine.
//!
//! [`DiagramState`] owns every node and edge plus the single focus. Two
//! transitions drive semantic zoom:
//!
//! - [`DiagramState::select_node`] moves focus to a node without touching any
//!   zoom factor.
//! - [`DiagramState::set_focus_zoom`] sets the focused node's zoom and
//!   recomputes one shared derived zoom for every other node.
//!
//! Everything else (positions, canvas selection, new edges) arrives as
//! pass-through changes from the canvas and never touches zoom or focus.

use log::{debug, warn};
use serde::Deserialize;

use super::tier::{DetailTier, TierConfig};
use super::types::{AnchorSide, Connection, DiagramData, DiagramEdge, DiagramNode, Position};

/// Numeric policy for focus zoom and the derived zoom of unfocused nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	/// Lower bound of the focus zoom input.
	pub min_zoom: f64,
	/// Upper bound of the focus zoom input.
	pub max_zoom: f64,
	/// Slider granularity.
	pub step: f64,
	/// Unfocused nodes never shrink below this.
	pub floor: f64,
	/// How strongly raising focus zoom shrinks everything else.
	pub decrement_factor: f64,
	/// Zoom factor of a node no transition has touched yet.
	pub default_zoom: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.5,
			max_zoom: 3.0,
			step: 0.1,
			floor: 0.3,
			decrement_factor: 0.7,
			default_zoom: 1.0,
		}
	}
}

impl ZoomConfig {
	/// Whether every bound and rate is usable: a finite non-empty input range,
	/// a positive step and floor, and a finite default.
	pub fn is_valid(&self) -> bool {
		let finite = [
			self.min_zoom,
			self.max_zoom,
			self.step,
			self.floor,
			self.decrement_factor,
			self.default_zoom,
		]
		.iter()
		.all(|v| v.is_finite());
		finite
			&& self.min_zoom > 0.0
			&& self.min_zoom <= self.max_zoom
			&& self.step > 0.0
			&& self.floor > 0.0
			&& self.default_zoom > 0.0
	}

	/// This policy if it is usable, otherwise the default one.
	pub fn sanitized(self) -> Self {
		if self.is_valid() {
			self
		} else {
			warn!("zoom-flow: unusable zoom policy {self:?}, using defaults");
			Self::default()
		}
	}

	/// Clamp raw input into `[min_zoom, max_zoom]`.
	///
	/// Non-numeric input never propagates: `NaN` maps to the lower bound and
	/// infinities to the bound on their side.
	pub fn clamp_input(&self, value: f64) -> f64 {
		if value.is_nan() {
			return self.min_zoom;
		}
		value.max(self.min_zoom).min(self.max_zoom)
	}

	/// Zoom factor shared by every unfocused node for a given focus zoom.
	///
	/// Linear in `focus_zoom`, floored at [`ZoomConfig::floor`].
	pub fn derived_zoom(&self, focus_zoom: f64) -> f64 {
		(1.0 - (focus_zoom - 1.0) * self.decrement_factor).max(self.floor)
	}
}

/// The single focus and the zoom last set for it.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusState {
	/// `None` until the first node is selected.
	pub focused_node_id: Option<String>,
	/// Zoom adopted on selection or last set through the control.
	pub focus_zoom: f64,
}

impl Default for FocusState {
	fn default() -> Self {
		Self {
			focused_node_id: None,
			focus_zoom: 1.0,
		}
	}
}

/// A node annotated with its focus flag for one render pass.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
	/// The stored node.
	pub node: &'a DiagramNode,
	/// True for the one focused node.
	pub is_focused: bool,
}

/// Node changes reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// The node was dragged to a new (snapped) position.
	Position { id: String, position: Position },
	/// Canvas selection toggled.
	Select { id: String, selected: bool },
}

/// Edge changes reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	/// Canvas selection toggled.
	Select { id: String, selected: bool },
}

/// Authoritative diagram state: nodes, edges, focus and zoom policy.
#[derive(Clone, Debug)]
pub struct DiagramState {
	nodes: Vec<DiagramNode>,
	edges: Vec<DiagramEdge>,
	focus: FocusState,
	zoom: ZoomConfig,
	tiers: TierConfig,
}

impl DiagramState {
	/// Build the state from a definition. Every node starts at the default
	/// zoom and nothing is focused. An unusable zoom policy is replaced by the
	/// default one.
	pub fn new(data: DiagramData) -> Self {
		let DiagramData {
			mut nodes,
			edges,
			zoom,
			tiers,
		} = data;
		let zoom = zoom.sanitized();
		for node in &mut nodes {
			node.zoom_factor = zoom.default_zoom;
		}
		Self {
			nodes,
			edges,
			focus: FocusState {
				focus_zoom: zoom.default_zoom,
				..FocusState::default()
			},
			zoom,
			tiers,
		}
	}

	/// All nodes in definition order.
	pub fn nodes(&self) -> &[DiagramNode] {
		&self.nodes
	}

	/// All edges, definition edges first, then connected ones.
	pub fn edges(&self) -> &[DiagramEdge] {
		&self.edges
	}

	/// Look a node up by id.
	pub fn node(&self, id: &str) -> Option<&DiagramNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Current focus state.
	pub fn focus(&self) -> &FocusState {
		&self.focus
	}

	/// Id of the focused node, if any node was ever selected.
	pub fn focused_node_id(&self) -> Option<&str> {
		self.focus.focused_node_id.as_deref()
	}

	/// Focus zoom as stored.
	///
	/// Right after a selection this is the selected node's own zoom factor,
	/// which may sit below the input range (a node shrunk to the floor).
	pub fn focus_zoom(&self) -> f64 {
		self.focus.focus_zoom
	}

	/// Focus zoom as the zoom control shows it, clamped into the input range.
	pub fn focus_zoom_input(&self) -> f64 {
		self.zoom.clamp_input(self.focus.focus_zoom)
	}

	/// Zoom policy in effect.
	pub fn zoom_config(&self) -> &ZoomConfig {
		&self.zoom
	}

	/// Detail-tier thresholds in effect.
	pub fn tier_config(&self) -> &TierConfig {
		&self.tiers
	}

	/// Whether `id` is the focused node.
	pub fn is_focused(&self, id: &str) -> bool {
		self.focused_node_id() == Some(id)
	}

	/// Every node paired with a focus flag computed from the current focus.
	pub fn node_views(&self) -> impl Iterator<Item = NodeView<'_>> {
		let focused = self.focused_node_id();
		self.nodes.iter().map(move |node| NodeView {
			node,
			is_focused: focused == Some(node.id.as_str()),
		})
	}

	/// Focus `node_id`, adopting its current zoom factor as the focus zoom.
	///
	/// Zoom factors are left as they are until the next
	/// [`DiagramState::set_focus_zoom`], so the focused node keeps
	/// `zoom_factor == focus_zoom` even when that value is below `min_zoom`.
	pub fn select_node(&mut self, node_id: &str) {
		let zoom = self
			.node(node_id)
			.map(|n| n.zoom_factor)
			.unwrap_or(self.zoom.default_zoom);
		debug!("zoom-flow: focus -> {node_id} (zoom {zoom})");
		self.focus.focused_node_id = Some(node_id.to_string());
		self.focus.focus_zoom = zoom;
	}

	/// Set the focused node's zoom and recompute every other node.
	///
	/// A no-op when nothing is focused. Returns how many nodes changed
	/// detail tier, so callers can skip redundant redraws.
	pub fn set_focus_zoom(&mut self, value: f64) -> usize {
		let Some(focused) = self.focus.focused_node_id.as_deref() else {
			return 0;
		};

		let focus_zoom = self.zoom.clamp_input(value);
		let others = self.zoom.derived_zoom(focus_zoom);
		self.focus.focus_zoom = focus_zoom;

		let mut tier_changes = 0;
		for node in &mut self.nodes {
			let before = DetailTier::for_zoom(node.zoom_factor, &self.tiers);
			node.zoom_factor = if node.id == focused {
				focus_zoom
			} else {
				others
			};
			if DetailTier::for_zoom(node.zoom_factor, &self.tiers) != before {
				tier_changes += 1;
			}
		}
		debug!(
			"zoom-flow: focus zoom {focus_zoom} on {focused}, others {others}, {tier_changes} tier change(s)"
		);
		tier_changes
	}

	/// Apply canvas node changes. Zoom and focus are untouched.
	pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
		for change in changes {
			match change {
				NodeChange::Position { id, position } => {
					if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
						node.position = *position;
					}
				}
				NodeChange::Select { id, selected } => {
					if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
						node.selected = *selected;
					}
				}
			}
		}
	}

	/// Apply canvas edge changes.
	pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
		for change in changes {
			match change {
				EdgeChange::Select { id, selected } => {
					if let Some(edge) = self.edges.iter_mut().find(|e| &e.id == id) {
						edge.selected = *selected;
					}
				}
			}
		}
	}

	/// Clear canvas selection on every node and edge.
	pub fn clear_selection(&mut self) {
		self.nodes.iter_mut().for_each(|n| n.selected = false);
		self.edges.iter_mut().for_each(|e| e.selected = false);
	}

	/// Append an animated edge for `connection`.
	///
	/// Returns `false` without changes when an identical edge already exists.
	pub fn connect(&mut self, connection: Connection) -> bool {
		let exists = self.edges.iter().any(|e| {
			e.source == connection.source
				&& e.target == connection.target
				&& e.source_handle == connection.source_handle
				&& e.target_handle == connection.target_handle
		});
		if exists {
			return false;
		}

		let handle = |side: Option<AnchorSide>| side.map(AnchorSide::as_str).unwrap_or("");
		let id = format!(
			"edge-{}{}-{}{}",
			connection.source,
			handle(connection.source_handle),
			connection.target,
			handle(connection.target_handle)
		);
		debug!("zoom-flow: connect {id}");
		self.edges.push(DiagramEdge {
			id,
			source: connection.source,
			target: connection.target,
			source_handle: connection.source_handle,
			target_handle: connection.target_handle,
			animated: true,
			selected: false,
		});
		true
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::zoom_flow::diagram::sample_diagram;
	use crate::components::zoom_flow::types::NodeContent;

	fn three_nodes() -> DiagramState {
		let node = |id: &str| DiagramNode::new(id, Position::default(), NodeContent::new(id, ""));
		DiagramState::new(DiagramData {
			nodes: vec![node("a"), node("b"), node("c")],
			..Default::default()
		})
	}

	fn zoom_of(state: &DiagramState, id: &str) -> f64 {
		state.node(id).unwrap().zoom_factor
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn derived_zoom_follows_linear_law_with_floor() {
		let cfg = ZoomConfig::default();
		assert_eq!(cfg.derived_zoom(1.0), 1.0);
		assert!(close(cfg.derived_zoom(0.5), 1.35));
		assert!(close(cfg.derived_zoom(1.5), 0.65));
		assert!(close(cfg.derived_zoom(2.0), 0.3));
		assert_eq!(cfg.derived_zoom(3.0), 0.3);
	}

	#[test]
	fn clamp_input_handles_out_of_range_and_non_numeric() {
		let cfg = ZoomConfig::default();
		assert_eq!(cfg.clamp_input(0.1), 0.5);
		assert_eq!(cfg.clamp_input(7.0), 3.0);
		assert_eq!(cfg.clamp_input(f64::INFINITY), 3.0);
		assert_eq!(cfg.clamp_input(f64::NEG_INFINITY), 0.5);
		assert_eq!(cfg.clamp_input(f64::NAN), 0.5);
		assert_eq!(cfg.clamp_input(1.7), 1.7);
	}

	#[test]
	fn set_focus_zoom_without_focus_is_noop() {
		let mut state = three_nodes();
		assert_eq!(state.set_focus_zoom(2.5), 0);
		assert_eq!(state.focused_node_id(), None);
		assert_eq!(state.focus_zoom(), 1.0);
		assert!(state.nodes().iter().all(|n| n.zoom_factor == 1.0));
	}

	#[test]
	fn select_node_adopts_zoom_without_recomputing() {
		let mut state = three_nodes();
		state.select_node("a");
		state.set_focus_zoom(1.5);
		assert!(close(zoom_of(&state, "b"), 0.65));

		state.select_node("b");
		assert_eq!(state.focused_node_id(), Some("b"));
		assert!(close(state.focus_zoom(), 0.65));
		// Nothing is recomputed until the next zoom change.
		assert_eq!(zoom_of(&state, "a"), 1.5);
		assert!(close(zoom_of(&state, "c"), 0.65));
	}

	#[test]
	fn selecting_a_floored_node_keeps_its_zoom_until_the_next_change() {
		let mut state = three_nodes();
		state.select_node("a");
		state.set_focus_zoom(2.0);
		assert!(close(zoom_of(&state, "b"), 0.3));

		state.select_node("b");
		assert!(close(state.focus_zoom(), 0.3));
		assert!(close(zoom_of(&state, "b"), state.focus_zoom()));
		assert_eq!(state.focus_zoom_input(), 0.5);
		assert_eq!(zoom_of(&state, "a"), 2.0);

		// The first slider input brings the focus back into range.
		state.set_focus_zoom(state.focus_zoom_input());
		assert_eq!(state.focus_zoom(), 0.5);
		assert_eq!(zoom_of(&state, "b"), 0.5);
		assert!(close(zoom_of(&state, "a"), 1.35));
	}

	#[test]
	fn unusable_zoom_policy_falls_back_to_default() {
		let inverted = ZoomConfig {
			min_zoom: 4.0,
			..ZoomConfig::default()
		};
		let zero_step = ZoomConfig {
			step: 0.0,
			..ZoomConfig::default()
		};
		let no_floor = ZoomConfig {
			floor: 0.0,
			..ZoomConfig::default()
		};
		let nan_default = ZoomConfig {
			default_zoom: f64::NAN,
			..ZoomConfig::default()
		};
		for cfg in [inverted, zero_step, no_floor, nan_default] {
			assert!(!cfg.is_valid());
			assert_eq!(cfg.sanitized(), ZoomConfig::default());
		}

		let mut state = DiagramState::new(DiagramData {
			nodes: three_nodes().nodes().to_vec(),
			zoom: ZoomConfig {
				min_zoom: 4.0,
				..ZoomConfig::default()
			},
			..Default::default()
		});
		assert_eq!(state.zoom_config(), &ZoomConfig::default());
		state.select_node("a");
		state.set_focus_zoom(1.0);
		assert_eq!(state.focus_zoom(), 1.0);
	}

	#[test]
	fn clamp_input_never_panics_on_inverted_bounds() {
		let cfg = ZoomConfig {
			min_zoom: 4.0,
			..ZoomConfig::default()
		};
		assert_eq!(cfg.clamp_input(1.0), 3.0);
	}

	#[test]
	fn zoom_policy_override_changes_derived_zoom() {
		let mut state = DiagramState::new(DiagramData {
			nodes: three_nodes().nodes().to_vec(),
			zoom: ZoomConfig {
				floor: 0.4,
				max_zoom: 2.0,
				..ZoomConfig::default()
			},
			..Default::default()
		});
		state.select_node("a");
		state.set_focus_zoom(3.0);
		assert_eq!(state.focus_zoom(), 2.0);
		assert_eq!(zoom_of(&state, "b"), 0.4);
	}

	#[test]
	fn select_unknown_node_uses_default_zoom() {
		let mut state = three_nodes();
		state.select_node("missing");
		assert_eq!(state.focused_node_id(), Some("missing"));
		assert_eq!(state.focus_zoom(), 1.0);

		// Every known node is unfocused and gets the derived zoom.
		state.set_focus_zoom(2.0);
		assert!(state.nodes().iter().all(|n| close(n.zoom_factor, 0.3)));
	}

	#[test]
	fn reselecting_focused_node_keeps_state() {
		let mut state = three_nodes();
		state.select_node("a");
		state.set_focus_zoom(2.2);
		let before = state.focus().clone();
		state.select_node("a");
		assert_eq!(state.focus(), &before);
	}

	#[test]
	fn focus_is_exclusive() {
		let mut state = three_nodes();
		state.select_node("a");
		state.select_node("b");
		let focused: Vec<_> = state
			.node_views()
			.filter(|v| v.is_focused)
			.map(|v| v.node.id.as_str())
			.collect();
		assert_eq!(focused, vec!["b"]);
		assert!(!state.is_focused("a"));
	}

	#[test]
	fn out_of_range_zoom_is_clamped() {
		let mut state = three_nodes();
		state.select_node("a");
		state.set_focus_zoom(10.0);
		assert_eq!(state.focus_zoom(), 3.0);
		assert_eq!(zoom_of(&state, "a"), 3.0);

		state.set_focus_zoom(-1.0);
		assert_eq!(state.focus_zoom(), 0.5);
		assert!(close(zoom_of(&state, "b"), 1.35));
	}

	#[test]
	fn set_focus_zoom_reports_tier_changes() {
		let mut state = three_nodes();
		state.select_node("a");
		// a stays Full, b and c drop to Minimized.
		assert_eq!(state.set_focus_zoom(2.0), 2);
		assert_eq!(state.set_focus_zoom(2.0), 0);
		// b and c climb to Partial (0.93).
		assert_eq!(state.set_focus_zoom(1.1), 2);
	}

	#[test]
	fn position_and_selection_changes_leave_zoom_alone() {
		let mut state = three_nodes();
		state.select_node("a");
		state.set_focus_zoom(1.5);
		let zooms: Vec<f64> = state.nodes().iter().map(|n| n.zoom_factor).collect();

		state.apply_node_changes(&[
			NodeChange::Position {
				id: "b".into(),
				position: Position::new(40.0, 60.0),
			},
			NodeChange::Select {
				id: "c".into(),
				selected: true,
			},
			NodeChange::Select {
				id: "nope".into(),
				selected: true,
			},
		]);

		assert_eq!(state.node("b").unwrap().position, Position::new(40.0, 60.0));
		assert!(state.node("c").unwrap().selected);
		assert_eq!(state.focused_node_id(), Some("a"));
		assert_eq!(state.focus_zoom(), 1.5);
		let after: Vec<f64> = state.nodes().iter().map(|n| n.zoom_factor).collect();
		assert_eq!(zooms, after);

		state.clear_selection();
		assert!(state.nodes().iter().all(|n| !n.selected));
	}

	#[test]
	fn connect_appends_animated_edge_once() {
		let mut state = three_nodes();
		let conn = Connection {
			source: "a".into(),
			target: "b".into(),
			source_handle: Some(AnchorSide::Right),
			target_handle: None,
		};
		assert!(state.connect(conn.clone()));
		assert!(!state.connect(conn));

		assert_eq!(state.edges().len(), 1);
		let edge = &state.edges()[0];
		assert_eq!(edge.id, "edge-aright-b");
		assert!(edge.animated);

		state.apply_edge_changes(&[EdgeChange::Select {
			id: edge.id.clone(),
			selected: true,
		}]);
		assert!(state.edges()[0].selected);
	}

	#[test]
	fn six_node_walkthrough() {
		let mut state = DiagramState::new(sample_diagram());
		assert_eq!(state.nodes().len(), 6);
		assert_eq!(state.focused_node_id(), None);

		state.select_node("1");
		assert_eq!(state.focused_node_id(), Some("1"));
		assert_eq!(state.focus_zoom(), 1.0);
		assert!(
			state
				.nodes()
				.iter()
				.all(|n| DetailTier::for_zoom(n.zoom_factor, state.tier_config()) == DetailTier::Full)
		);

		state.set_focus_zoom(2.0);
		for node in state.nodes() {
			let tier = DetailTier::for_zoom(node.zoom_factor, state.tier_config());
			if node.id == "1" {
				assert_eq!(node.zoom_factor, 2.0);
				assert_eq!(tier, DetailTier::Full);
			} else {
				assert!(close(node.zoom_factor, 0.3));
				assert_eq!(tier, DetailTier::Minimized);
			}
		}
	}

	proptest! {
		#[test]
		fn focused_node_tracks_input(value in 0.5f64..=3.0) {
			let mut state = three_nodes();
			state.select_node("b");
			state.set_focus_zoom(value);
			prop_assert_eq!(zoom_of(&state, "b"), value);
			prop_assert_eq!(state.focus_zoom(), value);
		}

		#[test]
		fn unfocused_nodes_share_derived_zoom(value in -5.0f64..10.0) {
			let mut state = three_nodes();
			state.select_node("a");
			state.set_focus_zoom(value);
			let expected = (1.0 - (state.focus_zoom() - 1.0) * 0.7).max(0.3);
			prop_assert_eq!(zoom_of(&state, "b"), expected);
			prop_assert_eq!(zoom_of(&state, "c"), expected);
			prop_assert!(state.nodes().iter().all(|n| n.zoom_factor >= 0.3));
		}

		#[test]
		fn derived_zoom_is_monotonic(lo in 0.5f64..=3.0, hi in 0.5f64..=3.0) {
			let cfg = ZoomConfig::default();
			let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
			prop_assert!(cfg.derived_zoom(hi) <= cfg.derived_zoom(lo));
		}

		#[test]
		fn set_focus_zoom_is_idempotent(value in 0.0f64..4.0) {
			let mut once = three_nodes();
			once.select_node("c");
			once.set_focus_zoom(value);

			let mut twice = once.clone();
			twice.set_focus_zoom(value);

			prop_assert_eq!(once.focus(), twice.focus());
			prop_assert_eq!(once.nodes(), twice.nodes());
		}
	}
}

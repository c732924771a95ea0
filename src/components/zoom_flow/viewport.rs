//! Canvas view state and gesture handling.
//!
//! Tracks the pan/zoom transform, the laid-out node boxes from the last frame
//! and the gesture in progress. Pointer handlers translate raw screen
//! coordinates into [`Interaction`]s, which the component applies to the
//! [`DiagramState`]. Nothing here touches zoom factors or focus directly: the
//! only focus-related output is [`Interaction::Focus`] on a plain click.

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{DiagramState, EdgeChange, NodeChange};
use super::tier::{Anchor, AnchorKind, NODE_ANCHORS};
use super::types::{AnchorSide, Connection, Position};

/// Canvas behaviour settings.
#[derive(Clone, Debug)]
pub struct FlowConfig {
	/// Dragged node positions snap to multiples of this grid.
	pub snap_grid: (f64, f64),
	pub min_view_zoom: f64,
	pub max_view_zoom: f64,
	/// Multiplier for one wheel notch or zoom button press.
	pub zoom_step: f64,
	/// Pointer travel (pixels) below which a press counts as a click.
	pub click_tolerance: f64,
	/// Fraction of the viewport kept free around the diagram by fit view.
	pub fit_padding: f64,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			snap_grid: (20.0, 20.0),
			min_view_zoom: 0.5,
			max_view_zoom: 2.0,
			zoom_step: 1.2,
			click_tolerance: 3.0,
			fit_padding: 0.1,
		}
	}
}

/// Round `position` to the nearest grid point.
pub fn snap(position: Position, grid: (f64, f64)) -> Position {
	Position::new(
		(position.x / grid.0).round() * grid.0,
		(position.y / grid.1).round() * grid.1,
	)
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
	}

	pub fn union(&self, other: &Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		let (right, bottom) = (
			(self.x + self.w).max(other.x + other.w),
			(self.y + self.h).max(other.y + other.h),
		);
		Rect {
			x,
			y,
			w: right - x,
			h: bottom - y,
		}
	}
}

/// A node's laid-out box from the last render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
	pub id: String,
	/// Unscaled box. Anchors hang off this.
	pub bounds: Rect,
	/// Semantic zoom factor the surface was drawn at.
	pub scale: f64,
}

impl NodeBox {
	/// The visible surface: `bounds` scaled about its centre.
	pub fn surface(&self) -> Rect {
		let (cx, cy) = (
			self.bounds.x + self.bounds.w / 2.0,
			self.bounds.y + self.bounds.h / 2.0,
		);
		let (w, h) = (self.bounds.w * self.scale, self.bounds.h * self.scale);
		Rect {
			x: cx - w / 2.0,
			y: cy - h / 2.0,
			w,
			h,
		}
	}

	/// Anchor point on the unscaled box, unaffected by the surface scale.
	pub fn anchor_point(&self, side: AnchorSide) -> (f64, f64) {
		let y = self.bounds.y + self.bounds.h / 2.0;
		match side {
			AnchorSide::Left => (self.bounds.x, y),
			AnchorSide::Right => (self.bounds.x + self.bounds.w, y),
		}
	}
}

/// Horizontal control-point offset for an edge spanning `distance` along x.
fn control_offset(distance: f64) -> f64 {
	const CURVATURE: f64 = 0.25;
	if distance >= 0.0 {
		0.5 * distance
	} else {
		CURVATURE * 25.0 * (-distance).sqrt()
	}
}

/// Cubic Bézier control points from an outgoing (right) anchor to an
/// incoming (left) anchor.
pub fn edge_curve(from: (f64, f64), to: (f64, f64)) -> [(f64, f64); 4] {
	let offset = control_offset(to.0 - from.0);
	[from, (from.0 + offset, from.1), (to.0 - offset, to.1), to]
}

fn bezier_point(curve: &[(f64, f64); 4], t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	(
		a * curve[0].0 + b * curve[1].0 + c * curve[2].0 + d * curve[3].0,
		a * curve[0].1 + b * curve[1].1 + c * curve[2].1 + d * curve[3].1,
	)
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < 1e-12 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (qx, qy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

/// Approximate distance from `p` to a Bézier curve.
pub fn curve_distance(curve: &[(f64, f64); 4], p: (f64, f64)) -> f64 {
	const SEGMENTS: usize = 24;
	let mut prev = curve[0];
	let mut best = f64::INFINITY;
	for i in 1..=SEGMENTS {
		let next = bezier_point(curve, i as f64 / SEGMENTS as f64);
		best = best.min(segment_distance(p, prev, next));
		prev = next;
	}
	best
}

/// Pan and zoom transform applied to the entire canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Canvas zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, config: &FlowConfig) {
		let new_k = (self.k * factor).clamp(config.min_view_zoom, config.max_view_zoom);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Gesture in progress between pointer down and pointer up.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	/// Pressed on a node; becomes a drag once the pointer travels far enough,
	/// otherwise a click.
	Pressed {
		node_id: String,
		start: (f64, f64),
		node_start: Position,
	},
	Dragging {
		node_id: String,
		start: (f64, f64),
		node_start: Position,
	},
	Panning {
		start: (f64, f64),
		transform_start: (f64, f64),
	},
	/// Dragging a new edge out of a source anchor. `pointer` is in world units.
	Connecting {
		source_id: String,
		pointer: (f64, f64),
	},
}

/// A state change produced by a pointer gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
	Focus(String),
	Nodes(Vec<NodeChange>),
	Edges(Vec<EdgeChange>),
	Connect(Connection),
	ClearSelection,
}

impl Interaction {
	pub fn apply(self, diagram: &mut DiagramState) {
		match self {
			Interaction::Focus(id) => diagram.select_node(&id),
			Interaction::Nodes(changes) => diagram.apply_node_changes(&changes),
			Interaction::Edges(changes) => diagram.apply_edge_changes(&changes),
			Interaction::Connect(connection) => {
				diagram.connect(connection);
			}
			Interaction::ClearSelection => diagram.clear_selection(),
		}
	}
}

/// Everything the canvas knows that the diagram does not.
#[derive(Clone, Debug)]
pub struct CanvasView {
	pub transform: ViewTransform,
	pub gesture: Gesture,
	/// Node boxes from the last frame, in draw order.
	pub boxes: Vec<NodeBox>,
	pub width: f64,
	pub height: f64,
	/// Disables selection, dragging and connecting. Clicks still focus.
	pub locked: bool,
	/// Seconds since start, drives animated edges.
	pub flow_time: f64,
	pub config: FlowConfig,
	pub scale: ScaleConfig,
}

impl CanvasView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::default(),
			gesture: Gesture::Idle,
			boxes: Vec::new(),
			width,
			height,
			locked: false,
			flow_time: 0.0,
			config: FlowConfig::default(),
			scale: ScaleConfig::default(),
		}
	}

	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.transform.k)
	}

	pub fn node_box(&self, id: &str) -> Option<&NodeBox> {
		self.boxes.iter().find(|b| b.id == id)
	}

	/// Topmost node whose visible surface contains the world point.
	pub fn node_at(&self, wx: f64, wy: f64) -> Option<&NodeBox> {
		self.boxes.iter().rev().find(|b| b.surface().contains(wx, wy))
	}

	/// Topmost anchor within pick distance of the world point.
	pub fn anchor_at(&self, wx: f64, wy: f64) -> Option<(&NodeBox, Anchor)> {
		let radius = self.scaled().anchor_hit_radius;
		self.boxes.iter().rev().find_map(|b| {
			NODE_ANCHORS.into_iter().find_map(|anchor| {
				let (ax, ay) = b.anchor_point(anchor.side);
				let dist = ((wx - ax).powi(2) + (wy - ay).powi(2)).sqrt();
				(dist <= radius).then_some((b, anchor))
			})
		})
	}

	/// Curve of an edge between two laid-out nodes.
	pub fn edge_curve_between(&self, source: &str, target: &str) -> Option<[(f64, f64); 4]> {
		let (from, to) = (self.node_box(source)?, self.node_box(target)?);
		Some(edge_curve(
			from.anchor_point(AnchorSide::Right),
			to.anchor_point(AnchorSide::Left),
		))
	}

	/// Topmost edge within pick distance of the world point.
	pub fn edge_at(&self, diagram: &DiagramState, wx: f64, wy: f64) -> Option<String> {
		let tolerance = self.scaled().edge_hit_tolerance;
		diagram.edges().iter().rev().find_map(|edge| {
			let curve = self.edge_curve_between(&edge.source, &edge.target)?;
			(curve_distance(&curve, (wx, wy)) <= tolerance).then(|| edge.id.clone())
		})
	}

	pub fn pointer_down(&mut self, diagram: &DiagramState, sx: f64, sy: f64) -> Vec<Interaction> {
		let (wx, wy) = self.transform.screen_to_world(sx, sy);

		if !self.locked {
			if let Some((b, anchor)) = self.anchor_at(wx, wy) {
				if anchor.kind == AnchorKind::Source {
					self.gesture = Gesture::Connecting {
						source_id: b.id.clone(),
						pointer: (wx, wy),
					};
					return Vec::new();
				}
			}
		}

		if let Some(id) = self.node_at(wx, wy).map(|b| b.id.clone()) {
			let node_start = diagram.node(&id).map(|n| n.position).unwrap_or_default();
			let mut out = Vec::new();
			if !self.locked {
				out.push(Interaction::ClearSelection);
				out.push(Interaction::Nodes(vec![NodeChange::Select {
					id: id.clone(),
					selected: true,
				}]));
			}
			self.gesture = Gesture::Pressed {
				node_id: id,
				start: (sx, sy),
				node_start,
			};
			return out;
		}

		if let Some(edge_id) = self.edge_at(diagram, wx, wy) {
			self.gesture = Gesture::Idle;
			if self.locked {
				return Vec::new();
			}
			return vec![
				Interaction::ClearSelection,
				Interaction::Edges(vec![EdgeChange::Select {
					id: edge_id,
					selected: true,
				}]),
			];
		}

		self.gesture = Gesture::Panning {
			start: (sx, sy),
			transform_start: (self.transform.x, self.transform.y),
		};
		if self.locked {
			Vec::new()
		} else {
			vec![Interaction::ClearSelection]
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Vec<Interaction> {
		let promoted = match &self.gesture {
			Gesture::Pressed {
				node_id,
				start,
				node_start,
			} if !self.locked
				&& ((sx - start.0).powi(2) + (sy - start.1).powi(2)).sqrt()
					> self.config.click_tolerance =>
			{
				Some(Gesture::Dragging {
					node_id: node_id.clone(),
					start: *start,
					node_start: *node_start,
				})
			}
			_ => None,
		};
		if let Some(gesture) = promoted {
			self.gesture = gesture;
		}

		match &mut self.gesture {
			Gesture::Dragging {
				node_id,
				start,
				node_start,
			} => {
				let k = self.transform.k;
				let moved = Position::new(
					node_start.x + (sx - start.0) / k,
					node_start.y + (sy - start.1) / k,
				);
				vec![Interaction::Nodes(vec![NodeChange::Position {
					id: node_id.clone(),
					position: snap(moved, self.config.snap_grid),
				}])]
			}
			Gesture::Panning {
				start,
				transform_start,
			} => {
				self.transform.x = transform_start.0 + (sx - start.0);
				self.transform.y = transform_start.1 + (sy - start.1);
				Vec::new()
			}
			Gesture::Connecting { pointer, .. } => {
				*pointer = self.transform.screen_to_world(sx, sy);
				Vec::new()
			}
			Gesture::Idle | Gesture::Pressed { .. } => Vec::new(),
		}
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Vec<Interaction> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Pressed { node_id, .. } => vec![Interaction::Focus(node_id)],
			Gesture::Connecting { source_id, .. } => {
				let (wx, wy) = self.transform.screen_to_world(sx, sy);
				let target = match self.anchor_at(wx, wy) {
					Some((b, anchor)) if anchor.kind == AnchorKind::Target => Some(b.id.clone()),
					_ => self.node_at(wx, wy).map(|b| b.id.clone()),
				};
				match target {
					Some(target) if target != source_id => vec![Interaction::Connect(Connection {
						source: source_id,
						target,
						source_handle: Some(AnchorSide::Right),
						target_handle: Some(AnchorSide::Left),
					})],
					_ => Vec::new(),
				}
			}
			Gesture::Idle | Gesture::Dragging { .. } | Gesture::Panning { .. } => Vec::new(),
		}
	}

	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Wheel zoom about the pointer. Positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.config.zoom_step
		} else {
			self.config.zoom_step
		};
		self.transform.zoom_at(sx, sy, factor, &self.config);
	}

	pub fn zoom_in(&mut self) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.transform
			.zoom_at(cx, cy, self.config.zoom_step, &self.config);
	}

	pub fn zoom_out(&mut self) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.transform
			.zoom_at(cx, cy, 1.0 / self.config.zoom_step, &self.config);
	}

	/// Zoom and pan so every node surface is visible.
	pub fn fit_view(&mut self) {
		let Some(bounds) = self
			.boxes
			.iter()
			.map(NodeBox::surface)
			.reduce(|a, b| a.union(&b))
		else {
			return;
		};
		if bounds.w <= 0.0 || bounds.h <= 0.0 {
			return;
		}

		let room = 1.0 - 2.0 * self.config.fit_padding;
		let k = (self.width * room / bounds.w)
			.min(self.height * room / bounds.h)
			.clamp(self.config.min_view_zoom, self.config.max_view_zoom);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (bounds.x + bounds.w / 2.0) * k,
			y: self.height / 2.0 - (bounds.y + bounds.h / 2.0) * k,
			k,
		};
	}

	pub fn toggle_lock(&mut self) -> bool {
		self.locked = !self.locked;
		if self.locked {
			self.gesture = Gesture::Idle;
		}
		self.locked
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

//! Focus-driven semantic zoom diagram.
//!
//! Renders a node-link diagram on an HTML canvas in which exactly one node
//! may be focused at a time:
//! - Clicking a node focuses it
//! - A slider sets the focused node's zoom; every other node shrinks in
//!   inverse proportion, down to a legibility floor
//! - Each node shows full, truncated or title-only content depending on its
//!   zoom factor
//! - Canvas pan/zoom, node dragging with grid snap, and edge creation by
//!   dragging between anchors
//!
//! # Example
//!
//! ```ignore
//! use zoom_flow::{DiagramData, DiagramNode, DiagramEdge, NodeContent, Position, ZoomFlow};
//!
//! let data = DiagramData {
//!     nodes: vec![
//!         DiagramNode::new("a", Position::new(0.0, 0.0), NodeContent::new("A", "First")),
//!         DiagramNode::new("b", Position::new(400.0, 0.0), NodeContent::new("B", "Second")),
//!     ],
//!     edges: vec![DiagramEdge::new("e-ab", "a", "b")],
//!     ..Default::default()
//! };
//!
//! view! { <ZoomFlow data=data fullscreen=true /> }
//! ```

mod component;
mod diagram;
mod flow;
mod render;
pub mod scale;
mod slider;
mod state;
pub mod theme;
mod tier;
mod types;
mod viewport;

pub use component::ZoomFlowCanvas;
pub use diagram::{diagram_or_sample, parse_diagram, sample_diagram};
pub use flow::ZoomFlow;
pub use slider::ZoomSlider;
pub use state::{DiagramState, NodeView, ZoomConfig};
pub use theme::Theme;
pub use tier::{DetailTier, NodeSlice, TierConfig, render_node};
pub use types::{
	AnchorSide, Connection, DiagramData, DiagramEdge, DiagramNode, NodeContent, Position,
};

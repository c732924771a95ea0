//! Top-level diagram component: owns the diagram state and composes the
//! canvas with the focus zoom slider.

use leptos::prelude::*;

use super::component::ZoomFlowCanvas;
use super::slider::ZoomSlider;
use super::state::DiagramState;
use super::theme::Theme;
use super::types::DiagramData;

/// A diagram whose nodes zoom around a single focused node.
///
/// Click a node to focus it, then use the slider to zoom it; every other node
/// shrinks in proportion and drops to a terser detail tier.
#[component]
pub fn ZoomFlow(
	data: DiagramData,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let diagram = RwSignal::new(DiagramState::new(data));

	view! {
		<ZoomFlowCanvas diagram=diagram theme=theme.unwrap_or_default() fullscreen=fullscreen />
		<ZoomSlider diagram=diagram />
	}
}

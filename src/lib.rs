//! zoom-flow: node-link diagram with focus-driven semantic zoom.
//!
//! This crate provides a WASM diagram component in which one node at a time
//! is focused and zoomed, while every other node shrinks and shows less of
//! its content.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::zoom_flow::{
	DiagramData, DiagramEdge, DiagramNode, DiagramState, NodeContent, Position, Theme, ZoomFlow,
};
use components::zoom_flow::diagram_or_sample;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("zoom-flow: logging initialized");
}

/// Read the diagram definition from a script element with id="diagram-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }. The element's
/// `data-theme` attribute picks the theme. Returns `(None, None)` when the
/// page has no such element.
fn load_diagram() -> (Option<String>, Option<Theme>) {
	let Some(element) = web_sys::window()
		.and_then(|w: Window| w.document())
		.and_then(|d| d.get_element_by_id("diagram-data"))
	else {
		return (None, None);
	};
	let theme = element
		.get_attribute("data-theme")
		.and_then(|name| Theme::by_name(&name));
	let json = match element.dyn_into::<HtmlScriptElement>() {
		Ok(script) => script.text().ok(),
		Err(_) => {
			warn!("zoom-flow: #diagram-data is not a script element");
			None
		}
	};
	// A present but unreadable element still counts as a broken definition.
	(Some(json.unwrap_or_default()), theme)
}

/// Main application component.
/// Loads the diagram from the DOM, falling back to the built-in sample.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (json, theme) = load_diagram();
	let data = diagram_or_sample(json.as_deref());
	let theme = theme.unwrap_or_default();
	let theme_name = theme.name;

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Contextual Zoom" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-flow">
			<ZoomFlow data=data theme=theme fullscreen=true />
		</div>
	}
}

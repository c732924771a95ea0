//! Focus zoom slider, shown only while a node is focused.

use leptos::prelude::*;
use log::warn;

use super::state::{DiagramState, ZoomConfig};

/// Ticks from `min_zoom` to `max_zoom` in `step` increments; every fifth
/// tick carries a label. An unusable policy has no ticks.
pub fn tick_labels(config: &ZoomConfig) -> Vec<Option<String>> {
	if !config.is_valid() {
		return Vec::new();
	}
	let count = ((config.max_zoom - config.min_zoom) / config.step).round() as usize + 1;
	(0..count)
		.map(|i| {
			(i % 5 == 0).then(|| format!("{:.1}", config.min_zoom + i as f64 * config.step))
		})
		.collect()
}

/// Parse slider input. Unparsable text becomes `NaN`, which the focus zoom
/// clamps to its lower bound.
pub fn parse_zoom_input(raw: &str) -> f64 {
	raw.trim().parse::<f64>().unwrap_or_else(|e| {
		warn!("zoom-flow: ignoring non-numeric zoom {raw:?}: {e}");
		f64::NAN
	})
}

/// Range input bound to the focused node's zoom.
#[component]
pub fn ZoomSlider(diagram: RwSignal<DiagramState>) -> impl IntoView {
	let config = diagram.with_untracked(|d| d.zoom_config().clone());
	let (min, max, step) = (config.min_zoom, config.max_zoom, config.step);
	let labels = tick_labels(&config);

	view! {
		<Show when=move || diagram.with(|d| d.focused_node_id().is_some())>
			<div class="zoom-controls">
				<label>"Focused:"</label>
				<input
					type="range"
					min=min.to_string()
					max=max.to_string()
					step=step.to_string()
					prop:value=move || diagram.with(|d| d.focus_zoom_input().to_string())
					on:input=move |ev| {
						let value = parse_zoom_input(&event_target_value(&ev));
						diagram.update(|d| {
							d.set_focus_zoom(value);
						});
					}
					class="zoom-slider"
				/>
				<div class="zoom-scale">
					{labels
						.clone()
						.into_iter()
						.map(|label| {
							view! {
								<div class="tick">
									{label.map(|l| view! { <span class="tick-label">{l}</span> })}
								</div>
							}
						})
						.collect_view()}
				</div>
			</div>
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ticks_cover_the_input_range() {
		let labels = tick_labels(&ZoomConfig::default());
		assert_eq!(labels.len(), 26);
		let shown: Vec<&str> = labels.iter().flatten().map(String::as_str).collect();
		assert_eq!(shown, vec!["0.5", "1.0", "1.5", "2.0", "2.5", "3.0"]);
	}

	#[test]
	fn unusable_policy_has_no_ticks() {
		let zero_step = ZoomConfig {
			step: 0.0,
			..ZoomConfig::default()
		};
		assert!(tick_labels(&zero_step).is_empty());
		let inverted = ZoomConfig {
			min_zoom: 4.0,
			..ZoomConfig::default()
		};
		assert!(tick_labels(&inverted).is_empty());
	}

	#[test]
	fn parses_slider_text() {
		assert_eq!(parse_zoom_input("1.7"), 1.7);
		assert_eq!(parse_zoom_input(" 2 "), 2.0);
		assert!(parse_zoom_input("wide").is_nan());
	}
}

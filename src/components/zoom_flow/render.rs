//! Canvas rendering for the diagram.
//!
//! Each frame lays out every node from its [`NodeSlice`], then draws in
//! passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, then the pending connection line (world space)
//! 3. Node surfaces, focused node last, then anchors on top
//!
//! The laid-out boxes are returned so hit testing in the next frame sees
//! exactly what was drawn.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::ScaledValues;
use super::state::{DiagramState, NodeView};
use super::theme::{NodeStyle, Theme};
use super::tier::{Border, NODE_ANCHORS, NodeSlice, render_node};
use super::types::AnchorSide;
use super::viewport::{CanvasView, Gesture, NodeBox, Rect, edge_curve};

/// A node ready to draw: its box plus wrapped text lines.
struct LaidOutNode {
	node_box: NodeBox,
	slice: NodeSlice,
	title_lines: Vec<String>,
	body_lines: Vec<String>,
	selected: bool,
}

/// Greedy word wrap. `measure` returns the rendered width of a string.
///
/// A single word wider than `max_width` gets a line of its own rather than
/// being split.
pub fn wrap_words(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		if current.is_empty() {
			current.push_str(word);
			continue;
		}
		let candidate = format!("{current} {word}");
		if measure(&candidate) <= max_width {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

fn wrap_text(ctx: &CanvasRenderingContext2d, font: &str, text: &str, max_width: f64) -> Vec<String> {
	ctx.set_font(font);
	wrap_words(text, max_width, |s| {
		ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
	})
}

fn layout_node(
	ctx: &CanvasRenderingContext2d,
	view: &NodeView<'_>,
	diagram: &DiagramState,
	style: &NodeStyle,
) -> LaidOutNode {
	let slice = render_node(view, diagram.tier_config());
	let inner = style.width - 2.0 * style.padding;
	let title_lines = wrap_text(ctx, &style.title_font, &slice.title, inner);
	let body_lines = slice
		.body
		.as_deref()
		.map(|body| wrap_text(ctx, &style.body_font, body, inner))
		.unwrap_or_default();

	let mut height = 2.0 * style.padding + title_lines.len() as f64 * style.title_line_height;
	if !body_lines.is_empty() {
		height += style.section_gap + body_lines.len() as f64 * style.body_line_height;
	}

	let position = view.node.position;
	LaidOutNode {
		node_box: NodeBox {
			id: view.node.id.clone(),
			bounds: Rect {
				x: position.x,
				y: position.y,
				w: style.width,
				h: height,
			},
			scale: slice.scale,
		},
		slice,
		title_lines,
		body_lines,
		selected: view.node.selected,
	}
}

/// Renders the complete diagram and returns the node boxes in draw order.
pub fn render(
	diagram: &DiagramState,
	view: &CanvasView,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) -> Vec<NodeBox> {
	let scale = view.scaled();

	// Focused node is drawn last so it sits on top.
	let mut views: Vec<NodeView<'_>> = diagram.node_views().collect();
	views.sort_by_key(|v| v.is_focused);
	let laid_out: Vec<LaidOutNode> = views
		.iter()
		.map(|v| layout_node(ctx, v, diagram, &theme.node))
		.collect();

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, view.width, view.height);

	ctx.save();
	let _ = ctx.translate(view.transform.x, view.transform.y);
	let _ = ctx.scale(view.transform.k, view.transform.k);

	draw_edges(diagram, view, ctx, theme, &scale, &laid_out);
	draw_pending_connection(view, ctx, theme, &scale, &laid_out);
	for node in &laid_out {
		draw_node(ctx, &theme.node, node);
	}
	for node in &laid_out {
		draw_anchors(ctx, theme, &scale, &node.node_box, view.locked);
	}

	ctx.restore();

	laid_out.into_iter().map(|n| n.node_box).collect()
}

fn find_box<'a>(laid_out: &'a [LaidOutNode], id: &str) -> Option<&'a NodeBox> {
	laid_out
		.iter()
		.map(|n| &n.node_box)
		.find(|b| b.id == id)
}

fn stroke_curve(ctx: &CanvasRenderingContext2d, curve: &[(f64, f64); 4]) {
	ctx.begin_path();
	ctx.move_to(curve[0].0, curve[0].1);
	ctx.bezier_curve_to(
		curve[1].0, curve[1].1, curve[2].0, curve[2].1, curve[3].0, curve[3].1,
	);
	ctx.stroke();
}

fn draw_edges(
	diagram: &DiagramState,
	view: &CanvasView,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	laid_out: &[LaidOutNode],
) {
	let style = &theme.edge;
	let dash_offset = -view.flow_time * style.flow_speed;

	for edge in diagram.edges() {
		// Edges naming unknown nodes are not drawn.
		let (Some(from), Some(to)) = (
			find_box(laid_out, &edge.source),
			find_box(laid_out, &edge.target),
		) else {
			continue;
		};
		let curve = edge_curve(
			from.anchor_point(AnchorSide::Right),
			to.anchor_point(AnchorSide::Left),
		);

		let color = if edge.selected {
			style.selected_color
		} else {
			style.color
		};
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(style.dash_pattern.0),
				&JsValue::from_f64(style.dash_pattern.1),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		stroke_curve(ctx, &curve);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_pending_connection(
	view: &CanvasView,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	laid_out: &[LaidOutNode],
) {
	let Gesture::Connecting { source_id, pointer } = &view.gesture else {
		return;
	};
	let Some(from) = find_box(laid_out, source_id) else {
		return;
	};

	ctx.set_stroke_style_str(&theme.edge.pending_color.to_css());
	ctx.set_line_width(scale.edge_width);
	stroke_curve(
		ctx,
		&edge_curve(from.anchor_point(AnchorSide::Right), *pointer),
	);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let radius = radius.min(r.w / 2.0).min(r.h / 2.0);
	let (right, bottom) = (r.x + r.w, r.y + r.h);
	ctx.begin_path();
	ctx.move_to(r.x + radius, r.y);
	let _ = ctx.arc_to(right, r.y, right, bottom, radius);
	let _ = ctx.arc_to(right, bottom, r.x, bottom, radius);
	let _ = ctx.arc_to(r.x, bottom, r.x, r.y, radius);
	let _ = ctx.arc_to(r.x, r.y, right, r.y, radius);
	ctx.close_path();
}

fn draw_node(ctx: &CanvasRenderingContext2d, style: &NodeStyle, node: &LaidOutNode) {
	let b = &node.node_box.bounds;
	let s = node.slice.scale;
	let (cx, cy) = (b.x + b.w / 2.0, b.y + b.h / 2.0);

	ctx.save();
	// Scale the surface about its centre; the box itself does not move.
	let _ = ctx.translate(cx, cy);
	let _ = ctx.scale(s, s);
	let _ = ctx.translate(-cx, -cy);

	if node.selected {
		let halo = Rect {
			x: b.x - 4.0,
			y: b.y - 4.0,
			w: b.w + 8.0,
			h: b.h + 8.0,
		};
		rounded_rect(ctx, &halo, style.corner_radius + 4.0);
		ctx.set_fill_style_str(&style.selected_outline.to_css());
		ctx.fill();
	}

	rounded_rect(ctx, b, style.corner_radius);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();
	let border = match node.slice.border {
		Border::Focused => style.border_focused,
		Border::Neutral => style.border_neutral,
	};
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(style.border_width);
	ctx.stroke();

	// Clip text to the box, like an overflow-hidden card.
	rounded_rect(ctx, b, style.corner_radius);
	ctx.clip();

	ctx.set_text_baseline("top");
	let x = b.x + style.padding;
	let mut y = b.y + style.padding;

	ctx.set_font(&style.title_font);
	ctx.set_fill_style_str(&style.title_color.to_css());
	for line in &node.title_lines {
		let _ = ctx.fill_text(line, x, y);
		y += style.title_line_height;
	}

	if !node.body_lines.is_empty() {
		y += style.section_gap;
		ctx.set_font(&style.body_font);
		ctx.set_fill_style_str(&style.body_color.to_css());
		for line in &node.body_lines {
			let _ = ctx.fill_text(line, x, y);
			y += style.body_line_height;
		}
	}

	ctx.restore();
}

fn draw_anchors(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	node_box: &NodeBox,
	locked: bool,
) {
	let fill = if locked {
		theme.anchor.fill.with_alpha(0.4)
	} else {
		theme.anchor.fill
	};
	for anchor in NODE_ANCHORS {
		let (x, y) = node_box.anchor_point(anchor.side);
		ctx.begin_path();
		let _ = ctx.arc(x, y, scale.anchor_radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&theme.anchor.stroke.to_css());
		ctx.set_line_width(scale.edge_width);
		ctx.stroke();
	}
}

#[cfg(test)]
mod tests {
	use super::wrap_words;

	fn chars(s: &str) -> f64 {
		s.chars().count() as f64
	}

	#[test]
	fn wraps_at_word_boundaries() {
		let lines = wrap_words("the quick brown fox jumps", 10.0, chars);
		assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
	}

	#[test]
	fn long_word_gets_own_line() {
		let lines = wrap_words("a supercalifragilistic b", 5.0, chars);
		assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
	}

	#[test]
	fn empty_text_has_no_lines() {
		assert!(wrap_words("", 100.0, chars).is_empty());
		assert!(wrap_words("   ", 100.0, chars).is_empty());
	}
}

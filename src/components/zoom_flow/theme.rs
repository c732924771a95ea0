//! Visual theming for the diagram.
//!
//! Colours, fonts and node box metrics used by the canvas renderer.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at another opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string for canvas styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node box style. Sizes are in unscaled world units.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Card background.
	pub fill: Color,
	/// Title text.
	pub title_color: Color,
	/// Body text.
	pub body_color: Color,
	/// Border of the focused node.
	pub border_focused: Color,
	/// Border of every other node.
	pub border_neutral: Color,
	/// Outline drawn around canvas-selected nodes.
	pub selected_outline: Color,
	/// Border stroke width.
	pub border_width: f64,
	/// Card corner radius.
	pub corner_radius: f64,
	/// Inner padding around the text.
	pub padding: f64,
	/// Fixed box width; height follows content.
	pub width: f64,
	/// CSS font for the title.
	pub title_font: String,
	/// Line advance for title lines.
	pub title_line_height: f64,
	/// CSS font for the body.
	pub body_font: String,
	/// Line advance for body lines.
	pub body_line_height: f64,
	/// Gap between title and body.
	pub section_gap: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Unselected edge stroke.
	pub color: Color,
	/// Selected edge stroke.
	pub selected_color: Color,
	/// Line used while dragging out a new connection.
	pub pending_color: Color,
	/// Dash pattern (dash, gap) for animated edges.
	pub dash_pattern: (f64, f64),
	/// Dash travel speed for animated edges, world units per second.
	pub flow_speed: f64,
}

/// Anchor dot style.
#[derive(Clone, Debug)]
pub struct AnchorStyle {
	/// Dot fill.
	pub fill: Color,
	/// Dot outline.
	pub stroke: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Name used in the page's `data-theme` attribute.
	pub name: &'static str,
	/// Canvas background.
	pub background: Color,
	/// Node cards.
	pub node: NodeStyle,
	/// Edges and the pending connection.
	pub edge: EdgeStyle,
	/// Anchor dots.
	pub anchor: AnchorStyle,
}

impl Theme {
	/// White cards with a blue focus border on a light pane.
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(250, 250, 250),
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				title_color: Color::rgb(20, 20, 20),
				body_color: Color::rgb(60, 60, 60),
				border_focused: Color::rgb(0, 0, 255),
				border_neutral: Color::rgb(0, 0, 0),
				selected_outline: Color::rgba(0, 0, 255, 0.25),
				border_width: 2.0,
				corner_radius: 5.0,
				padding: 10.0,
				width: 250.0,
				title_font: "bold 16px sans-serif".into(),
				title_line_height: 20.0,
				body_font: "14px sans-serif".into(),
				body_line_height: 18.0,
				section_gap: 8.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(177, 177, 183),
				selected_color: Color::rgb(85, 85, 85),
				pending_color: Color::rgb(120, 120, 130),
				dash_pattern: (5.0, 5.0),
				flow_speed: 20.0,
			},
			anchor: AnchorStyle {
				fill: Color::rgb(85, 85, 85),
				stroke: Color::rgb(255, 255, 255),
			},
		}
	}

	/// Dark pane variant.
	pub fn dark() -> Self {
		let light = Self::light();
		Self {
			name: "dark",
			background: Color::rgb(25, 28, 35),
			node: NodeStyle {
				fill: Color::rgb(38, 42, 52),
				title_color: Color::rgb(235, 238, 245),
				body_color: Color::rgb(180, 186, 200),
				border_focused: Color::rgb(100, 160, 255),
				border_neutral: Color::rgb(90, 96, 110),
				selected_outline: Color::rgba(100, 160, 255, 0.3),
				..light.node
			},
			edge: EdgeStyle {
				color: Color::rgb(110, 118, 135),
				selected_color: Color::rgb(200, 205, 215),
				pending_color: Color::rgb(150, 155, 170),
				..light.edge
			},
			anchor: AnchorStyle {
				fill: Color::rgb(180, 186, 200),
				stroke: Color::rgb(25, 28, 35),
			},
		}
	}

	/// Look a theme up by name, as used in the page's `data-theme` attribute.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"light" => Some(Self::light()),
			"dark" => Some(Self::dark()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(0, 0, 255).to_css(), "#0000ff");
		assert_eq!(
			Color::rgb(10, 20, 30).with_alpha(0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
	}

	#[test]
	fn focus_border_differs_from_neutral() {
		for theme in [Theme::light(), Theme::dark()] {
			assert_ne!(theme.node.border_focused, theme.node.border_neutral);
		}
	}

	#[test]
	fn lookup_by_name() {
		assert_eq!(Theme::by_name("dark").map(|t| t.name), Some("dark"));
		assert!(Theme::by_name("neon").is_none());
		assert_eq!(Theme::default().name, "light");
	}
}

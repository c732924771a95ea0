//! Canvas-zoom-dependent sizing for edges, anchors and hit targets.
//!
//! Two zoom levels are in play in this crate and they are unrelated: the
//! per-node semantic zoom factor (see `DiagramState`) and the canvas view
//! zoom `k` handled here. Everything in this module depends only on `k`.
//!
//! - [`ScaleBehavior::World`]: scales with the canvas like the nodes do.
//! - [`ScaleBehavior::Screen`]: constant pixel size at any `k`.
//! - [`ScaleBehavior::Clamped`]: world-space, but kept within pixel bounds.

/// Defines how a visual property scales with canvas zoom.
#[derive(Clone, Debug, PartialEq)]
#[allow(
	dead_code,
	reason = "World completes the API for callers customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size, in pixels.
		min_screen: f64,
		/// Largest on-screen size, in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value to draw with, after the canvas transform is applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Base sizes and how each one follows canvas zoom.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base edge stroke width.
	pub edge_width: f64,
	/// How edge width follows canvas zoom.
	pub edge_behavior: ScaleBehavior,
	/// Base anchor dot radius.
	pub anchor_radius: f64,
	/// How anchor radius follows canvas zoom.
	pub anchor_behavior: ScaleBehavior,
	/// Extra pick distance around anchors, in pixels.
	pub anchor_hit_slop: f64,
	/// Pick distance from an edge's curve, in pixels.
	pub edge_hit_tolerance: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			edge_width: 1.0,
			edge_behavior: ScaleBehavior::Clamped {
				min_screen: 1.0,
				max_screen: f64::INFINITY,
			},
			anchor_radius: 4.0,
			anchor_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: 8.0,
			},
			anchor_hit_slop: 6.0,
			edge_hit_tolerance: 6.0,
		}
	}
}

/// Scale values resolved for one canvas zoom level, in world units.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Edge stroke width.
	pub edge_width: f64,
	/// Anchor dot radius.
	pub anchor_radius: f64,
	/// Anchor pick radius, dot plus slop.
	pub anchor_hit_radius: f64,
	/// Edge pick distance.
	pub edge_hit_tolerance: f64,
}

impl ScaledValues {
	/// Resolve every size for canvas zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let anchor_radius = config.anchor_behavior.apply(config.anchor_radius, k);
		Self {
			edge_width: config.edge_behavior.apply(config.edge_width, k),
			anchor_radius,
			anchor_hit_radius: anchor_radius + ScaleBehavior::Screen.apply(config.anchor_hit_slop, k),
			edge_hit_tolerance: ScaleBehavior::Screen.apply(config.edge_hit_tolerance, k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn behaviors() {
		assert_eq!(ScaleBehavior::World.apply(4.0, 2.0), 4.0);
		assert_eq!(ScaleBehavior::Screen.apply(4.0, 2.0), 2.0);
		let clamped = ScaleBehavior::Clamped {
			min_screen: 3.0,
			max_screen: 8.0,
		};
		// 4 world units at k=0.5 is 2px on screen, raised to 3px.
		assert_eq!(clamped.apply(4.0, 0.5), 6.0);
		// 4 world units at k=4 is 16px on screen, capped at 8px.
		assert_eq!(clamped.apply(4.0, 4.0), 2.0);
		assert_eq!(clamped.apply(4.0, 1.0), 4.0);
	}

	#[test]
	fn hit_targets_stay_constant_on_screen() {
		let config = ScaleConfig::default();
		for k in [0.5, 1.0, 2.0] {
			let scaled = ScaledValues::new(&config, k);
			assert!((scaled.edge_hit_tolerance * k - config.edge_hit_tolerance).abs() < 1e-9);
		}
	}
}

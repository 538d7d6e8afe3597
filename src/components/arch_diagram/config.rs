//! Per-deployment geometry and interaction constants.
//!
//! Every diagram variant is a [`DiagramConfig`]; the engine never hard-codes
//! box sizes, bend fractions or tilt sensitivities.

use serde::Deserialize;

use super::types::{Rotation, Size};

pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 100.0;
pub const BEND_FRACTION: f64 = 0.7;
pub const CURVE_BIAS: f64 = 20.0;
pub const CURVE_LABEL_OFFSET: f64 = 10.0;

/// How the emitting and receiving sides of a connection are picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
	/// Exit along the dominant axis of the centre displacement (free placement).
	#[default]
	AxisDominant,
	/// Always exit horizontally (left-to-right column layouts).
	Columnar,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
	Straight,
	#[default]
	Orthogonal,
	Curved,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewpointConfig {
	pub base_x: f64,
	pub base_y: f64,
	pub sensitivity_x: f64,
	pub sensitivity_y: f64,
}

impl ViewpointConfig {
	pub fn base(&self) -> Rotation {
		Rotation::new(self.base_x, self.base_y)
	}
}

impl Default for ViewpointConfig {
	fn default() -> Self {
		Self {
			base_x: -10.0,
			base_y: 5.0,
			sensitivity_x: 8.0,
			sensitivity_y: 8.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
	/// Added to the clock on every tick.
	pub increment: f64,
	/// Wall-clock tick period.
	pub interval_ms: i32,
}

impl Default for ClockConfig {
	fn default() -> Self {
		Self {
			increment: 0.02,
			interval_ms: 16,
		}
	}
}

/// Configuration record for one deployment style.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
	pub node_size: Size,
	pub anchor_policy: AnchorPolicy,
	pub route_style: RouteStyle,
	/// Fraction of the dominant-axis distance travelled before the orthogonal bend.
	pub bend_fraction: f64,
	/// Perpendicular offset of the curved router's control points.
	pub curve_bias: f64,
	/// Curved labels sit this far above the straight-line midpoint.
	pub curve_label_offset: f64,
	pub viewpoint: ViewpointConfig,
	pub clock: ClockConfig,
}

impl DiagramConfig {
	/// Free placement: axis-dominant anchors with one orthogonal bend.
	pub fn axis_aligned() -> Self {
		Self {
			node_size: Size::new(NODE_WIDTH, NODE_HEIGHT),
			anchor_policy: AnchorPolicy::AxisDominant,
			route_style: RouteStyle::Orthogonal,
			bend_fraction: BEND_FRACTION,
			curve_bias: CURVE_BIAS,
			curve_label_offset: CURVE_LABEL_OFFSET,
			viewpoint: ViewpointConfig::default(),
			clock: ClockConfig::default(),
		}
	}

	/// Left/middle/right layouts: horizontal anchors with a soft S-bend.
	pub fn columnar() -> Self {
		Self {
			anchor_policy: AnchorPolicy::Columnar,
			route_style: RouteStyle::Curved,
			..Self::axis_aligned()
		}
	}
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self::axis_aligned()
	}
}

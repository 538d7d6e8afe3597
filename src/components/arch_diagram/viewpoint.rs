use super::config::ViewpointConfig;
use super::types::{Point, Rect, Rotation};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
	/// No pointer data yet; the rotation is the configured base tilt.
	Idle,
	/// Last normalized pointer offset.
	Tracking { offset: Point },
}

/// Maps pointer position over the diagram to a continuous scene tilt.
#[derive(Clone, Debug)]
pub struct ViewpointController {
	config: ViewpointConfig,
	phase: Phase,
	attached: bool,
}

impl ViewpointController {
	pub fn new(config: ViewpointConfig) -> Self {
		Self {
			config,
			phase: Phase::Idle,
			attached: true,
		}
	}

	/// Recomputes the tilt from scratch for every move; the latest event wins.
	pub fn on_pointer_move(&mut self, pointer: Point, bounds: &Rect) -> Rotation {
		if self.attached {
			if let Some(offset) = normalized_offset(pointer, bounds) {
				self.phase = Phase::Tracking { offset };
			}
		}
		self.rotation()
	}

	/// Resets to the base tilt and ignores every later pointer event.
	pub fn detach(&mut self) {
		self.attached = false;
		self.phase = Phase::Idle;
	}

	pub fn rotation(&self) -> Rotation {
		match self.phase {
			Phase::Idle => self.config.base(),
			Phase::Tracking { offset } => tilt(&self.config, offset),
		}
	}

	#[cfg(test)]
	pub fn phase(&self) -> Phase {
		self.phase
	}
}

/// Pointer offset from the centre of `bounds`, in units of its size.
///
/// Not clamped: a pointer outside the region yields magnitudes above 0.5.
/// Returns `None` for an empty region.
pub fn normalized_offset(pointer: Point, bounds: &Rect) -> Option<Point> {
	if bounds.size.width <= 0.0 || bounds.size.height <= 0.0 {
		return None;
	}
	let center = bounds.center();
	Some(Point::new(
		(pointer.x - center.x) / bounds.size.width,
		(pointer.y - center.y) / bounds.size.height,
	))
}

/// Vertical pointer offset tilts about the x axis, horizontal offset about the y axis.
pub fn tilt(config: &ViewpointConfig, offset: Point) -> Rotation {
	Rotation::new(
		config.base_x + offset.y * config.sensitivity_x,
		config.base_y + offset.x * config.sensitivity_y,
	)
}

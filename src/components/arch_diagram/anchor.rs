use super::config::AnchorPolicy;
use super::types::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	Left,
	Right,
	Top,
	Bottom,
}

impl Side {
	/// Midpoint of this side of `rect`.
	pub fn midpoint(self, rect: &Rect) -> Point {
		let center = rect.center();
		match self {
			Side::Left => Point::new(rect.left(), center.y),
			Side::Right => Point::new(rect.right(), center.y),
			Side::Top => Point::new(center.x, rect.top()),
			Side::Bottom => Point::new(center.x, rect.bottom()),
		}
	}

	pub fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
			Side::Top => Side::Bottom,
			Side::Bottom => Side::Top,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
	pub point: Point,
	pub side: Side,
}

/// Emitting anchor on the source box and receiving anchor on the target box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPair {
	pub start: Anchor,
	pub end: Anchor,
}

/// Picks the exit side of `source`; the target is always entered through the opposite side.
pub fn exit_side(source: &Rect, target: &Rect, policy: AnchorPolicy) -> Side {
	let (from, to) = (source.center(), target.center());
	let (dx, dy) = (to.x - from.x, to.y - from.y);

	let horizontal = match policy {
		AnchorPolicy::AxisDominant => dx.abs() > dy.abs(),
		AnchorPolicy::Columnar => true,
	};

	match (horizontal, dx > 0.0, dy > 0.0) {
		(true, true, _) => Side::Right,
		(true, false, _) => Side::Left,
		(false, _, true) => Side::Bottom,
		(false, _, false) => Side::Top,
	}
}

pub fn select_anchors(source: &Rect, target: &Rect, policy: AnchorPolicy) -> AnchorPair {
	let side = exit_side(source, target, policy);
	AnchorPair {
		start: Anchor {
			point: side.midpoint(source),
			side,
		},
		end: Anchor {
			point: side.opposite().midpoint(target),
			side: side.opposite(),
		},
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::components::arch_diagram::types::Size;

	fn node_at(x: f64, y: f64) -> Rect {
		Rect::new(Point::new(x, y), Size::new(160.0, 100.0))
	}

	#[rstest]
	#[case::right(300.0, 10.0, Side::Right)]
	#[case::left(-300.0, 10.0, Side::Left)]
	#[case::below(10.0, 300.0, Side::Bottom)]
	#[case::above(10.0, -300.0, Side::Top)]
	#[case::tie_down_right(200.0, 200.0, Side::Bottom)]
	#[case::tie_up_left(-200.0, -200.0, Side::Top)]
	#[case::tie_down_left(-200.0, 200.0, Side::Bottom)]
	fn axis_dominant_picks_larger_axis(#[case] dx: f64, #[case] dy: f64, #[case] expected: Side) {
		let source = node_at(400.0, 400.0);
		let target = node_at(400.0 + dx, 400.0 + dy);
		assert_eq!(exit_side(&source, &target, AnchorPolicy::AxisDominant), expected);
	}

	#[rstest]
	#[case::right_and_far_below(50.0, 600.0, Side::Right)]
	#[case::left_and_far_above(-50.0, -600.0, Side::Left)]
	#[case::straight_below(0.0, 300.0, Side::Left)]
	fn columnar_always_exits_horizontally(#[case] dx: f64, #[case] dy: f64, #[case] expected: Side) {
		let source = node_at(400.0, 400.0);
		let target = node_at(400.0 + dx, 400.0 + dy);
		assert_eq!(exit_side(&source, &target, AnchorPolicy::Columnar), expected);
	}

	#[test]
	fn anchors_sit_at_side_midpoints() {
		// elb -> ec2 in the web architecture
		let pair = select_anchors(&node_at(100.0, 250.0), &node_at(400.0, 250.0), AnchorPolicy::AxisDominant);
		assert_eq!(pair.start.point, Point::new(260.0, 300.0));
		assert_eq!(pair.end.point, Point::new(400.0, 300.0));
		assert_eq!(pair.end.side, Side::Left);
	}

	#[test]
	fn vertical_anchors_use_horizontal_center() {
		let pair = select_anchors(&node_at(0.0, 0.0), &node_at(20.0, 400.0), AnchorPolicy::AxisDominant);
		assert_eq!(pair.start, Anchor { point: Point::new(80.0, 100.0), side: Side::Bottom });
		assert_eq!(pair.end, Anchor { point: Point::new(100.0, 400.0), side: Side::Top });
	}

	#[test]
	fn upward_anchor_enters_target_bottom() {
		let pair = select_anchors(&node_at(0.0, 400.0), &node_at(0.0, 0.0), AnchorPolicy::AxisDominant);
		assert_eq!(pair.start.point, Point::new(80.0, 400.0));
		assert_eq!(pair.end.point, Point::new(80.0, 100.0));
	}
}

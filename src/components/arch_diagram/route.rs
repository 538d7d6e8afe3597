//! Path geometry between two anchors.
//!
//! Routing is pure: the same anchor pair and configuration always produce the
//! same [`RoutedPath`].

use super::anchor::AnchorPair;
use super::config::{DiagramConfig, RouteStyle};
use super::types::Point;

/// Samples used when flattening one quadratic segment.
const CURVE_SAMPLES: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
	MoveTo(Point),
	LineTo(Point),
	QuadTo { control: Point, to: Point },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoutedPath {
	pub commands: Vec<PathCommand>,
	/// Centre of the connection's label box.
	pub label_anchor: Point,
	/// `commands` as a polyline, quadratic segments sampled.
	points: Vec<Point>,
}

impl RoutedPath {
	pub fn new(commands: Vec<PathCommand>, label_anchor: Point) -> Self {
		let points = flatten(&commands);
		Self {
			commands,
			label_anchor,
			points,
		}
	}

	pub fn end(&self) -> Point {
		match self.commands.last() {
			Some(PathCommand::MoveTo(p) | PathCommand::LineTo(p)) => *p,
			Some(PathCommand::QuadTo { to, .. }) => *to,
			None => Point::default(),
		}
	}

	pub fn points(&self) -> &[Point] {
		&self.points
	}

	/// Point at fraction `t` of the path's arc length (clamped to `[0, 1]`).
	pub fn point_at(&self, t: f64) -> Point {
		point_along(&self.points, t)
	}

	/// Direction of travel on the last non-degenerate segment, as a unit vector.
	pub fn end_direction(&self) -> Point {
		let end = self.end();
		self.points
			.iter()
			.rev()
			.find(|p| p.distance(end) > f64::EPSILON)
			.map(|p| {
				let len = p.distance(end);
				Point::new((end.x - p.x) / len, (end.y - p.y) / len)
			})
			.unwrap_or(Point::new(1.0, 0.0))
	}
}

fn flatten(commands: &[PathCommand]) -> Vec<Point> {
	let mut points = Vec::new();
	let mut cursor = Point::default();
	for command in commands {
		match *command {
			PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
				points.push(p);
				cursor = p;
			}
			PathCommand::QuadTo { control, to } => {
				points.extend(
					(1..=CURVE_SAMPLES)
						.map(|i| quadratic(cursor, control, to, i as f64 / CURVE_SAMPLES as f64)),
				);
				cursor = to;
			}
		}
	}
	points
}

pub fn route(anchors: &AnchorPair, config: &DiagramConfig) -> RoutedPath {
	let (start, end) = (anchors.start.point, anchors.end.point);
	match config.route_style {
		RouteStyle::Straight => straight(start, end),
		RouteStyle::Orthogonal => orthogonal(start, end, config.bend_fraction),
		RouteStyle::Curved => curved(start, end, config.curve_bias, config.curve_label_offset),
	}
}

pub fn straight(start: Point, end: Point) -> RoutedPath {
	RoutedPath::new(
		vec![PathCommand::MoveTo(start), PathCommand::LineTo(end)],
		start.midpoint(end),
	)
}

/// One right-angle turn placed `bend_fraction` of the way along the dominant axis.
/// Ties between the axes travel vertically first.
pub fn orthogonal(start: Point, end: Point, bend_fraction: f64) -> RoutedPath {
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let (first, second) = if dx.abs() > dy.abs() {
		let bend_x = start.x + dx * bend_fraction;
		(Point::new(bend_x, start.y), Point::new(bend_x, end.y))
	} else {
		let bend_y = start.y + dy * bend_fraction;
		(Point::new(start.x, bend_y), Point::new(end.x, bend_y))
	};

	RoutedPath::new(
		vec![
			PathCommand::MoveTo(start),
			PathCommand::LineTo(first),
			PathCommand::LineTo(second),
			PathCommand::LineTo(end),
		],
		start.midpoint(end),
	)
}

/// Soft S-bend: two quadratic segments meeting at the straight-line midpoint,
/// with control points pushed `bias` pixels to either side of the line.
pub fn curved(start: Point, end: Point, bias: f64, label_offset: f64) -> RoutedPath {
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let len = dx.hypot(dy);
	let normal = if len > f64::EPSILON {
		Point::new(-dy / len * bias, dx / len * bias)
	} else {
		Point::default()
	};

	let mid = start.midpoint(end);
	let c1 = start.lerp(end, 0.25);
	let c2 = start.lerp(end, 0.75);

	RoutedPath::new(
		vec![
			PathCommand::MoveTo(start),
			PathCommand::QuadTo {
				control: Point::new(c1.x - normal.x, c1.y - normal.y),
				to: mid,
			},
			PathCommand::QuadTo {
				control: Point::new(c2.x + normal.x, c2.y + normal.y),
				to: end,
			},
		],
		Point::new(mid.x, mid.y - label_offset),
	)
}

fn quadratic(from: Point, control: Point, to: Point, t: f64) -> Point {
	let u = 1.0 - t;
	Point::new(
		u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
		u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
	)
}

pub fn point_along(points: &[Point], t: f64) -> Point {
	let Some(&first) = points.first() else {
		return Point::default();
	};
	let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
	if total <= f64::EPSILON {
		return first;
	}

	let mut remaining = total * t.clamp(0.0, 1.0);
	for w in points.windows(2) {
		let seg = w[0].distance(w[1]);
		if remaining <= seg {
			return if seg > 0.0 {
				w[0].lerp(w[1], remaining / seg)
			} else {
				w[0]
			};
		}
		remaining -= seg;
	}
	points[points.len() - 1]
}

pub fn distance_to_polyline(points: &[Point], p: Point) -> f64 {
	match points {
		[] => f64::INFINITY,
		[only] => only.distance(p),
		_ => points
			.windows(2)
			.map(|w| distance_to_segment(w[0], w[1], p))
			.fold(f64::INFINITY, f64::min),
	}
}

fn distance_to_segment(a: Point, b: Point, p: Point) -> f64 {
	let (abx, aby) = (b.x - a.x, b.y - a.y);
	let len_sq = abx * abx + aby * aby;
	if len_sq <= f64::EPSILON {
		return a.distance(p);
	}
	let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
	a.lerp(b, t).distance(p)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::components::arch_diagram::anchor::{Anchor, Side};

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-9
	}

	#[test]
	fn straight_label_is_mean_of_anchors() {
		let path = straight(Point::new(0.0, 0.0), Point::new(100.0, 40.0));
		assert_eq!(path.label_anchor, Point::new(50.0, 20.0));
		assert_eq!(path.points(), &[Point::new(0.0, 0.0), Point::new(100.0, 40.0)]);
	}

	#[test]
	fn orthogonal_bends_at_seventy_percent_horizontally() {
		let path = orthogonal(Point::new(560.0, 300.0), Point::new(700.0, 370.0), 0.7);
		assert!(close(path.commands[1].point(), Point::new(658.0, 300.0)));
		assert!(close(path.commands[2].point(), Point::new(658.0, 370.0)));
		assert_eq!(path.end(), Point::new(700.0, 370.0));
		assert_eq!(path.label_anchor, Point::new(630.0, 335.0));
	}

	#[test]
	fn orthogonal_bends_vertically_when_dy_dominates() {
		let path = orthogonal(Point::new(80.0, 100.0), Point::new(100.0, 300.0), 0.7);
		assert!(close(path.commands[1].point(), Point::new(80.0, 240.0)));
		assert!(close(path.commands[2].point(), Point::new(100.0, 240.0)));
	}

	#[test]
	fn orthogonal_tie_goes_vertical() {
		let path = orthogonal(Point::new(0.0, 0.0), Point::new(100.0, -100.0), 0.7);
		assert!(close(path.commands[1].point(), Point::new(0.0, -70.0)));
	}

	#[test]
	fn curved_passes_through_midpoint_and_lifts_label() {
		let path = curved(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 20.0, 10.0);
		let PathCommand::QuadTo { control, to } = path.commands[1] else {
			panic!("expected a quadratic segment");
		};
		assert_eq!(to, Point::new(100.0, 0.0));
		assert_eq!(control, Point::new(50.0, -20.0));
		let PathCommand::QuadTo { control, .. } = path.commands[2] else {
			panic!("expected a quadratic segment");
		};
		assert_eq!(control, Point::new(150.0, 20.0));
		assert_eq!(path.label_anchor, Point::new(100.0, -10.0));
	}

	#[test]
	fn curved_degenerate_anchors_do_not_produce_nan() {
		let p = Point::new(5.0, 5.0);
		let path = curved(p, p, 20.0, 10.0);
		assert!(path.points().iter().all(|q| q.x.is_finite() && q.y.is_finite()));
	}

	#[rstest]
	#[case::straight(RouteStyle::Straight)]
	#[case::orthogonal(RouteStyle::Orthogonal)]
	#[case::curved(RouteStyle::Curved)]
	fn every_style_connects_the_anchors(#[case] style: RouteStyle) {
		let anchors = AnchorPair {
			start: Anchor { point: Point::new(260.0, 300.0), side: Side::Right },
			end: Anchor { point: Point::new(700.0, 230.0), side: Side::Left },
		};
		let config = DiagramConfig { route_style: style, ..DiagramConfig::default() };

		let path = route(&anchors, &config);
		assert_eq!(path.points()[0], anchors.start.point);
		assert_eq!(path.end(), anchors.end.point);
		assert_eq!(path, route(&anchors, &config));
	}

	#[test]
	fn point_at_walks_arc_length() {
		let path = orthogonal(Point::new(0.0, 0.0), Point::new(100.0, 50.0), 0.5);
		// segments: 50 right, 50 down, 50 right
		assert!(close(path.point_at(0.0), Point::new(0.0, 0.0)));
		assert!(close(path.point_at(0.5), Point::new(50.0, 25.0)));
		assert!(close(path.point_at(1.0), Point::new(100.0, 50.0)));
		assert!(close(path.point_at(7.0), Point::new(100.0, 50.0)));
	}

	#[test]
	fn distance_is_measured_to_nearest_segment() {
		let path = orthogonal(Point::new(0.0, 0.0), Point::new(100.0, 50.0), 0.5);
		assert_eq!(distance_to_polyline(path.points(), Point::new(25.0, 4.0)), 4.0);
		assert_eq!(distance_to_polyline(path.points(), Point::new(53.0, 25.0)), 3.0);
	}

	#[test]
	fn curved_path_is_sampled_once_per_segment() {
		let path = curved(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 20.0, 10.0);
		assert_eq!(path.points().len(), 1 + 2 * CURVE_SAMPLES);
		assert_eq!(path.points()[CURVE_SAMPLES], Point::new(100.0, 0.0));
		assert!(close(path.point_at(1.0), Point::new(200.0, 0.0)));
	}

	#[test]
	fn end_direction_follows_last_segment() {
		let path = orthogonal(Point::new(0.0, 0.0), Point::new(0.0, 80.0), 0.7);
		assert_eq!(path.end_direction(), Point::new(0.0, 1.0));
	}

	impl PathCommand {
		fn point(&self) -> Point {
			match *self {
				PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
				PathCommand::QuadTo { to, .. } => to,
			}
		}
	}
}

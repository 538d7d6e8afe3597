use std::fmt;

use serde::Deserialize;

/// A point in planar layout space (pixels, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}

	pub fn midpoint(self, other: Point) -> Point {
		self.lerp(other, 0.5)
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Axis-aligned box; `origin` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub origin: Point,
	pub size: Size,
}

impl Rect {
	pub const fn new(origin: Point, size: Size) -> Self {
		Self { origin, size }
	}

	pub fn left(&self) -> f64 {
		self.origin.x
	}

	pub fn top(&self) -> f64 {
		self.origin.y
	}

	pub fn right(&self) -> f64 {
		self.origin.x + self.size.width
	}

	pub fn bottom(&self) -> f64 {
		self.origin.y + self.size.height
	}

	pub fn center(&self) -> Point {
		Point::new(
			self.origin.x + self.size.width / 2.0,
			self.origin.y + self.size.height / 2.0,
		)
	}

	/// The four corners, clockwise from top-left.
	pub fn corners(&self) -> [Point; 4] {
		[
			Point::new(self.left(), self.top()),
			Point::new(self.right(), self.top()),
			Point::new(self.right(), self.bottom()),
			Point::new(self.left(), self.bottom()),
		]
	}
}

/// Scene tilt in degrees: `x` rotates about the horizontal axis, `y` about the vertical one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
	pub x: f64,
	pub y: f64,
}

impl Rotation {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn scaled(self, factor: f64) -> Rotation {
		Rotation::new(self.x * factor, self.y * factor)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
	Sync,
	Async,
}

impl ConnectionKind {
	pub fn tag(&self) -> &'static str {
		match self {
			ConnectionKind::Sync => "SYNC",
			ConnectionKind::Async => "ASYNC",
		}
	}
}

/// Identity of a directed edge, `source->target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionKey(String);

impl ConnectionKey {
	pub fn new(source: &str, target: &str) -> Self {
		Self(format!("{source}->{target}"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ConnectionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A directed, labelled edge owned by its source node.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub source: String,
	pub target: String,
	pub label: String,
	pub kind: ConnectionKind,
	pub throughput: String,
}

impl Connection {
	pub fn key(&self) -> ConnectionKey {
		ConnectionKey::new(&self.source, &self.target)
	}
}

/// A positioned service instance. Immutable once its architecture is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	/// Key into the service catalog; validated at load.
	pub service: String,
	pub position: Point,
	pub elevation: Option<f64>,
	pub is_container: bool,
	pub container_size: Option<Size>,
	pub connections: Vec<Connection>,
}

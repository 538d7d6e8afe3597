use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::catalog::ServiceInfo;
use super::route::distance_to_polyline;
use super::state::{ConnectionDescriptor, ContainerDescriptor, DiagramState, NodeDescriptor};
use super::types::{ConnectionKey, ConnectionKind, Point, Rotation};

const PERSPECTIVE: f64 = 2000.0;
const NODE_PERSPECTIVE: f64 = 1000.0;
const CONNECTION_Z: f64 = 25.0;
const GRID_Z: f64 = -50.0;
const GRID_SPACING: f64 = 50.0;
/// Screen-space distance within which a pointer counts as over a connection.
pub const HIT_TOLERANCE: f64 = 6.0;
const LABEL_WIDTH: f64 = 120.0;
const LABEL_HEIGHT: f64 = 60.0;
const ARROW_SIZE: f64 = 12.0;
const PARTICLES_PER_PATH: usize = 3;
const PARTICLE_SPEED: f64 = 0.5;

const SYNC_COLOR: &str = "#3b82f6";
const ASYNC_COLOR: &str = "#10b981";

/// Rotates planar points at a given elevation about `origin` and applies perspective.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
	sin_x: f64,
	cos_x: f64,
	sin_y: f64,
	cos_y: f64,
	origin: Point,
	perspective: f64,
}

impl Projection {
	/// Whole-scene projection centred on a `width` x `height` canvas.
	pub fn new(rotation: Rotation, width: f64, height: f64) -> Self {
		Self::about(rotation, Point::new(width / 2.0, height / 2.0), PERSPECTIVE)
	}

	pub fn about(rotation: Rotation, origin: Point, perspective: f64) -> Self {
		let (sin_x, cos_x) = rotation.x.to_radians().sin_cos();
		let (sin_y, cos_y) = rotation.y.to_radians().sin_cos();
		Self {
			sin_x,
			cos_x,
			sin_y,
			cos_y,
			origin,
			perspective,
		}
	}

	/// `z` grows towards the viewer.
	pub fn project(&self, p: Point, z: f64) -> Point {
		let (x, y) = (p.x - self.origin.x, p.y - self.origin.y);
		// rotateY, then rotateX
		let x1 = x * self.cos_y + z * self.sin_y;
		let z1 = -x * self.sin_y + z * self.cos_y;
		let y2 = y * self.cos_x - z1 * self.sin_x;
		let z2 = y * self.sin_x + z1 * self.cos_x;
		let scale = self.perspective / (self.perspective - z2);
		Point::new(self.origin.x + x1 * scale, self.origin.y + y2 * scale)
	}
}

fn kind_color(kind: ConnectionKind) -> &'static str {
	match kind {
		ConnectionKind::Sync => SYNC_COLOR,
		ConnectionKind::Async => ASYNC_COLOR,
	}
}

/// Connection paths in canvas coordinates, in paint order.
#[derive(Clone, Debug, Default)]
pub struct HitMap {
	paths: Vec<(ConnectionKey, Vec<Point>)>,
}

impl HitMap {
	pub fn new(connections: &[ConnectionDescriptor], projection: &Projection) -> Self {
		let paths = connections
			.iter()
			.map(|c| {
				let points = c
					.path
					.points()
					.iter()
					.map(|&p| projection.project(p, CONNECTION_Z))
					.collect();
				(c.key.clone(), points)
			})
			.collect();
		Self { paths }
	}

	/// Topmost connection under the canvas point `(x, y)`.
	pub fn connection_at(&self, x: f64, y: f64) -> Option<ConnectionKey> {
		let cursor = Point::new(x, y);
		self.paths
			.iter()
			.rev()
			.find(|(_, points)| distance_to_polyline(points, cursor) <= HIT_TOLERANCE)
			.map(|(key, _)| key.clone())
	}
}

/// Draws one frame and returns where its connections ended up on screen.
pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) -> HitMap {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let projection = Projection::new(state.viewpoint_transform(), state.width, state.height);
	draw_grid(state, &projection, ctx);

	if let Some(container) = state.container_descriptor() {
		if let Some(info) = state.services().get(&container.style_key) {
			draw_container(&container, info, &projection, ctx);
		}
	}

	let connections = state.connection_descriptors();
	let hits = HitMap::new(&connections, &projection);
	for (connection, (_, points)) in connections.iter().zip(&hits.paths) {
		draw_connection(connection, points, ctx);
	}
	draw_particles(state.clock_time(), &connections, &projection, ctx);
	for connection in &connections {
		draw_label(connection, &projection, ctx);
	}

	for node in state.node_descriptors() {
		if let Some(info) = state.services().get(&node.style_key) {
			draw_node(&node, info, &projection, ctx);
		}
	}
	hits
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[Point]) {
	ctx.begin_path();
	if let Some((first, rest)) = points.split_first() {
		ctx.move_to(first.x, first.y);
		for p in rest {
			ctx.line_to(p.x, p.y);
		}
	}
}

fn draw_grid(state: &DiagramState, projection: &Projection, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str("rgba(71, 85, 105, 0.3)");
	ctx.set_line_width(1.0);

	let (w, h) = (state.width, state.height);
	let columns = (w / GRID_SPACING).ceil() as usize;
	let rows = (h / GRID_SPACING).ceil() as usize;
	for i in 0..=columns {
		let x = i as f64 * GRID_SPACING;
		trace(ctx, &[
			projection.project(Point::new(x, 0.0), GRID_Z),
			projection.project(Point::new(x, h), GRID_Z),
		]);
		ctx.stroke();
	}
	for j in 0..=rows {
		let y = j as f64 * GRID_SPACING;
		trace(ctx, &[
			projection.project(Point::new(0.0, y), GRID_Z),
			projection.project(Point::new(w, y), GRID_Z),
		]);
		ctx.stroke();
	}
}

fn draw_container(
	container: &ContainerDescriptor,
	info: &ServiceInfo,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
) {
	let corners = container
		.rect
		.corners()
		.map(|c| projection.project(c, container.elevation));

	trace(ctx, &corners);
	ctx.close_path();
	ctx.set_fill_style_str("rgba(34, 197, 94, 0.1)");
	ctx.fill();
	ctx.set_stroke_style_str("#4ade80");
	ctx.set_line_width(2.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(8.0),
		&JsValue::from_f64(6.0),
	));
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let tag = projection.project(
		Point::new(container.rect.left() + 16.0, container.rect.top() - 20.0),
		container.elevation + 10.0,
	);
	ctx.set_fill_style_str("#16a34a");
	ctx.fill_rect(tag.x, tag.y - 16.0, 240.0, 32.0);
	ctx.set_fill_style_str("white");
	ctx.set_font("600 13px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&format!("{} {}", info.icon, info.label), tag.x + 12.0, tag.y);
}

fn draw_connection(
	connection: &ConnectionDescriptor,
	points: &[Point],
	ctx: &CanvasRenderingContext2d,
) {
	let color = kind_color(connection.kind);
	let Some(&tip) = points.last() else {
		return;
	};

	ctx.save();
	ctx.set_global_alpha(connection.opacity());
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(connection.stroke_width());
	ctx.set_line_cap("round");
	ctx.set_line_join("round");
	if connection.active {
		ctx.set_shadow_color(color);
		ctx.set_shadow_blur(6.0);
	}
	if connection.kind == ConnectionKind::Async {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(12.0),
			&JsValue::from_f64(6.0),
		));
	}
	trace(ctx, points);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let dir = connection.path.end_direction();
	let back = Point::new(tip.x - dir.x * ARROW_SIZE, tip.y - dir.y * ARROW_SIZE);
	let (px, py) = (-dir.y * ARROW_SIZE * 0.5, dir.x * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	trace(ctx, &[
		tip,
		Point::new(back.x + px, back.y + py),
		Point::new(back.x - px, back.y - py),
	]);
	ctx.close_path();
	ctx.fill();
	ctx.restore();
}

fn draw_particles(
	time: f64,
	connections: &[ConnectionDescriptor],
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
) {
	for connection in connections {
		ctx.set_fill_style_str(kind_color(connection.kind));
		for i in 0..PARTICLES_PER_PATH {
			let t = (time * PARTICLE_SPEED + i as f64 / PARTICLES_PER_PATH as f64).fract();
			let p = projection.project(connection.path.point_at(t), CONNECTION_Z);
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, 3.0, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

fn draw_label(
	connection: &ConnectionDescriptor,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
) {
	let color = kind_color(connection.kind);
	let center = projection.project(connection.label_anchor, CONNECTION_Z);
	let (x, y) = (center.x - LABEL_WIDTH / 2.0, center.y - LABEL_HEIGHT / 2.0);

	ctx.set_fill_style_str("rgba(15, 23, 42, 0.95)");
	ctx.fill_rect(x, y, LABEL_WIDTH, LABEL_HEIGHT);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(if connection.active { 3.0 } else { 2.0 });
	ctx.stroke_rect(x, y, LABEL_WIDTH, LABEL_HEIGHT);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str("white");
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(&connection.label, center.x, center.y - 14.0);
	ctx.set_fill_style_str("#cbd5e1");
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&connection.throughput, center.x, center.y);
	ctx.set_fill_style_str(color);
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(connection.kind.tag(), center.x, center.y + 14.0);
}

fn draw_node(
	node: &NodeDescriptor,
	info: &ServiceInfo,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
) {
	let local = Projection::about(node.tilt, node.rect.center(), NODE_PERSPECTIVE);
	let corners = node
		.rect
		.corners()
		.map(|c| projection.project(local.project(c, 0.0), node.elevation));
	let center = projection.project(node.rect.center(), node.elevation);

	ctx.save();
	ctx.set_shadow_color(info.shadow);
	ctx.set_shadow_blur(node.elevation);
	ctx.set_shadow_offset_y(node.elevation / 2.0);
	let gradient = ctx.create_linear_gradient(corners[0].x, corners[0].y, corners[2].x, corners[2].y);
	let _ = gradient.add_color_stop(0.0, info.fill[0]);
	let _ = gradient.add_color_stop(1.0, info.fill[1]);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	trace(ctx, &corners);
	ctx.close_path();
	ctx.fill();
	ctx.restore();

	ctx.set_stroke_style_str(info.color);
	ctx.set_line_width(2.0);
	trace(ctx, &corners);
	ctx.close_path();
	ctx.stroke();
	ctx.set_line_width(6.0);
	trace(ctx, &[corners[0], corners[3]]);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("26px sans-serif");
	let _ = ctx.fill_text(info.icon, center.x, center.y - 22.0);
	ctx.set_fill_style_str("#1f2937");
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(info.label, center.x, center.y + 8.0);
	ctx.set_fill_style_str(info.color);
	ctx.set_font("600 11px sans-serif");
	let _ = ctx.fill_text(info.category, center.x, center.y + 28.0);

	let badge = corners[1];
	ctx.set_font("bold 10px sans-serif");
	ctx.set_text_align("right");
	let _ = ctx.fill_text(&format!("Z:{}", node.elevation), badge.x - 6.0, badge.y + 10.0);

	if node.outgoing > 0 {
		ctx.set_fill_style_str(SYNC_COLOR);
		ctx.begin_path();
		let _ = ctx.arc(badge.x + 2.0, badge.y - 2.0, 10.0, 0.0, 2.0 * PI);
		ctx.fill();
		ctx.set_fill_style_str("white");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&node.outgoing.to_string(), badge.x + 2.0, badge.y - 2.0);
	}
}

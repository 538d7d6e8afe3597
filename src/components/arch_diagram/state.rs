use log::info;

use super::anchor::select_anchors;
use super::catalog::{ArchitectureCatalog, ServiceCatalog};
use super::clock::AnimationClock;
use super::config::DiagramConfig;
use super::depth::{effective_elevation, paint_order, stacking_index, summary_order};
use super::graph::{GraphModel, LoadError};
use super::highlight::HighlightState;
use super::route::{RoutedPath, route};
use super::types::{ConnectionKey, ConnectionKind, Node, Point, Rect, Rotation};
use super::viewpoint::ViewpointController;

pub const ACTIVE_STROKE_WIDTH: f64 = 5.0;
pub const IDLE_STROKE_WIDTH: f64 = 3.0;
pub const ACTIVE_OPACITY: f64 = 1.0;
pub const IDLE_OPACITY: f64 = 0.8;
/// Share of the scene tilt each node box adds on its own.
pub const NODE_TILT_FACTOR: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
	pub id: String,
	pub style_key: String,
	pub rect: Rect,
	pub elevation: f64,
	pub stacking_index: i32,
	pub outgoing: usize,
	pub tilt: Rotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerDescriptor {
	pub id: String,
	pub style_key: String,
	pub rect: Rect,
	pub elevation: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionDescriptor {
	pub key: ConnectionKey,
	pub kind: ConnectionKind,
	pub label: String,
	pub throughput: String,
	pub path: RoutedPath,
	pub label_anchor: Point,
	pub active: bool,
}

impl ConnectionDescriptor {
	pub fn stroke_width(&self) -> f64 {
		if self.active {
			ACTIVE_STROKE_WIDTH
		} else {
			IDLE_STROKE_WIDTH
		}
	}

	pub fn opacity(&self) -> f64 {
		if self.active { ACTIVE_OPACITY } else { IDLE_OPACITY }
	}
}

/// What the page chrome shows next to the diagram, taken from the graph the
/// engine is actually drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
	pub name: String,
	pub title: String,
	pub description: String,
	pub flow_description: String,
	/// Non-container nodes, front to back.
	pub summary: Vec<NodeDescriptor>,
	pub dangling: Vec<ConnectionKey>,
}

/// Engine instance: owns the active graph and all interaction state.
///
/// Every transition is synchronous and a total overwrite of the state it
/// touches. After [`DiagramState::teardown`] pointer, tick and hover events
/// are ignored.
pub struct DiagramState {
	pub config: DiagramConfig,
	pub width: f64,
	pub height: f64,
	services: ServiceCatalog,
	catalog: ArchitectureCatalog,
	graph: GraphModel,
	viewpoint: ViewpointController,
	highlight: HighlightState,
	clock: AnimationClock,
	mounted: bool,
}

impl DiagramState {
	pub fn new(
		catalog: ArchitectureCatalog,
		services: ServiceCatalog,
		config: DiagramConfig,
		architecture: &str,
	) -> Result<Self, LoadError> {
		let graph = load_graph(&catalog, &services, architecture)?;
		info!("diagram mounted with {}", graph.name);

		Ok(Self {
			viewpoint: ViewpointController::new(config.viewpoint),
			clock: AnimationClock::new(&config.clock),
			highlight: HighlightState::default(),
			config,
			width: 0.0,
			height: 0.0,
			services,
			catalog,
			graph,
			mounted: true,
		})
	}

	/// Swaps the whole graph. On error the current graph stays in place.
	///
	/// The highlight is cleared: keys are only unique within one graph.
	pub fn select_architecture(&mut self, name: &str) -> Result<(), LoadError> {
		if self.graph.name == name {
			return Ok(());
		}
		let graph = load_graph(&self.catalog, &self.services, name)?;
		info!("switching architecture {} -> {}", self.graph.name, graph.name);
		self.graph = graph;
		self.highlight.reset();
		Ok(())
	}

	pub fn on_pointer_move(&mut self, pointer: Point, bounds: &Rect) {
		if self.mounted {
			self.viewpoint.on_pointer_move(pointer, bounds);
		}
	}

	pub fn on_tick(&mut self) {
		if self.mounted {
			self.clock.tick();
		}
	}

	pub fn on_hover_enter(&mut self, key: ConnectionKey) {
		if self.mounted {
			self.highlight.activate(key);
		}
	}

	pub fn on_hover_leave(&mut self, key: &ConnectionKey) {
		if self.mounted {
			self.highlight.clear(key);
		}
	}

	/// Moves the hover to whatever connection is under the pointer now: leave
	/// for the previous one, then enter for `hit`. Returns whether anything changed.
	pub fn on_hover_at(&mut self, hit: Option<ConnectionKey>) -> bool {
		if !self.mounted {
			return false;
		}
		let previous = self.highlight.active().cloned();
		if previous == hit {
			return false;
		}
		if let Some(previous) = previous {
			self.on_hover_leave(&previous);
		}
		if let Some(key) = hit {
			self.on_hover_enter(key);
		}
		true
	}

	/// Swaps the layout configuration. The viewpoint and clock restart only
	/// when their own settings differ; the tick interval is read once at mount.
	pub fn reconfigure(&mut self, config: DiagramConfig) {
		if config == self.config || !self.mounted {
			return;
		}
		info!(
			"diagram layout {:?}/{:?}",
			config.anchor_policy, config.route_style
		);
		if config.viewpoint != self.config.viewpoint {
			self.viewpoint = ViewpointController::new(config.viewpoint);
		}
		if config.clock != self.config.clock {
			self.clock = AnimationClock::new(&config.clock);
		}
		self.config = config;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Resets interaction state to defaults and stops reacting to events.
	pub fn teardown(&mut self) {
		if !self.mounted {
			return;
		}
		info!("diagram torn down");
		self.mounted = false;
		self.viewpoint.detach();
		self.clock.stop();
		self.highlight.reset();
	}

	#[cfg(test)]
	pub fn is_mounted(&self) -> bool {
		self.mounted
	}

	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	pub fn services(&self) -> &ServiceCatalog {
		&self.services
	}

	pub fn viewpoint_transform(&self) -> Rotation {
		self.viewpoint.rotation()
	}

	#[cfg(test)]
	pub fn highlighted(&self) -> Option<&ConnectionKey> {
		self.highlight.active()
	}

	pub fn clock_time(&self) -> f64 {
		self.clock.time()
	}

	pub fn node_rect(&self, node: &Node) -> Rect {
		Rect::new(node.position, self.config.node_size)
	}

	/// Non-container nodes in paint order (back to front).
	pub fn node_descriptors(&self) -> Vec<NodeDescriptor> {
		paint_order(self.graph.non_container_nodes(), &self.services)
			.into_iter()
			.map(|n| self.describe_node(n))
			.collect()
	}

	/// Non-container nodes front to back, for the component summary.
	pub fn summary(&self) -> Vec<NodeDescriptor> {
		summary_order(self.graph.non_container_nodes(), &self.services)
			.into_iter()
			.map(|n| self.describe_node(n))
			.collect()
	}

	pub fn overview(&self) -> Overview {
		Overview {
			name: self.graph.name.clone(),
			title: self.graph.title.clone(),
			description: self.graph.description.clone(),
			flow_description: self.graph.flow_description.clone(),
			summary: self.summary(),
			dangling: self.graph.dangling().to_vec(),
		}
	}

	pub fn container_descriptor(&self) -> Option<ContainerDescriptor> {
		let node = self.graph.container_node()?;
		let size = node.container_size?;
		Some(ContainerDescriptor {
			id: node.id.clone(),
			style_key: node.service.clone(),
			rect: Rect::new(node.position, size),
			elevation: effective_elevation(node, &self.services),
		})
	}

	/// Routed geometry for every connection whose target resolves.
	pub fn connection_descriptors(&self) -> Vec<ConnectionDescriptor> {
		self.graph
			.edges()
			.map(|(source, connection, target)| {
				let anchors = select_anchors(
					&self.node_rect(source),
					&self.node_rect(target),
					self.config.anchor_policy,
				);
				let path = route(&anchors, &self.config);
				let key = connection.key();
				ConnectionDescriptor {
					active: self.highlight.is_active(&key),
					key,
					kind: connection.kind,
					label: connection.label.clone(),
					throughput: connection.throughput.clone(),
					label_anchor: path.label_anchor,
					path,
				}
			})
			.collect()
	}

	fn describe_node(&self, node: &Node) -> NodeDescriptor {
		let elevation = effective_elevation(node, &self.services);
		NodeDescriptor {
			id: node.id.clone(),
			style_key: node.service.clone(),
			rect: self.node_rect(node),
			elevation,
			stacking_index: stacking_index(elevation),
			outgoing: self.graph.outgoing_connections(&node.id).len(),
			tilt: self.viewpoint.rotation().scaled(NODE_TILT_FACTOR),
		}
	}
}

fn load_graph(
	catalog: &ArchitectureCatalog,
	services: &ServiceCatalog,
	name: &str,
) -> Result<GraphModel, LoadError> {
	let spec = catalog
		.get(name)
		.ok_or_else(|| LoadError::UnknownArchitecture { name: name.to_string() })?;
	GraphModel::load(spec, services)
}

use std::collections::HashMap;

use log::warn;
use thiserror::Error;

use super::catalog::{ArchitectureSpec, ServiceCatalog};
use super::types::{Connection, ConnectionKey, Node};

#[derive(Debug, Error)]
pub enum LoadError {
	#[error("node `{node}` uses unknown service type `{service}`")]
	UnknownServiceType { node: String, service: String },
	#[error("node id `{id}` is declared more than once")]
	DuplicateNodeId { id: String },
	#[error("no architecture named `{name}`")]
	UnknownArchitecture { name: String },
	#[error("invalid architecture catalog: {0}")]
	Catalog(#[from] serde_json::Error),
}

/// Nodes and their outgoing connections for one architecture.
///
/// Connections whose target does not resolve stay attached to their source
/// node but are never yielded by [`GraphModel::edges`]; their keys are
/// collected in [`GraphModel::dangling`] at load time.
#[derive(Clone, Debug)]
pub struct GraphModel {
	pub name: String,
	pub title: String,
	pub description: String,
	pub flow_description: String,
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	dangling: Vec<ConnectionKey>,
}

impl GraphModel {
	pub fn load(spec: &ArchitectureSpec, services: &ServiceCatalog) -> Result<Self, LoadError> {
		let mut nodes = Vec::with_capacity(spec.nodes.len());
		let mut index = HashMap::with_capacity(spec.nodes.len());

		for node in &spec.nodes {
			if !services.contains(&node.service) {
				return Err(LoadError::UnknownServiceType {
					node: node.id.clone(),
					service: node.service.clone(),
				});
			}
			if index.insert(node.id.clone(), nodes.len()).is_some() {
				return Err(LoadError::DuplicateNodeId { id: node.id.clone() });
			}

			let connections = node
				.connections
				.iter()
				.map(|c| Connection {
					source: node.id.clone(),
					target: c.to.clone(),
					label: c.label.clone(),
					kind: c.kind,
					throughput: c.throughput.clone(),
				})
				.collect();

			nodes.push(Node {
				id: node.id.clone(),
				service: node.service.clone(),
				position: node.position,
				elevation: node.elevation,
				is_container: node.container,
				container_size: node.size,
				connections,
			});
		}

		let dangling: Vec<ConnectionKey> = nodes
			.iter()
			.flat_map(|n| &n.connections)
			.filter(|c| !index.contains_key(&c.target))
			.map(Connection::key)
			.collect();
		for key in &dangling {
			warn!("{}: dropping connection {key}, target not found", spec.name);
		}

		Ok(Self {
			name: spec.name.clone(),
			title: spec.title.clone(),
			description: spec.description.clone(),
			flow_description: spec.flow_description.clone(),
			nodes,
			index,
			dangling,
		})
	}

	pub fn resolve(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Every authored connection of `id`, including ones with a dangling target.
	pub fn outgoing_connections(&self, id: &str) -> &[Connection] {
		self.resolve(id)
			.map(|n| n.connections.as_slice())
			.unwrap_or_default()
	}

	#[cfg(test)]
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn non_container_nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter().filter(|n| !n.is_container)
	}

	pub fn container_node(&self) -> Option<&Node> {
		self.nodes.iter().find(|n| n.is_container)
	}

	/// Renderable edges in declaration order: `(source, connection, target)`.
	pub fn edges(&self) -> impl Iterator<Item = (&Node, &Connection, &Node)> {
		self.non_container_nodes().flat_map(move |source| {
			source
				.connections
				.iter()
				.filter_map(move |c| self.resolve(&c.target).map(|target| (source, c, target)))
		})
	}

	pub fn dangling(&self) -> &[ConnectionKey] {
		&self.dangling
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::catalog::ArchitectureCatalog;

	fn load(json: &str) -> Result<GraphModel, LoadError> {
		let catalog = ArchitectureCatalog::from_json(json)?;
		GraphModel::load(catalog.first().unwrap(), &ServiceCatalog::builtin())
	}

	const DANGLING: &str = r#"{ "architectures": [{ "name": "dangling", "title": "t", "nodes": [
		{ "id": "a", "service": "EC2", "position": { "x": 0, "y": 0 },
		  "connections": [
			{ "to": "z", "label": "gone", "kind": "sync" },
			{ "to": "b", "label": "ok", "kind": "async" }
		  ] },
		{ "id": "b", "service": "S3", "position": { "x": 300, "y": 0 } }
	] }] }"#;

	#[test]
	fn resolves_nodes_by_id() {
		let catalog = ArchitectureCatalog::builtin().unwrap();
		let graph = GraphModel::load(catalog.get("App A").unwrap(), &ServiceCatalog::builtin()).unwrap();

		assert_eq!(graph.resolve("ec2").unwrap().service, "EC2");
		assert!(graph.resolve("lambda").is_none());
		assert_eq!(graph.outgoing_connections("ec2").len(), 2);
		assert!(graph.outgoing_connections("missing").is_empty());
	}

	#[test]
	fn container_is_separated_from_services() {
		let catalog = ArchitectureCatalog::builtin().unwrap();
		let graph = GraphModel::load(catalog.get("App B").unwrap(), &ServiceCatalog::builtin()).unwrap();

		assert_eq!(graph.container_node().unwrap().id, "vpc");
		let ids: Vec<_> = graph.non_container_nodes().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["api", "lambda", "cloudwatch", "s3"]);
	}

	#[test]
	fn missing_container_is_tolerated() {
		let graph = load(DANGLING).unwrap();
		assert!(graph.container_node().is_none());
	}

	// Soft-fail: a dangling target is kept on its source but never becomes an edge.
	#[test]
	fn dangling_target_is_pruned_not_an_error() {
		let graph = load(DANGLING).unwrap();

		assert_eq!(graph.outgoing_connections("a").len(), 2);
		assert_eq!(graph.dangling(), [ConnectionKey::new("a", "z")]);

		let edges: Vec<_> = graph.edges().map(|(_, c, _)| c.key()).collect();
		assert_eq!(edges, [ConnectionKey::new("a", "b")]);
	}

	#[test]
	fn edges_follow_declaration_order() {
		let catalog = ArchitectureCatalog::builtin().unwrap();
		let graph = GraphModel::load(catalog.get("App A").unwrap(), &ServiceCatalog::builtin()).unwrap();

		let keys: Vec<_> = graph.edges().map(|(_, c, _)| c.key().to_string()).collect();
		assert_eq!(keys, ["elb->ec2", "ec2->rds", "ec2->s3"]);
		assert!(graph.dangling().is_empty());
	}

	#[test]
	fn unknown_service_type_fails_at_load() {
		let json = r#"{ "architectures": [{ "name": "x", "title": "x", "nodes": [
			{ "id": "cache", "service": "Redis", "position": { "x": 0, "y": 0 } }
		] }] }"#;

		match load(json) {
			Err(LoadError::UnknownServiceType { node, service }) => {
				assert_eq!(node, "cache");
				assert_eq!(service, "Redis");
			}
			other => panic!("expected UnknownServiceType, got {other:?}"),
		}
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let json = r#"{ "architectures": [{ "name": "x", "title": "x", "nodes": [
			{ "id": "a", "service": "EC2", "position": { "x": 0, "y": 0 } },
			{ "id": "a", "service": "S3", "position": { "x": 10, "y": 0 } }
		] }] }"#;

		assert!(matches!(load(json), Err(LoadError::DuplicateNodeId { id }) if id == "a"));
	}
}

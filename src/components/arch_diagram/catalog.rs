use std::collections::HashMap;

use serde::Deserialize;

use super::graph::LoadError;
use super::types::{ConnectionKind, Point, Size};

const BUILTIN_ARCHITECTURES: &str = include_str!("../../../assets/architectures.json");

/// Display metadata and default elevation for one service type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServiceInfo {
	pub label: &'static str,
	pub category: &'static str,
	pub icon: &'static str,
	pub color: &'static str,
	pub shadow: &'static str,
	pub fill: [&'static str; 2],
	pub depth: f64,
}

impl ServiceInfo {
	/// An entry with neutral styling.
	#[cfg(test)]
	pub const fn plain(label: &'static str, category: &'static str, depth: f64) -> Self {
		Self {
			label,
			category,
			icon: "□",
			color: "#94A3B8",
			shadow: "rgba(148, 163, 184, 0.4)",
			fill: ["#F8FAFC", "#E2E8F0"],
			depth,
		}
	}
}

/// Lookup from service-type key to [`ServiceInfo`].
#[derive(Clone, Debug, Default)]
pub struct ServiceCatalog {
	entries: HashMap<&'static str, ServiceInfo>,
}

impl ServiceCatalog {
	pub fn builtin() -> Self {
		[
			("EC2", ServiceInfo {
				label: "Amazon EC2",
				category: "Compute",
				icon: "🖥️",
				color: "#FF9900",
				shadow: "rgba(255, 153, 0, 0.4)",
				fill: ["#FFF8F0", "#FFE4B5"],
				depth: 40.0,
			}),
			("S3", ServiceInfo {
				label: "Amazon S3",
				category: "Storage",
				icon: "📦",
				color: "#3F90CF",
				shadow: "rgba(63, 144, 207, 0.4)",
				fill: ["#F0F8FF", "#B0E0E6"],
				depth: 50.0,
			}),
			("RDS", ServiceInfo {
				label: "Amazon RDS",
				category: "Database",
				icon: "🗄️",
				color: "#527FFF",
				shadow: "rgba(82, 127, 255, 0.4)",
				fill: ["#F5F7FF", "#C7D2FE"],
				depth: 60.0,
			}),
			("Lambda", ServiceInfo {
				label: "AWS Lambda",
				category: "Compute",
				icon: "λ",
				color: "#FF9900",
				shadow: "rgba(255, 153, 0, 0.4)",
				fill: ["#FFF8F0", "#FFE4B5"],
				depth: 45.0,
			}),
			("CloudWatch", ServiceInfo {
				label: "CloudWatch",
				category: "Monitoring",
				icon: "📊",
				color: "#3F90CF",
				shadow: "rgba(63, 144, 207, 0.4)",
				fill: ["#F0F8FF", "#B0E0E6"],
				depth: 35.0,
			}),
			("APIGateway", ServiceInfo {
				label: "API Gateway",
				category: "Networking",
				icon: "🌐",
				color: "#FF4B4B",
				shadow: "rgba(255, 75, 75, 0.4)",
				fill: ["#FFF5F5", "#FEB2B2"],
				depth: 30.0,
			}),
			("ELB", ServiceInfo {
				label: "Load Balancer",
				category: "Networking",
				icon: "⚖️",
				color: "#8C4FFF",
				shadow: "rgba(140, 79, 255, 0.4)",
				fill: ["#F8F5FF", "#D8B4FE"],
				depth: 30.0,
			}),
			("VPC", ServiceInfo {
				label: "VPC",
				category: "Network",
				icon: "🏢",
				color: "#4CAF50",
				shadow: "rgba(76, 175, 80, 0.3)",
				fill: ["#F8FFF8", "#A7F3D0"],
				depth: 10.0,
			}),
		]
		.into_iter()
		.fold(Self::default(), |catalog, (key, info)| {
			catalog.with_service(key, info)
		})
	}

	pub fn with_service(mut self, key: &'static str, info: ServiceInfo) -> Self {
		self.entries.insert(key, info);
		self
	}

	pub fn get(&self, key: &str) -> Option<&ServiceInfo> {
		self.entries.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}
}

/// An outgoing edge as authored, before the graph model owns it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConnectionSpec {
	pub to: String,
	pub label: String,
	pub kind: ConnectionKind,
	#[serde(default)]
	pub throughput: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeSpec {
	pub id: String,
	pub service: String,
	pub position: Point,
	#[serde(default)]
	pub elevation: Option<f64>,
	#[serde(default)]
	pub container: bool,
	#[serde(default)]
	pub size: Option<Size>,
	#[serde(default)]
	pub connections: Vec<ConnectionSpec>,
}

/// One named architecture: nodes in declaration order plus its descriptive text.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ArchitectureSpec {
	pub name: String,
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub flow_description: String,
	pub nodes: Vec<NodeSpec>,
}

/// Read-only mapping of architecture name to [`ArchitectureSpec`], in declaration order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ArchitectureCatalog {
	architectures: Vec<ArchitectureSpec>,
}

impl ArchitectureCatalog {
	/// The catalog bundled with the app.
	pub fn builtin() -> Result<Self, LoadError> {
		Self::from_json(BUILTIN_ARCHITECTURES)
	}

	pub fn from_json(json: &str) -> Result<Self, LoadError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.architectures.iter().map(|a| a.name.as_str())
	}

	pub fn get(&self, name: &str) -> Option<&ArchitectureSpec> {
		self.architectures.iter().find(|a| a.name == name)
	}

	pub fn first(&self) -> Option<&ArchitectureSpec> {
		self.architectures.first()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_catalog_parses_in_declaration_order() {
		let catalog = ArchitectureCatalog::builtin().unwrap();
		assert_eq!(catalog.names().collect::<Vec<_>>(), ["App A", "App B"]);

		let app_a = catalog.get("App A").unwrap();
		assert_eq!(app_a.title, "Web Application Architecture");
		let ids: Vec<_> = app_a.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["vpc", "elb", "ec2", "rds", "s3", "cloudwatch"]);

		let ec2 = &app_a.nodes[2];
		assert_eq!(ec2.connections.len(), 2);
		assert_eq!(ec2.connections[1].kind, ConnectionKind::Async);
		assert_eq!(ec2.connections[1].throughput, "1GB/s");
	}

	#[test]
	fn every_builtin_service_is_catalogued() {
		let services = ServiceCatalog::builtin();
		let catalog = ArchitectureCatalog::builtin().unwrap();
		for name in catalog.names() {
			for node in &catalog.get(name).unwrap().nodes {
				assert!(services.contains(&node.service), "{}", node.service);
			}
		}
	}

	#[test]
	fn malformed_json_is_a_catalog_error() {
		let err = ArchitectureCatalog::from_json("{ \"architectures\": 3 }").unwrap_err();
		assert!(matches!(err, LoadError::Catalog(_)));
	}

	#[test]
	fn unknown_connection_kind_is_rejected() {
		let json = r#"{ "architectures": [{ "name": "x", "title": "x", "nodes": [
			{ "id": "a", "service": "EC2", "position": { "x": 0, "y": 0 },
			  "connections": [{ "to": "b", "label": "l", "kind": "batch" }] }
		] }] }"#;
		assert!(ArchitectureCatalog::from_json(json).is_err());
	}

	#[test]
	fn with_service_overrides_default_depth() {
		let services =
			ServiceCatalog::builtin().with_service("EC2", ServiceInfo::plain("EC2", "Compute", 1.0));
		assert_eq!(services.get("EC2").unwrap().depth, 1.0);
		assert!(services.get("Redis").is_none());
	}
}

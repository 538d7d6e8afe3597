use super::catalog::ServiceCatalog;
use super::types::Node;

/// Explicit elevation, else the service type's default depth.
///
/// Nodes are validated against the catalog at load, so a missing entry only
/// happens with a foreign catalog; it is treated as ground level.
pub fn effective_elevation(node: &Node, services: &ServiceCatalog) -> f64 {
	node.elevation
		.or_else(|| services.get(&node.service).map(|s| s.depth))
		.unwrap_or(0.0)
}

pub fn stacking_index(elevation: f64) -> i32 {
	elevation.floor() as i32
}

/// Back-to-front paint order: ascending elevation, declaration order on ties.
pub fn paint_order<'a>(
	nodes: impl IntoIterator<Item = &'a Node>,
	services: &ServiceCatalog,
) -> Vec<&'a Node> {
	let mut keyed: Vec<(f64, &Node)> = nodes
		.into_iter()
		.map(|n| (effective_elevation(n, services), n))
		.collect();
	// sort_by is stable
	keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
	keyed.into_iter().map(|(_, n)| n).collect()
}

/// Front-to-back order used by the component summary, declaration order on ties.
pub fn summary_order<'a>(
	nodes: impl IntoIterator<Item = &'a Node>,
	services: &ServiceCatalog,
) -> Vec<&'a Node> {
	let mut keyed: Vec<(f64, &Node)> = nodes
		.into_iter()
		.map(|n| (effective_elevation(n, services), n))
		.collect();
	keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
	keyed.into_iter().map(|(_, n)| n).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::catalog::ServiceInfo;
	use crate::components::arch_diagram::types::Point;

	fn node(id: &str, service: &str, elevation: Option<f64>) -> Node {
		Node {
			id: id.into(),
			service: service.into(),
			position: Point::default(),
			elevation,
			is_container: false,
			container_size: None,
			connections: Vec::new(),
		}
	}

	fn ids(nodes: &[&Node]) -> Vec<String> {
		nodes.iter().map(|n| n.id.clone()).collect()
	}

	#[test]
	fn falls_back_to_service_default() {
		let services = ServiceCatalog::builtin();
		assert_eq!(effective_elevation(&node("r", "RDS", None), &services), 60.0);
		assert_eq!(effective_elevation(&node("r", "RDS", Some(12.5)), &services), 12.5);
	}

	#[test]
	fn explicit_zero_elevation_is_kept() {
		let services = ServiceCatalog::builtin();
		assert_eq!(effective_elevation(&node("r", "RDS", Some(0.0)), &services), 0.0);
	}

	#[test]
	fn paints_lowest_first_with_defaults_in_between() {
		let services =
			ServiceCatalog::builtin().with_service("Cache", ServiceInfo::plain("Cache", "Database", 25.0));
		let nodes = [
			node("A", "EC2", Some(10.0)),
			node("B", "EC2", Some(40.0)),
			node("C", "Cache", None),
		];
		assert_eq!(ids(&paint_order(&nodes, &services)), ["A", "C", "B"]);
	}

	#[test]
	fn equal_elevations_keep_declaration_order() {
		let services = ServiceCatalog::builtin();
		let nodes = [
			node("d", "EC2", Some(30.0)),
			node("b", "ELB", None),
			node("a", "APIGateway", None),
			node("c", "EC2", Some(20.0)),
			node("e", "EC2", Some(30.0)),
		];

		assert_eq!(ids(&paint_order(&nodes, &services)), ["c", "d", "b", "a", "e"]);
		// repeated renders of the same graph never reshuffle
		assert_eq!(paint_order(&nodes, &services), paint_order(&nodes, &services));
		assert_eq!(ids(&summary_order(&nodes, &services)), ["d", "b", "a", "e", "c"]);
	}

	#[test]
	fn stacking_index_floors() {
		assert_eq!(stacking_index(45.9), 45);
		assert_eq!(stacking_index(30.0), 30);
		assert_eq!(stacking_index(-0.5), -1);
	}
}

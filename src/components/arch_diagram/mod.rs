mod anchor;
mod catalog;
mod clock;
mod component;
mod config;
mod depth;
mod graph;
mod highlight;
mod render;
mod route;
mod state;
mod types;
mod viewpoint;

pub use catalog::{ArchitectureCatalog, ServiceCatalog};
pub use component::ArchitectureDiagram;
pub use config::DiagramConfig;
pub use graph::LoadError;
#[cfg(test)]
pub use state::DiagramState;
#[cfg(test)]
pub use types::ConnectionKey;
pub use state::Overview;

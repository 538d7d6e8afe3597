use leptos::prelude::*;

use crate::components::arch_diagram::{
	ArchitectureCatalog, ArchitectureDiagram, DiagramConfig, LoadError, Overview, ServiceCatalog,
};

/// One line of the component summary panel.
#[derive(Clone, Debug, PartialEq)]
struct SummaryRow {
	icon: &'static str,
	label: &'static str,
	category: &'static str,
	color: &'static str,
	elevation: f64,
	outgoing: usize,
}

fn summary_rows(overview: &Overview, services: &ServiceCatalog) -> Vec<SummaryRow> {
	overview
		.summary
		.iter()
		.filter_map(|node| {
			let info = services.get(&node.style_key)?;
			Some(SummaryRow {
				icon: info.icon,
				label: info.label,
				category: info.category,
				color: info.color,
				elevation: node.elevation,
				outgoing: node.outgoing,
			})
		})
		.collect()
}

/// Text shown when the diagram is not showing what was asked for.
fn selection_notice(requested: &str, overview: &Overview) -> Option<String> {
	(overview.name != requested).then(|| {
		format!(
			"\"{requested}\" could not be loaded; still showing \"{}\".",
			overview.name
		)
	})
}

fn dangling_notice(overview: &Overview) -> Option<String> {
	match overview.dangling.as_slice() {
		[] => None,
		keys => Some(format!(
			"Skipped connections to unknown nodes: {}",
			keys.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", ")
		)),
	}
}

fn explorer() -> Result<impl IntoView, LoadError> {
	let catalog = ArchitectureCatalog::builtin()?;
	let first = catalog
		.first()
		.map(|a| a.name.clone())
		.ok_or_else(|| LoadError::UnknownArchitecture {
			name: String::new(),
		})?;
	let (selected, set_selected) = signal(first);
	let (columnar, set_columnar) = signal(false);
	let (overview, set_overview) = signal(None::<Overview>);
	let config = Signal::derive(move || {
		if columnar.get() {
			DiagramConfig::columnar()
		} else {
			DiagramConfig::axis_aligned()
		}
	});
	let services = ServiceCatalog::builtin();

	let buttons = catalog
		.names()
		.map(|name| {
			let (label, current, target) = (name.to_string(), name.to_string(), name.to_string());
			view! {
				<button
					class="arch-button"
					class:active=move || selected.get() == current
					on:click=move |_| set_selected.set(target.clone())
				>
					{label}
				</button>
			}
		})
		.collect_view();

	let title = move || overview.with(|o| o.as_ref().map(|o| o.title.clone()).unwrap_or_default());
	let description =
		move || overview.with(|o| o.as_ref().map(|o| o.description.clone()).unwrap_or_default());
	let flow = move || {
		overview.with(|o| {
			o.as_ref()
				.map(|o| o.flow_description.clone())
				.unwrap_or_default()
		})
	};
	let notices = move || {
		overview.with(|o| {
			o.as_ref()
				.map(|o| {
					selection_notice(&selected.get(), o)
						.into_iter()
						.chain(dangling_notice(o))
						.collect::<Vec<_>>()
				})
				.unwrap_or_default()
		})
		.into_iter()
		.map(|notice| view! { <p class="notice">{notice}</p> })
		.collect_view()
	};
	let summary = move || {
		overview
			.with(|o| o.as_ref().map(|o| summary_rows(o, &services)).unwrap_or_default())
			.into_iter()
			.map(|row| {
				view! {
					<li class="summary-row" style:border-left-color=row.color>
						<span class="summary-icon">{row.icon}</span>
						<span class="summary-label">{row.label}</span>
						<span class="summary-category">{row.category}</span>
						<span class="summary-depth">{format!("Z:{}", row.elevation)}</span>
						<span class="summary-links">
							{format!("{} outgoing", row.outgoing)}
						</span>
					</li>
				}
			})
			.collect_view()
	};

	Ok(view! {
		<div class="explorer">
			<header class="explorer-header">
				<div class="arch-buttons">
					{buttons}
					<label class="layout-toggle">
						<input
							type="checkbox"
							prop:checked=columnar
							on:change=move |ev| set_columnar.set(event_target_checked(&ev))
						/>
						"Columnar layout"
					</label>
				</div>
				<h1>{title}</h1>
				<p class="subtitle">{description}</p>
				<p class="flow">{flow}</p>
				{notices}
				<div class="legend">
					<span class="legend-sync">"Sync"</span>
					<span class="legend-async">"Async"</span>
				</div>
			</header>
			<div class="diagram">
				<ArchitectureDiagram
					catalog=catalog
					selected=selected
					config=config
					overview=set_overview
				/>
			</div>
			<aside class="summary">
				<h2>"Components by depth"</h2>
				<ul>{summary}</ul>
			</aside>
		</div>
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{explorer()}</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::{ConnectionKey, DiagramState};

	fn overview(name: &str) -> Overview {
		let catalog = ArchitectureCatalog::builtin().unwrap();
		DiagramState::new(catalog, ServiceCatalog::builtin(), DiagramConfig::default(), name)
			.unwrap()
			.overview()
	}

	#[test]
	fn summary_lists_components_front_to_back() {
		let services = ServiceCatalog::builtin();
		let rows = summary_rows(&overview("App A"), &services);

		let depths: Vec<f64> = rows.iter().map(|r| r.elevation).collect();
		assert_eq!(depths, vec![60.0, 50.0, 40.0, 35.0, 30.0]);
		assert_eq!(rows[2].outgoing, 2);
		assert!(rows.iter().all(|r| r.label != services.get("VPC").unwrap().label));
	}

	#[test]
	fn notices_report_a_stale_selection_only() {
		let shown = overview("App A");
		assert_eq!(selection_notice("App A", &shown), None);
		assert_eq!(
			selection_notice("App Z", &shown).as_deref(),
			Some("\"App Z\" could not be loaded; still showing \"App A\".")
		);
		assert_eq!(dangling_notice(&shown), None);
	}

	#[test]
	fn skipped_connections_are_listed() {
		let shown = Overview {
			dangling: vec![
				ConnectionKey::new("api", "queue"),
				ConnectionKey::new("lambda", "queue"),
			],
			..overview("App B")
		};
		assert_eq!(
			dangling_notice(&shown).as_deref(),
			Some("Skipped connections to unknown nodes: api->queue, lambda->queue")
		);
	}
}

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::components::force_graph::ForceGraphCanvas;
use crate::config::AppConfig;
use crate::graph::{GraphSnapshot, canvas_data, fetch_snapshot, replace_if_changed, report};

/// Graph view over the configured Neo4j query.
#[component]
pub fn KnowledgeGraph() -> impl IntoView {
	let config = expect_context::<RwSignal<AppConfig>>();
	// Only notifies when the connection settings actually change.
	let graph_config = Memo::new(move |_| config.with(|c| c.graph.clone()));
	let snapshot = RwSignal::new(GraphSnapshot::default());
	let loading = RwSignal::new(true);
	let selected = RwSignal::new(None::<String>);
	let fetch_seq = StoredValue::new(0u64);

	Effect::new(move |_| {
		let graph_config = graph_config.get();
		let seq = fetch_seq.get_value() + 1;
		fetch_seq.set_value(seq);
		loading.set(true);

		spawn_local(async move {
			let result = fetch_snapshot(&graph_config).await;
			if fetch_seq.try_get_value() != Some(seq) {
				return;
			}
			match result {
				Ok(next) => snapshot.maybe_update(|current| replace_if_changed(current, next)),
				Err(err) => report(&err),
			}
			loading.set(false);
		});
	});

	let data = Memo::new(move |_| snapshot.with(canvas_data));
	let on_select = Callback::new(move |id: Option<String>| {
		info!("Selected node: {id:?}");
		selected.set(id);
	});

	view! {
		<section class="page graph-page">
			<Show
				when=move || !loading.get()
				fallback=|| view! { <div class="loading">"Loading graph data..."</div> }
			>
				<div class="graph-container">
					<ForceGraphCanvas data=data on_select=on_select />
				</div>
				<NodeDetails snapshot=snapshot selected=selected />
			</Show>
		</section>
	}
}

#[component]
fn NodeDetails(snapshot: RwSignal<GraphSnapshot>, selected: RwSignal<Option<String>>) -> impl IntoView {
	let node = move || {
		let id = selected.get()?;
		snapshot.with(|s| s.node(&id).cloned())
	};
	move || {
		node().map(|node| {
			let properties =
				serde_json::to_string_pretty(&node.properties).unwrap_or_else(|_| node.properties.to_string());
			view! {
				<aside class="node-details">
					<h3>{node.label}</h3>
					<p class="node-id">{node.id}</p>
					<pre>{properties}</pre>
				</aside>
			}
		})
	}
}

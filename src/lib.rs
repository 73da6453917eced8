//! PubMed Search Assistant: a Leptos client-side app with a chat search
//! over a RAG backend and a force-directed view of the Neo4j paper graph.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod abort;
pub mod chat;
mod components;
pub mod config;
pub mod error;
pub mod graph;
mod pages;

use crate::components::{Footer, Header};
use crate::config::AppConfig;
// Top-Level pages
use crate::pages::chat_search::ChatSearch;
use crate::pages::home::Home;
use crate::pages::knowledge_graph::KnowledgeGraph;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Mounts the app with the configuration baked in at build time.
pub fn start() {
	init_logging();
	let config = AppConfig::from_build_env();
	leptos::mount::mount_to_body(move || view! { <App config=config /> });
}

/// An app router with the landing, chat and graph pages; anything else is a 404.
#[component]
pub fn App(
	/// Settings baked in at build time.
	config: AppConfig,
) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(RwSignal::new(config));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="PubMed Search Assistant" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Header />
			<main>
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
				}>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Home />
						<Route path=path!("/chat-search") view=ChatSearch />
						<Route path=path!("/knowledge-graph") view=KnowledgeGraph />
					</Routes>
				</ErrorBoundary>
			</main>
			<Footer />
		</Router>
	}
}

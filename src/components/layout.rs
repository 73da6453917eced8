use leptos::prelude::*;
use leptos_router::components::A;

/// Brand link plus navigation across the three pages. The router marks
/// the current page's link with `aria-current`.
#[component]
pub fn Header() -> impl IntoView {
	view! {
		<header class="navbar">
			<A href="/" attr:class="navbar-brand">
				"PubMed Search Assistant"
			</A>
			<nav class="navbar-links">
				<A href="/" exact=true>
					"Home"
				</A>
				<A href="/chat-search">"Search"</A>
				<A href="/knowledge-graph">"Knowledge Graph"</A>
			</nav>
		</header>
	}
}

/// License line shown under every page.
#[component]
pub fn Footer() -> impl IntoView {
	view! {
		<footer class="footer">
			<span>"Available under the GNU v3.0."</span>
		</footer>
	}
}

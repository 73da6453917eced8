use leptos::prelude::*;
use leptos_router::components::A;

/// Landing page describing what the assistant does.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<section class="page landing">
			<h1>"PubMed Search Assistant"</h1>
			<p>
				"Welcome to the PubMed Search Assistant. This is a search engine utilizing a Large Language Model and Retrieval Augmented Generation techniques to allow you to ask questions and get relevant responses related to the entire corpus of PubMed papers."
			</p>
			<p>
				"This is done by loading the abstracts, citations, and authors of the papers into a graph database (Neo4j). Words found in the abstracts are tokenized to create linkages between papers focusing on similar concepts. The graph connects authors to titles, titles to abstracts, citations to those papers, and abstracts to their keywords."
			</p>
			<p>"Conversations with the LLM are recorded for quality assurance and improvement."</p>
			<ul class="landing-links">
				<li>
					<A href="/chat-search">"Ask a question"</A>
				</li>
				<li>
					<A href="/knowledge-graph">"Explore the knowledge graph"</A>
				</li>
			</ul>
		</section>
	}
}

use leptos::prelude::*;

use crate::chat::Paper;

/// Results panel. Each paper collapses to its title; expanding shows the
/// authors and abstract.
#[component]
pub fn PaperList(#[prop(into)] papers: Signal<Vec<Paper>>) -> impl IntoView {
	view! {
		<Show
			when=move || papers.with(|p| !p.is_empty())
			fallback=|| {
				view! {
					<div class="papers-intro">
						<p>
							"The chat window to the left uses a large language model to help you identify PubMed papers which relate to your question."
						</p>
						<p>
							"This part of the page will be populated with results from your query once you have asked a question."
						</p>
					</div>
				}
			}
		>
			<div class="papers-list">
				{move || {
					papers
						.get()
						.into_iter()
						.map(|paper| view! { <PaperEntry paper=paper /> })
						.collect_view()
				}}
			</div>
		</Show>
	}
}

#[component]
fn PaperEntry(paper: Paper) -> impl IntoView {
	let link = paper.pubmed_url();
	let keywords = (!paper.keywords.is_empty()).then(|| paper.keywords.join(", "));
	view! {
		<details class="paper">
			<summary class="paper-title">{paper.title}</summary>
			<div class="paper-body">
				<p>
					<strong>"Authors: "</strong>
					{paper.authors}
				</p>
				<p>
					<strong>"Abstract: "</strong>
					{paper.abstract_text}
				</p>
				{keywords.map(|k| view! {
					<p>
						<strong>"Keywords: "</strong>
						{k}
					</p>
				})}
				{link.map(|href| view! {
					<a href=href target="_blank" rel="noopener">
						"View on PubMed"
					</a>
				})}
			</div>
		</details>
	}
}

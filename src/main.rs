//! Browser entry point for the PubMed Search Assistant.

fn main() {
	pubmed_search_assistant::start();
}

use leptos::prelude::*;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// Renders assistant text as markdown.
#[component]
pub fn Markdown(source: String, class: &'static str) -> impl IntoView {
	let html = to_html(&source);
	view! { <div class=class inner_html=html></div> }
}

/// Converts markdown to HTML that is safe to inject. Raw HTML in the source
/// comes out escaped and links may only use web or mail schemes.
pub fn to_html(source: &str) -> String {
	let mut options = Options::empty();
	options.insert(Options::ENABLE_STRIKETHROUGH);
	options.insert(Options::ENABLE_TABLES);

	let events = Parser::new_ext(source, options).map(|event| match event {
		Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
		Event::Start(Tag::Link {
			link_type,
			dest_url,
			title,
			id,
		}) => Event::Start(Tag::Link {
			link_type,
			dest_url: safe_url(dest_url),
			title,
			id,
		}),
		Event::Start(Tag::Image {
			link_type,
			dest_url,
			title,
			id,
		}) => Event::Start(Tag::Image {
			link_type,
			dest_url: safe_url(dest_url),
			title,
			id,
		}),
		other => other,
	});

	let mut out = String::with_capacity(source.len() * 3 / 2);
	html::push_html(&mut out, events);
	out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
	match url.find([':', '/', '?', '#']) {
		Some(i) if url[i..].starts_with(':') => {
			let scheme = url[..i].to_ascii_lowercase();
			if matches!(scheme.as_str(), "http" | "https" | "mailto") {
				url
			} else {
				CowStr::Borrowed("#")
			}
		}
		// relative
		_ => url,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbered_lists_and_emphasis() {
		let html = to_html("Found 2 papers:\n\n1. **Tumour growth** in mice\n2. *Chemo* outcomes\n");
		assert!(html.contains("<ol>"));
		assert_eq!(html.matches("<li>").count(), 2);
		assert!(html.contains("<strong>Tumour growth</strong>"));
		assert!(html.contains("<em>Chemo</em>"));
	}

	#[test]
	fn raw_html_is_escaped() {
		let html = to_html("<script>alert(1)</script>\n\nsee <b>this</b>");
		assert!(!html.contains("<script>"));
		assert!(html.contains("&lt;script&gt;"));
		assert!(html.contains("&lt;b&gt;this&lt;/b&gt;"));
	}

	#[test]
	fn only_web_links_survive() {
		let html = to_html("[bad](javascript:alert(1)) [good](https://pubmed.ncbi.nlm.nih.gov/1/) [rel](/chat-search)");
		assert!(!html.contains("javascript:"));
		assert!(html.contains(r##"<a href="#">bad</a>"##));
		assert!(html.contains(r#"href="https://pubmed.ncbi.nlm.nih.gov/1/""#));
		assert!(html.contains(r#"href="/chat-search""#));
	}
}

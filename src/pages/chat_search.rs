use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::abort::AbortHandle;
use crate::chat::{CompletionClient, ConversationState, HttpCompletionClient, Role, Ticket};
use crate::components::{Markdown, PaperList};
use crate::config::AppConfig;

const TEST_QUERY: &str = "find articles about cancer";

/// The request currently allowed to report back, and how to cancel it.
type PendingSlot = Rc<RefCell<Option<(Ticket, AbortHandle)>>>;

/// Conversation view: chat on the left, the latest papers on the right.
#[component]
pub fn ChatSearch() -> impl IntoView {
	let config = expect_context::<RwSignal<AppConfig>>();
	let conversation = RwSignal::new(ConversationState::new());
	let input = RwSignal::new(String::new());
	let pending: PendingSlot = Rc::new(RefCell::new(None));
	let messages_ref = NodeRef::<leptos::html::Div>::new();

	// Keep the newest message in view.
	Effect::new(move |_| {
		conversation.with(|c| c.messages().len());
		if let Some(el) = messages_ref.get() {
			el.set_scroll_top(el.scroll_height());
		}
	});

	let pending_submit = pending.clone();
	let submit = move |text: String| {
		let chat = config.with_untracked(|c| c.chat.clone());
		let Some(outbound) = conversation.try_update(|c| c.submit(&text, &chat)).flatten() else {
			return;
		};

		let abort = AbortHandle::new();
		{
			let mut slot = pending_submit.borrow_mut();
			if let Some((ticket, handle)) = slot.take() {
				if Some(ticket) == outbound.superseded {
					handle.abort();
				}
			}
			*slot = Some((outbound.ticket, abort.clone()));
		}

		let pending = pending_submit.clone();
		let client = HttpCompletionClient::new(&chat);
		spawn_local(async move {
			let result = client.complete(&outbound.request, &abort).await;
			conversation.maybe_update(|c| c.complete(outbound.ticket, result));

			let mut slot = pending.borrow_mut();
			if slot.as_ref().is_some_and(|(t, _)| *t == outbound.ticket) {
				*slot = None;
			}
		});
	};

	let handle_input = {
		let submit = submit.clone();
		move || {
			let text = input.get_untracked();
			if !text.is_empty() {
				submit(text);
				input.set(String::new());
			}
		}
	};
	let on_key = {
		let handle_input = handle_input.clone();
		move |ev: KeyboardEvent| {
			if ev.key() == "Enter" {
				handle_input();
			}
		}
	};
	let on_submit = move |_: MouseEvent| handle_input();
	let on_test = move |_: MouseEvent| submit(TEST_QUERY.to_string());
	let on_reset = move |_: MouseEvent| {
		if let Some(ticket) = conversation.try_update(ConversationState::reset).flatten() {
			debug!("reset cancelled in-flight submission {ticket:?}");
		}
		if let Some((_, handle)) = pending.borrow_mut().take() {
			handle.abort();
		}
	};

	let papers = Signal::derive(move || conversation.with(|c| c.papers().to_vec()));
	let busy = move || conversation.with(ConversationState::is_busy);

	view! {
		<section class="page chat-page">
			<div class="chat-container">
				<div class="chat-messages" node_ref=messages_ref>
					{move || {
						conversation
							.with(|c| c.messages().to_vec())
							.into_iter()
							.map(|msg| {
								match msg.role {
									Role::User => view! { <div class="message user-message">{msg.content}</div> }.into_any(),
									_ => view! { <Markdown source=msg.content class="message bot-message" /> }.into_any(),
								}
							})
							.collect_view()
					}}
					<Show when=busy>
						<div class="message bot-message thinking">"Thinking..."</div>
					</Show>
				</div>
				<div class="button-container">
					<button class="reset-button" on:click=on_reset>
						"Reset"
					</button>
					<button class="reset-button" on:click=on_test>
						"Test"
					</button>
				</div>
				<div class="chat-input-container">
					<input
						type="text"
						class="chat-input"
						placeholder="Type your message..."
						prop:value=move || input.get()
						on:input=move |ev| input.set(event_target_value(&ev))
						on:keydown=on_key
					/>
					<button class="submit-button" on:click=on_submit>
						"Submit"
					</button>
				</div>
			</div>
			<aside class="papers-container">
				<PaperList papers=papers />
			</aside>
		</section>
	}
}

use std::cell::Cell;
use std::rc::Rc;

use log::warn;
use web_sys::{AbortController, AbortSignal};

/// Cancels an outstanding `fetch`. The default handle has no controller,
/// which is what tests and browsers without `AbortController` get; it still
/// remembers having been aborted.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
	controller: Option<AbortController>,
	aborted: Rc<Cell<bool>>,
}

impl AbortHandle {
	pub fn new() -> Self {
		match AbortController::new() {
			Ok(controller) => Self {
				controller: Some(controller),
				aborted: Rc::default(),
			},
			Err(err) => {
				warn!("AbortController unavailable, requests cannot be cancelled: {err:?}");
				Self::default()
			}
		}
	}

	pub fn signal(&self) -> Option<AbortSignal> {
		self.controller.as_ref().map(AbortController::signal)
	}

	/// Whether this handle, or any clone of it, was aborted.
	pub fn is_aborted(&self) -> bool {
		self.aborted.get()
	}

	pub fn abort(&self) {
		self.aborted.set(true);
		if let Some(controller) = &self.controller {
			controller.abort();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clones_share_the_aborted_flag() {
		let handle = AbortHandle::default();
		let clone = handle.clone();
		assert!(!handle.is_aborted());
		clone.abort();
		assert!(handle.is_aborted());
		assert!(handle.signal().is_none());
	}
}

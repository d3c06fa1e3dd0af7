use std::{cell::RefCell, rc::Rc};

use gloo::{events::EventListener, utils::window};
use tracing::error;
use web_sys::Window;

use crate::HashHistory;

/// A [`HashHistory`] that drives `window.location` of a browser.
///
/// `push` assigns `location.hash`, `replace` calls `location.replace` with the bare fragment, so the
/// path and query of the page are never touched. Both make the browser fire `hashchange`, which is
/// forwarded to the update callback.
pub struct WebHashHistory {
    window: Window,
    listener_navigation: RefCell<Option<EventListener>>,
}

impl Default for WebHashHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl WebHashHistory {
    /// Create a new [`WebHashHistory`] bound to the global `window`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: window(),
            listener_navigation: RefCell::new(None),
        }
    }
}

impl HashHistory for WebHashHistory {
    fn current_hash(&self) -> String {
        match self.window.location().hash() {
            Ok(hash) => hash,
            Err(err) => {
                error!("failed to read location hash: {err:?}");
                String::new()
            }
        }
    }

    fn push(&self, hash: String) {
        if let Err(err) = self.window.location().set_hash(&hash) {
            error!("failed to push hash {hash}: {err:?}");
        }
    }

    fn replace(&self, hash: String) {
        if let Err(err) = self.window.location().replace(&hash) {
            error!("failed to replace hash with {hash}: {err:?}");
        }
    }

    fn go_back(&self) {
        let result = self.window.history().and_then(|history| history.back());
        if let Err(err) = result {
            error!("failed to go back: {err:?}");
        }
    }

    fn go_forward(&self) {
        let result = self.window.history().and_then(|history| history.forward());
        if let Err(err) = result {
            error!("failed to go forward: {err:?}");
        }
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        let listener = EventListener::new(&self.window, "hashchange", move |_| callback());
        *self.listener_navigation.borrow_mut() = Some(listener);
    }
}

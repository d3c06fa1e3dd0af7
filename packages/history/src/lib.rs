#![deny(missing_docs)]
//! Hash-fragment history integration.
//!
//! The router never touches the browser directly. It reads and writes the displayed URL through a
//! [`HashHistory`] provider, which only deals with the fragment part of the URL (`#!/users/3`).
//!
//! Two providers ship with this crate:
//! - [`MemoryHistory`] keeps everything in memory. Useful for tests and headless runs.
//! - `WebHashHistory` (behind the `web` feature) drives `window.location` and listens to
//!   `hashchange` events.

use std::rc::Rc;

mod memory;
pub use memory::*;

#[cfg(feature = "web")]
mod web;
#[cfg(feature = "web")]
pub use web::*;

/// An integration with some kind of fragment-based navigation history.
///
/// All methods take `&self`; providers are shared as `Rc<dyn HashHistory>` between the router and
/// the page controllers and use interior mutability.
///
/// Navigating to the fragment that is already displayed must be a no-op that does not invoke the
/// update callback. Browsers do not fire `hashchange` in that case either.
pub trait HashHistory {
    /// Get the full fragment of the current URL, including the leading `#`.
    ///
    /// Returns an empty string if the URL has no fragment.
    ///
    /// ```rust
    /// # use hashbang_history::{HashHistory, MemoryHistory};
    /// let history = MemoryHistory::with_initial_hash("#!/");
    /// assert_eq!(history.current_hash(), "#!/");
    ///
    /// history.push(String::from("#!/generateusers"));
    /// assert_eq!(history.current_hash(), "#!/generateusers");
    /// ```
    #[must_use]
    fn current_hash(&self) -> String;

    /// Show another fragment and add a new history entry for it.
    ///
    /// This clears the navigation future and invokes the update callback.
    fn push(&self, hash: String);

    /// Show another fragment without adding a history entry.
    ///
    /// The navigation history and future stay untouched. The update callback is still invoked.
    ///
    /// ```rust
    /// # use hashbang_history::{HashHistory, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// history.replace(String::from("#!/generateusers"));
    /// assert_eq!(history.current_hash(), "#!/generateusers");
    /// assert!(!history.can_go_back());
    /// ```
    fn replace(&self, hash: String);

    /// Check whether there is a previous entry to navigate back to.
    ///
    /// If a provider cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to the previous entry. Does nothing if there is none.
    fn go_back(&self);

    /// Check whether there is a later entry to navigate forward to.
    ///
    /// If a provider cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to the next entry. Does nothing if there is none.
    fn go_forward(&self);

    /// Provide the history with the callback to invoke whenever the displayed fragment changes.
    ///
    /// Only one callback is kept, a later call replaces the earlier one.
    fn updater(&self, callback: Rc<dyn Fn()>);
}

use std::{cell::RefCell, rc::Rc};

use crate::HashHistory;

struct MemoryHistoryState {
    current: String,
    history: Vec<String>,
    future: Vec<String>,
}

/// A [`HashHistory`] provider that stores all navigation information in memory.
///
/// The update callback is invoked synchronously from within `push`, `replace`, `go_back` and
/// `go_forward`, after the new fragment is in place.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    updater: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_hash("")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] displaying `hash`.
    ///
    /// ```rust
    /// # use hashbang_history::{HashHistory, MemoryHistory};
    /// let history = MemoryHistory::with_initial_hash("#!/generateusers/3");
    /// assert_eq!(history.current_hash(), "#!/generateusers/3");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_hash(hash: impl ToString) -> Self {
        Self {
            state: MemoryHistoryState {
                current: hash.to_string(),
                history: Vec::new(),
                future: Vec::new(),
            }
            .into(),
            updater: RefCell::new(None),
        }
    }

    /// Every fragment that was left behind by `push`, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    fn notify(&self) {
        // clone first so the callback may call back into this history
        let callback = self.updater.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl HashHistory for MemoryHistory {
    fn current_hash(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn push(&self, new: String) {
        {
            let mut write = self.state.borrow_mut();
            if write.current == new {
                return;
            }
            let old = std::mem::replace(&mut write.current, new);
            write.history.push(old);
            write.future.clear();
        }
        self.notify();
    }

    fn replace(&self, hash: String) {
        {
            let mut write = self.state.borrow_mut();
            if write.current == hash {
                return;
            }
            write.current = hash;
        }
        self.notify();
    }

    fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    fn go_back(&self) {
        {
            let mut write = self.state.borrow_mut();
            let Some(last) = write.history.pop() else {
                return;
            };
            let old = std::mem::replace(&mut write.current, last);
            write.future.push(old);
        }
        self.notify();
    }

    fn can_go_forward(&self) -> bool {
        !self.state.borrow().future.is_empty()
    }

    fn go_forward(&self) {
        {
            let mut write = self.state.borrow_mut();
            let Some(next) = write.future.pop() else {
                return;
            };
            let old = std::mem::replace(&mut write.current, next);
            write.history.push(old);
        }
        self.notify();
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        *self.updater.borrow_mut() = Some(callback);
    }
}

use std::{fmt::Display, rc::Rc, time::Duration};

use crate::state::RouteState;

/// A callback invoked with the route state after a routing step.
pub type RoutingCallback = Rc<dyn Fn(&RouteState)>;

/// The token separating the fragment marker from the route path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HashSyntax {
    /// Plain fragments: `#/users`.
    #[cfg_attr(feature = "serde", serde(rename = "#"))]
    Hash,
    /// Hash-bang fragments: `#!/users`.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "#!"))]
    HashBang,
}

impl HashSyntax {
    /// The literal token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HashSyntax::Hash => "#",
            HashSyntax::HashBang => "#!",
        }
    }

    /// Prepend the token to a route path.
    ///
    /// ```rust
    /// # use hashbang_router::prelude::*;
    /// assert_eq!(HashSyntax::HashBang.fragment("/users"), "#!/users");
    /// ```
    #[must_use]
    pub fn fragment(&self, path: &str) -> String {
        format!("{}{path}", self.as_str())
    }
}

impl Display for HashSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use hashbang_router::prelude::*;
/// # use std::time::Duration;
/// let cfg = RouterConfig::default()
///     .hash_syntax(HashSyntax::Hash)
///     .settle_delay(Duration::from_millis(50))
///     .on_update(|state| println!("now at {:?}", state.current()));
/// ```
#[derive(Clone)]
pub struct RouterConfig {
    pub(crate) hash_syntax: HashSyntax,
    pub(crate) settle_delay: Duration,
    pub(crate) on_update: Option<RoutingCallback>,
    pub(crate) on_initial_render: Option<RoutingCallback>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hash_syntax: HashSyntax::default(),
            settle_delay: Duration::from_millis(100),
            on_update: None,
            on_initial_render: None,
        }
    }
}

impl RouterConfig {
    /// The token between `#` and the route path.
    ///
    /// Defaults to [`HashSyntax::HashBang`].
    pub fn hash_syntax(self, hash_syntax: HashSyntax) -> Self {
        Self {
            hash_syntax,
            ..self
        }
    }

    /// How long the router waits before listening to URL changes again, once a transition is over.
    ///
    /// This absorbs the `hashchange` notifications caused by the router's own URL corrections and
    /// keeps new transitions from starting while the loading gate is still fading out.
    ///
    /// Defaults to 100ms.
    pub fn settle_delay(self, settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            ..self
        }
    }

    /// A function to be called whenever a route change completed.
    ///
    /// The callback is invoked once the view of the new route has rendered, before the loading gate
    /// is asked to hide. It is not called for URL corrections that do not load a route.
    ///
    /// Defaults to [`None`].
    pub fn on_update(self, callback: impl Fn(&RouteState) + 'static) -> Self {
        Self {
            on_update: Some(Rc::new(callback)),
            ..self
        }
    }

    /// A function to be called once, when the view of the very first route has rendered.
    ///
    /// Runs before the first [`on_update`](Self::on_update) call.
    ///
    /// Defaults to [`None`].
    pub fn on_initial_render(self, callback: impl Fn(&RouteState) + 'static) -> Self {
        Self {
            on_initial_render: Some(Rc::new(callback)),
            ..self
        }
    }

    /// The configured hash syntax.
    #[must_use]
    pub fn current_hash_syntax(&self) -> HashSyntax {
        self.hash_syntax
    }

    /// The configured settle delay.
    #[must_use]
    pub fn current_settle_delay(&self) -> Duration {
        self.settle_delay
    }
}

use crate::error::{ConfigError, MatchError};
use crate::path;
use crate::resolve::{Match, Resolve};
use crate::route::Route;
use crate::tree::{self, Node, Outcome, Segment};

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// What a delegation boundary does when its registered delegate reports no
/// match for the suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DelegateMiss {
    /// Keep the boundary as a valid matched prefix and report the suffix
    /// as remaining, so some later fallback can still resolve it.
    #[default]
    Defer,
    /// Drop the boundary candidate. Matching backtracks to less specific
    /// routes and may end in [`MatchError::NotFound`].
    NotFound,
}

pub(crate) type DelegateMap<T> = HashMap<String, Box<dyn Resolve<T> + Send + Sync>>;

/// Everything a match descent needs besides the tree itself.
pub(crate) struct MatchCtx<'r, T> {
    pub(crate) delegates: &'r DelegateMap<T>,
    pub(crate) miss: DelegateMiss,
}

/// A compiled route table.
///
/// Routes are registered up front as [`Route`] trees and compiled
/// immediately; [`at`](Router::at) then resolves paths against the table
/// without any interior mutation, so a shared router can serve lookups
/// from many threads at once.
///
/// ```
/// use handoff::{Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.insert(Route::new("/").handler("home"))?;
/// router.insert(Route::new("/users/:id").handler("user"))?;
///
/// let matched = router.at("/users/978")?;
/// assert_eq!(matched.params.get("id"), Some("978"));
/// assert_eq!(matched.handler(), Some(&"user"));
/// # Ok(())
/// # }
/// ```
pub struct Router<T> {
    root: Node<T>,
    delegates: DelegateMap<T>,
    /// Policy applied when a registered delegate has no match for the
    /// suffix handed to it.
    pub delegate_miss: DelegateMiss,
}

impl<T> Router<T> {
    /// Construct a new router.
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            delegates: HashMap::new(),
            delegate_miss: DelegateMiss::default(),
        }
    }

    /// Builds a router from a sequence of top-level routes.
    ///
    /// ```
    /// use handoff::{Route, Router};
    ///
    /// let router = Router::from_routes([
    ///     Route::new("/").handler("home"),
    ///     Route::new("/about").handler("about"),
    /// ])?;
    /// # Ok::<(), handoff::ConfigError>(())
    /// ```
    pub fn from_routes(routes: impl IntoIterator<Item = Route<T>>) -> Result<Self, ConfigError> {
        let mut router = Self::new();
        for route in routes {
            router.insert(route)?;
        }
        Ok(router)
    }

    /// Registers a top-level route and compiles it, along with all of its
    /// children, into the table.
    ///
    /// Fails without modifying the table when the route tree is malformed
    /// or a route in it cannot be told apart from one already registered.
    pub fn insert(&mut self, route: Route<T>) -> Result<(), ConfigError> {
        let node = Node::compile(route, "")?;
        debug!("registering route {}", node.pattern());
        self.root.adopt(node)
    }

    /// Moves all routes and delegates of `other` into this router.
    ///
    /// On conflict nothing is transferred and the error names the route
    /// already present.
    ///
    /// ```
    /// use handoff::{Route, Router};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut app = Router::from_routes([Route::new("/").handler("home")])?;
    /// let admin = Router::from_routes([Route::new("/admin/:section").handler("admin")])?;
    ///
    /// app.merge(admin)?;
    /// assert_eq!(app.at("/admin/users")?.handler(), Some(&"admin"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(&mut self, other: Router<T>) -> Result<(), ConfigError> {
        let Router {
            root, delegates, ..
        } = other;

        self.root.adopt_all(root.into_children())?;
        self.delegates.extend(delegates);
        Ok(())
    }

    /// Registers `target` as the delegate behind the boundary with the
    /// given pattern, replacing any previous delegate for it.
    ///
    /// The pattern must name a splat boundary that already exists
    /// somewhere in the table, written out in full from the root, for
    /// example `/blog/*`. A registered delegate takes precedence over
    /// children compiled into the boundary itself.
    ///
    /// ```
    /// use handoff::{Route, Router};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut app = Router::new();
    /// app.insert(Route::new("/blog/*").handler("blog shell"))?;
    ///
    /// let blog = Router::from_routes([
    ///     Route::index().handler("blog index"),
    ///     Route::new(":slug").handler("blog post"),
    /// ])?;
    /// app.delegate("/blog/*", blog)?;
    ///
    /// let matched = app.at("/blog/rust-tips")?;
    /// assert_eq!(matched.handler(), Some(&"blog post"));
    /// assert_eq!(matched.params.get("slug"), Some("rust-tips"));
    /// assert_eq!(matched.remaining, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn delegate(
        &mut self,
        pattern: &str,
        target: impl Resolve<T> + Send + Sync + 'static,
    ) -> Result<(), ConfigError> {
        let key = boundary_key(pattern)?;
        if !self.root.has_boundary(&key) {
            return Err(ConfigError::NoSuchBoundary {
                pattern: pattern.to_owned(),
            });
        }

        debug!("delegating {} to a new target", key);
        self.delegates.insert(key, Box::new(target));
        Ok(())
    }

    /// Removes the delegate registered for the given boundary pattern.
    ///
    /// Returns whether one was registered. Matches through the boundary
    /// fall back to its compiled-in children, or defer when it has none.
    pub fn undelegate(&mut self, pattern: &str) -> bool {
        match boundary_key(pattern) {
            Ok(key) => self.delegates.remove(&key).is_some(),
            Err(_) => false,
        }
    }

    /// Resolves a path against the table.
    ///
    /// The returned match holds the whole chain of routes along the
    /// matched branch. When the path runs into a splat boundary no
    /// delegate has resolved, the match is still returned with
    /// [`remaining`](Match::remaining) set to the unresolved suffix.
    pub fn at<'r, 'p>(&'r self, path: &'p str) -> Result<Match<'r, 'p, T>, MatchError> {
        let spans = path::split(path);
        let ctx = MatchCtx {
            delegates: &self.delegates,
            miss: self.delegate_miss,
        };

        let mut chain = Vec::new();
        match self.root.find(path, &spans, 0, &ctx, &mut chain) {
            Some(Outcome::Full) => Ok(Match::from_routes(chain, None)),
            Some(Outcome::Deferred(rest)) => Ok(Match::from_routes(chain, Some(rest))),
            None => Err(MatchError::NotFound),
        }
    }
}

impl<T> Resolve<T> for Router<T> {
    fn resolve<'s, 'p>(&'s self, path: &'p str) -> Result<Match<'s, 'p, T>, MatchError> {
        self.at(path)
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("root", &self.root)
            .field("delegates", &self.delegates.keys())
            .field("delegate_miss", &self.delegate_miss)
            .finish()
    }
}

// Normalizes a user-supplied boundary pattern to the composed form used as
// the registry key.
fn boundary_key(pattern: &str) -> Result<String, ConfigError> {
    let segments = tree::parse_pattern(pattern)?;
    if !matches!(segments.last(), Some(Segment::Splat)) {
        return Err(ConfigError::NoSuchBoundary {
            pattern: pattern.to_owned(),
        });
    }
    Ok(tree::pattern_of("", &segments))
}

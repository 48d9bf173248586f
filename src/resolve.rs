use crate::error::MatchError;
use crate::params::Params;

/// A strategy that a splat boundary can hand the rest of a path to.
///
/// [`Router`](crate::Router) implements this trait, so routers nest
/// directly. Implementing it by hand lets an arbitrary resolver sit behind
/// a boundary, which is how a table that has not been migrated yet keeps
/// answering for its old prefix:
///
/// ```
/// use handoff::{Match, MatchError, MatchedRoute, Params, Resolve};
///
/// struct PrefixTable {
///     entries: Vec<(String, &'static str)>,
/// }
///
/// impl Resolve<&'static str> for PrefixTable {
///     fn resolve<'s, 'p>(
///         &'s self,
///         path: &'p str,
///     ) -> Result<Match<'s, 'p, &'static str>, MatchError> {
///         for (prefix, handler) in &self.entries {
///             if let Some(rest) = path.strip_prefix(prefix.as_str()) {
///                 let route = MatchedRoute {
///                     handler: Some(handler),
///                     pattern: prefix.as_str(),
///                     matched: &path[..prefix.len()],
///                     params: Params::new(),
///                     index: false,
///                     boundary: false,
///                 };
///                 let remaining = (!rest.is_empty()).then_some(rest);
///                 return Ok(Match::from_routes(vec![route], remaining));
///             }
///         }
///         Err(MatchError::NotFound)
///     }
/// }
/// ```
pub trait Resolve<T> {
    /// Resolves a rooted path against this strategy.
    ///
    /// On success the returned match carries the chain of routes that
    /// consumed the path, plus any suffix the strategy itself could not
    /// resolve.
    fn resolve<'s, 'p>(&'s self, path: &'p str) -> Result<Match<'s, 'p, T>, MatchError>;
}

/// One level of a successful match: a route that consumed part of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<'r, 'p, T> {
    /// The handler attached to this route, if any.
    pub handler: Option<&'r T>,
    /// The route's full pattern, composed from the root of its own tree.
    pub pattern: &'r str,
    /// The concrete path text consumed by this route's own segments.
    pub matched: &'p str,
    /// The parameters bound at this level.
    pub params: Params<'r, 'p>,
    /// Whether this is an index route.
    pub index: bool,
    /// Whether this route ends in a splat and so forms a delegation
    /// boundary.
    pub boundary: bool,
}

/// A successful match, assembled from every route along the matched branch.
///
/// The chain is ordered from the outermost route to the leaf. Each level
/// keeps the parameters it bound itself; [`params`](Match::params) is the
/// merged view, with deeper bindings shadowing shallower ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'r, 'p, T> {
    /// The matched routes, outermost first.
    pub routes: Vec<MatchedRoute<'r, 'p, T>>,
    /// All parameters bound along the chain.
    pub params: Params<'r, 'p>,
    /// The rooted suffix still waiting for a delegate, when the leaf is a
    /// boundary whose target has not resolved it.
    pub remaining: Option<&'p str>,
}

impl<'r, 'p, T> Match<'r, 'p, T> {
    /// Assembles a match from a chain of matched routes.
    ///
    /// The merged parameter view is built here; when two levels bind the
    /// same key, the deeper one wins.
    pub fn from_routes(routes: Vec<MatchedRoute<'r, 'p, T>>, remaining: Option<&'p str>) -> Self {
        let mut params = Params::new();
        for route in &routes {
            for (key, value) in route.params.iter() {
                params.insert(key, value);
            }
        }

        Match {
            routes,
            params,
            remaining,
        }
    }

    /// Returns the innermost matched route.
    pub fn leaf(&self) -> Option<&MatchedRoute<'r, 'p, T>> {
        self.routes.last()
    }

    /// Returns the handler of the innermost matched route.
    pub fn handler(&self) -> Option<&'r T> {
        self.routes.last().and_then(|route| route.handler)
    }

    /// Whether resolution stopped at a boundary that still has path left
    /// over for a delegate.
    pub fn is_deferred(&self) -> bool {
        self.remaining.is_some()
    }
}

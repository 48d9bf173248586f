/// A single route definition: a path pattern, an optional handler, and any
/// nested child routes.
///
/// Routes use a builder-like pattern for configuration and are registered
/// with a [`Router`](crate::Router), which compiles the whole tree up
/// front. The handler type `T` is opaque to the router; it is handed back
/// by reference on a successful match.
///
/// Patterns are made of `/`-separated segments. A segment is either a
/// literal, a `:name` parameter binding exactly one segment, or a trailing
/// `*` splat that swallows the rest of the path. Child patterns are
/// relative to their parent.
///
/// ```
/// use handoff::Route;
///
/// let route = Route::new("/users/:id")
///     .handler("user")
///     .child(Route::index().handler("profile"))
///     .child(Route::new("posts").handler("posts"));
/// ```
///
/// With the `serde` feature enabled, route trees can also be deserialized
/// from configuration:
///
/// ```json
/// { "path": "/users/:id", "handler": "user", "children": [
///     { "index": true, "handler": "profile" },
///     { "path": "posts", "handler": "posts" }
/// ] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route<T> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) index: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) handler: Option<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) children: Vec<Route<T>>,
}

impl<T> Route<T> {
    /// Creates a route matching the given path pattern.
    pub fn new(path: impl Into<String>) -> Self {
        Route {
            path: Some(path.into()),
            index: false,
            handler: None,
            children: Vec::new(),
        }
    }

    /// Creates an index route.
    ///
    /// An index route matches when the path stops exactly at its parent,
    /// letting the parent render something at its own terminus. Index
    /// routes cannot have children of their own.
    pub fn index() -> Self {
        Route {
            path: None,
            index: true,
            handler: None,
            children: Vec::new(),
        }
    }

    /// Creates a pathless layout route.
    ///
    /// A layout consumes no path input of its own. It groups its children
    /// under a shared handler, and the children compete for matches as if
    /// they were registered at the layout's position.
    pub fn layout() -> Self {
        Route {
            path: None,
            index: false,
            handler: None,
            children: Vec::new(),
        }
    }

    /// Attaches the handler reported when this route is part of a match.
    pub fn handler(mut self, handler: T) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Appends a child route.
    pub fn child(mut self, child: Route<T>) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a sequence of child routes, preserving their order.
    pub fn children(mut self, children: impl IntoIterator<Item = Route<T>>) -> Self {
        self.children.extend(children);
        self
    }
}

//! A nested route matcher with incremental hand-off between route trees.
//!
//! Routes are declared as a tree, compiled once, and matched against
//! concrete paths. A successful match returns the whole branch that
//! consumed the path, outermost route first, along with every parameter
//! bound on the way down. Routes ending in a splat form *boundaries*:
//! whatever comes after the boundary can be resolved by a nested tree, by
//! a separately registered resolver, or left for someone else entirely.
//! That last option is what makes piecewise migrations work, as a path
//! prefix can move into the table while the rest of the old system keeps
//! answering for the suffix.
//!
//! ```rust
//! use handoff::{Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.insert(Route::new("/").handler("home"))?;
//! router.insert(Route::new("/users/:id").handler("user"))?;
//!
//! let matched = router.at("/users/978")?;
//! assert_eq!(matched.handler(), Some(&"user"));
//! assert_eq!(matched.params.get("id"), Some("978"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Patterns
//!
//! Patterns are `/`-separated. Empty segments are ignored, so trailing or
//! doubled slashes never decide a match. A segment is one of:
//!
//! - A **literal**, matching exactly itself: `/about`.
//! - A **parameter**, `:name`, matching any single non-empty segment and
//!   binding it under `name`.
//! - A **splat**, a trailing bare `*`, matching the entire rest of the
//!   path and binding it, without its leading slash, under `"*"`. The
//!   rest may be empty.
//!
//! ## Nesting, layouts and index routes
//!
//! Routes nest: a child's pattern is relative to its parent, and a match
//! reports the full chain from the outermost route down to the leaf.
//! Pathless [`layout`](Route::layout) routes group children without
//! consuming any input, and [`index`](Route::index) routes mark what the
//! parent shows when the path stops exactly at it:
//!
//! ```rust
//! use handoff::{Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.insert(
//!     Route::new("/settings")
//!         .handler("settings shell")
//!         .child(Route::index().handler("general"))
//!         .child(Route::new("profile").handler("profile")),
//! )?;
//!
//! let matched = router.at("/settings/profile")?;
//! let patterns: Vec<_> = matched.routes.iter().map(|route| route.pattern).collect();
//! assert_eq!(patterns, ["/settings", "/settings/profile"]);
//!
//! assert_eq!(router.at("/settings")?.handler(), Some(&"general"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Specificity
//!
//! When several routes could accept a path, more specific patterns win:
//! more literal segments first, then more parameters, and a splat ranks a
//! pattern below an otherwise equal one without it. Routes that still tie
//! are tried in declaration order, and matching backtracks, so an
//! over-eager branch never hides a valid one:
//!
//! ```rust
//! use handoff::{Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.insert(Route::new("/posts/recent").handler("recent"))?;
//! router.insert(Route::new("/posts/:id").handler("post"))?;
//! router.insert(Route::new("/posts/*").handler("posts"))?;
//!
//! assert_eq!(router.at("/posts/recent")?.handler(), Some(&"recent"));
//! assert_eq!(router.at("/posts/9")?.handler(), Some(&"post"));
//! assert_eq!(router.at("/posts/9/comments")?.handler(), Some(&"posts"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Hand-off at boundaries
//!
//! A route ending in a splat is a delegation boundary. On a match the
//! suffix past the boundary, re-rooted with a leading slash, is resolved
//! in this order: a delegate registered with
//! [`delegate`](Router::delegate), then children nested under the
//! boundary route, and otherwise the match is returned as is with
//! [`remaining`](Match::remaining) holding the suffix. A deferred match
//! is not an error; it says "this much is mine, the rest is someone
//! else's problem":
//!
//! ```rust
//! use handoff::{Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = Router::new();
//! app.insert(Route::new("/").handler("home"))?;
//! app.insert(Route::new("/blog/*").handler("blog shell"))?;
//!
//! // nothing resolves the suffix yet
//! let matched = app.at("/blog/rust-tips")?;
//! assert_eq!(matched.remaining, Some("/rust-tips"));
//!
//! // plug in a router for the subtree
//! let blog = Router::from_routes([
//!     Route::index().handler("blog index"),
//!     Route::new(":slug").handler("blog post"),
//! ])?;
//! app.delegate("/blog/*", blog)?;
//!
//! let matched = app.at("/blog/rust-tips")?;
//! assert_eq!(matched.remaining, None);
//! assert_eq!(matched.handler(), Some(&"blog post"));
//! assert_eq!(matched.params.get("slug"), Some("rust-tips"));
//! # Ok(())
//! # }
//! ```
//!
//! Any type implementing [`Resolve`] can sit behind a boundary, not just
//! another [`Router`], so a hand-rolled adapter over a legacy table works
//! the same way.
//!
//! ## Crate features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`Route`], so whole
//!   route tables can be loaded from configuration. Disabled by default.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod error;
mod params;
mod path;
mod resolve;
mod route;
mod router;
mod tree;

pub use error::{ConfigError, GenerateError, MatchError};
pub use params::{Params, ParamsIter};
pub use path::generate_path;
pub use resolve::{Match, MatchedRoute, Resolve};
pub use route::Route;
pub use router::{DelegateMiss, Router};

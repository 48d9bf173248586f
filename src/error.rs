use std::fmt;

/// Represents errors that can occur when building a route table.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConfigError {
    /// Attempted to register a route that cannot be told apart from a
    /// previously registered sibling.
    Conflict {
        /// The pattern of the conflicting sibling.
        with: String,
    },
    /// Index routes terminate at their parent and cannot have children.
    IndexWithChildren,
    /// Index routes cannot declare a path pattern.
    IndexWithPath,
    /// A splat is only allowed as the whole final segment of a pattern.
    InvalidSplat,
    /// Parameter segments must consist of `:` followed by a name.
    InvalidParam,
    /// Attempted to delegate through a pattern that is not a splat boundary
    /// of this router.
    NoSuchBoundary {
        /// The pattern that was looked up.
        pattern: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { with } => {
                write!(
                    f,
                    "route conflicts with previously registered sibling: {}",
                    with
                )
            }
            Self::IndexWithChildren => write!(f, "index routes cannot have children"),
            Self::IndexWithPath => write!(f, "index routes cannot declare a path"),
            Self::InvalidSplat => write!(
                f,
                "a splat is only allowed as the whole final segment of a pattern"
            ),
            Self::InvalidParam => write!(f, "parameters must be registered as ':name' segments"),
            Self::NoSuchBoundary { pattern } => {
                write!(f, "no delegation boundary matches pattern: {}", pattern)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A failed match attempt.
///
/// Not finding a route is a normal terminal state, distinct from the
/// configuration errors raised while building the table: callers are
/// expected to fall back to their own not-found handling.
///
/// ```
/// use handoff::{MatchError, Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.insert(Route::new("/home").handler("Welcome!"))?;
/// router.insert(Route::new("/blog").handler("Our blog."))?;
///
/// // no routes match
/// if let Err(err) = router.at("/foobar") {
///     assert_eq!(err, MatchError::NotFound);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatchError {
    /// No matching route was found.
    NotFound,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matching route not found")
    }
}

impl std::error::Error for MatchError {}

/// Represents errors that can occur when generating a concrete path from a
/// pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GenerateError {
    /// The pattern names a parameter the provided values do not cover.
    MissingParam {
        /// The name of the missing parameter.
        name: String,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParam { name } => {
                write!(f, "no value provided for parameter ':{}'", name)
            }
        }
    }
}

impl std::error::Error for GenerateError {}

use crate::error::{ConfigError, MatchError};
use crate::params::Params;
use crate::path::{self, Span};
use crate::resolve::{Match, MatchedRoute};
use crate::route::Route;
use crate::router::{DelegateMiss, MatchCtx};

use std::cmp::Ordering;

use tracing::trace;

/// One compiled segment of a route pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Param(String),
    Splat,
}

/// How specific a pattern is. Patterns with more literal segments rank
/// first, then patterns with more parameters, and a trailing splat ranks a
/// pattern below an otherwise equal one without it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Score {
    literals: u16,
    params: u16,
    splat: bool,
}

impl Score {
    fn of(segments: &[Segment]) -> Score {
        let mut score = Score::default();
        for segment in segments {
            match segment {
                Segment::Literal(_) => score.literals = score.literals.saturating_add(1),
                Segment::Param(_) => score.params = score.params.saturating_add(1),
                Segment::Splat => score.splat = true,
            }
        }
        score
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literals
            .cmp(&other.literals)
            .then(self.params.cmp(&other.params))
            .then(other.splat.cmp(&self.splat))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Matches its own segments.
    Path,
    /// Matches when the path stops exactly at the parent.
    Index,
    /// Consumes no input, only groups its children.
    Layout,
}

/// A possible descent from a node: the index path to one non-layout child,
/// routing through any pathless layouts in between.
#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    steps: Vec<usize>,
}

/// A compiled route tree node.
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// The full pattern from the root of this tree, used in conflict
    /// errors, match output and delegate lookups.
    pattern: String,
    kind: NodeKind,
    segments: Vec<Segment>,
    score: Score,
    handler: Option<T>,
    children: Vec<Node<T>>,
    /// Descent order, precomputed: layout children are flattened in and
    /// everything is sorted by specificity, with declaration order
    /// breaking ties.
    candidates: Vec<Candidate>,
    /// The nested tree compiled from the children of a splat boundary. It
    /// is matched against the re-rooted suffix instead of continuing in
    /// place.
    target: Option<Box<Node<T>>>,
}

/// The result of matching a branch.
pub(crate) enum Outcome<'p> {
    /// Every segment was consumed by compiled routes.
    Full,
    /// The branch ends at a boundary whose suffix nobody has resolved.
    Deferred(&'p str),
}

impl<T> Node<T> {
    fn empty(pattern: String) -> Node<T> {
        Node {
            pattern,
            kind: NodeKind::Path,
            segments: Vec::new(),
            score: Score::default(),
            handler: None,
            children: Vec::new(),
            candidates: Vec::new(),
            target: None,
        }
    }

    /// Creates the synthetic root of a tree.
    pub(crate) fn root() -> Node<T> {
        let mut node = Node::empty(String::new());
        node.kind = NodeKind::Layout;
        node
    }

    /// Compiles a route definition into a node nested under `parent`.
    pub(crate) fn compile(route: Route<T>, parent: &str) -> Result<Node<T>, ConfigError> {
        let Route {
            path,
            index,
            handler,
            children,
        } = route;

        if index {
            if path.is_some() {
                return Err(ConfigError::IndexWithPath);
            }
            if !children.is_empty() {
                return Err(ConfigError::IndexWithChildren);
            }

            let mut node = Node::empty(pattern_of(parent, &[]));
            node.kind = NodeKind::Index;
            node.handler = handler;
            return Ok(node);
        }

        let (kind, segments) = match &path {
            Some(path) => (NodeKind::Path, parse_pattern(path)?),
            None => (NodeKind::Layout, Vec::new()),
        };

        let mut node = Node::empty(pattern_of(parent, &segments));
        node.kind = kind;
        node.score = Score::of(&segments);
        node.segments = segments;
        node.handler = handler;

        if node.is_boundary() {
            if !children.is_empty() {
                // children of a boundary form their own tree, matched
                // against the re-rooted suffix instead of in place
                let base = node.pattern[..node.pattern.len() - 2].to_owned();
                node.target = Some(Box::new(Node::compile_target(children, &base)?));
            }
        } else {
            node.children = compile_children(children, &node.pattern)?;
            node.candidates = build_candidates(&node.children);
        }

        Ok(node)
    }

    fn compile_target(routes: Vec<Route<T>>, base: &str) -> Result<Node<T>, ConfigError> {
        let mut root = Node::root();
        root.pattern = base.to_owned();
        root.children = compile_children(routes, base)?;
        root.candidates = build_candidates(&root.children);
        Ok(root)
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this node's pattern ends in a splat.
    pub(crate) fn is_boundary(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Splat))
    }

    /// Whether a boundary with this exact pattern exists anywhere in the
    /// tree, including inside nested targets.
    pub(crate) fn has_boundary(&self, pattern: &str) -> bool {
        (self.is_boundary() && self.pattern == pattern)
            || self.children.iter().any(|child| child.has_boundary(pattern))
            || self
                .target
                .as_ref()
                .is_some_and(|target| target.has_boundary(pattern))
    }

    /// Adds a compiled node as a child, rejecting conflicts with existing
    /// siblings.
    pub(crate) fn adopt(&mut self, node: Node<T>) -> Result<(), ConfigError> {
        check_conflict(&self.children, &node)?;
        self.children.push(node);
        self.candidates = build_candidates(&self.children);
        Ok(())
    }

    /// Adds a batch of compiled siblings, all-or-nothing. The batch is
    /// assumed to be conflict-free among itself.
    pub(crate) fn adopt_all(&mut self, nodes: Vec<Node<T>>) -> Result<(), ConfigError> {
        for node in &nodes {
            check_conflict(&self.children, node)?;
        }
        self.children.extend(nodes);
        self.candidates = build_candidates(&self.children);
        Ok(())
    }

    pub(crate) fn into_children(self) -> Vec<Node<T>> {
        self.children
    }

    /// Extends the match at this node, whose own entry is already on the
    /// chain. Children are tried in candidate order before the node itself
    /// is considered as the leaf.
    ///
    /// Returns `None` when nothing below matched; the caller unwinds the
    /// chain.
    pub(crate) fn find<'r, 'p>(
        &'r self,
        path: &'p str,
        spans: &[Span<'p>],
        at: usize,
        ctx: &MatchCtx<'r, T>,
        chain: &mut Vec<MatchedRoute<'r, 'p, T>>,
    ) -> Option<Outcome<'p>> {
        for candidate in &self.candidates {
            let depth = chain.len();
            if let Some(outcome) = self.try_candidate(candidate, path, spans, at, ctx, chain) {
                return Some(outcome);
            }
            chain.truncate(depth);
        }

        // the node itself is the leaf when it has a handler and no path
        // is left over
        if at == spans.len() && self.handler.is_some() {
            return Some(Outcome::Full);
        }

        None
    }

    fn try_candidate<'r, 'p>(
        &'r self,
        candidate: &Candidate,
        path: &'p str,
        spans: &[Span<'p>],
        at: usize,
        ctx: &MatchCtx<'r, T>,
        chain: &mut Vec<MatchedRoute<'r, 'p, T>>,
    ) -> Option<Outcome<'p>> {
        let (&last, hops) = candidate.steps.split_last()?;

        // walk through the pathless layouts on the way to the candidate
        let mut cur = self;
        for &hop in hops {
            cur = &cur.children[hop];
            chain.push(MatchedRoute {
                handler: cur.handler.as_ref(),
                pattern: cur.pattern.as_str(),
                matched: "",
                params: Params::new(),
                index: false,
                boundary: false,
            });
        }
        let node = &cur.children[last];

        if node.kind == NodeKind::Index {
            // index routes only fire when the path stops at the parent
            if at != spans.len() {
                return None;
            }

            chain.push(MatchedRoute {
                handler: node.handler.as_ref(),
                pattern: node.pattern.as_str(),
                matched: "",
                params: Params::new(),
                index: true,
                boundary: false,
            });
            return Some(Outcome::Full);
        }

        let mut params = Params::new();
        let mut splat_at = None;
        let mut pos = at;

        for segment in &node.segments {
            match segment {
                Segment::Literal(lit) => match spans.get(pos) {
                    Some(span) if span.text == lit.as_str() => pos += 1,
                    _ => return None,
                },
                Segment::Param(name) => match spans.get(pos) {
                    Some(span) => {
                        params.insert(name, span.text);
                        pos += 1;
                    }
                    None => return None,
                },
                Segment::Splat => {
                    // swallows the rest of the path, which may be empty
                    splat_at = Some(pos);
                    let value = match spans.get(pos) {
                        Some(span) => &path[span.start..],
                        None => "",
                    };
                    params.insert("*", value);
                    pos = spans.len();
                }
            }
        }

        let matched = if pos > at {
            let start = spans[at].start;
            let end = match splat_at {
                Some(_) => path.len(),
                None => spans[pos - 1].start + spans[pos - 1].text.len(),
            };
            &path[start..end]
        } else {
            ""
        };

        chain.push(MatchedRoute {
            handler: node.handler.as_ref(),
            pattern: node.pattern.as_str(),
            matched,
            params,
            index: false,
            boundary: splat_at.is_some(),
        });

        let splat_at = match splat_at {
            Some(splat_at) => splat_at,
            None => return node.find(path, spans, pos, ctx, chain),
        };

        // a splat makes this node a delegation boundary: the suffix is
        // handed over re-rooted, keeping its leading separator
        let suffix = match spans.get(splat_at) {
            Some(span) => path::suffix_from(path, *span),
            None => "/",
        };

        if let Some(delegate) = ctx.delegates.get(node.pattern.as_str()) {
            return match delegate.resolve(suffix) {
                Ok(sub) => {
                    let Match {
                        routes, remaining, ..
                    } = sub;
                    chain.extend(routes);
                    Some(match remaining {
                        Some(rest) => Outcome::Deferred(rest),
                        None => Outcome::Full,
                    })
                }
                Err(MatchError::NotFound) => match ctx.miss {
                    DelegateMiss::Defer => Some(Outcome::Deferred(suffix)),
                    DelegateMiss::NotFound => None,
                },
            };
        }

        if let Some(target) = &node.target {
            let sub_spans = path::split(suffix);
            return match target.find(suffix, &sub_spans, 0, ctx, chain) {
                Some(outcome) => Some(outcome),
                None => match ctx.miss {
                    DelegateMiss::Defer => Some(Outcome::Deferred(suffix)),
                    DelegateMiss::NotFound => None,
                },
            };
        }

        trace!("no delegate for {}, deferring {}", node.pattern, suffix);
        Some(Outcome::Deferred(suffix))
    }
}

fn compile_children<T>(routes: Vec<Route<T>>, parent: &str) -> Result<Vec<Node<T>>, ConfigError> {
    let mut children: Vec<Node<T>> = Vec::new();
    for route in routes {
        let node = Node::compile(route, parent)?;
        check_conflict(&children, &node)?;
        children.push(node);
    }
    Ok(children)
}

fn check_conflict<T>(siblings: &[Node<T>], node: &Node<T>) -> Result<(), ConfigError> {
    if node.kind == NodeKind::Layout {
        return Ok(());
    }

    for sibling in siblings {
        if sibling.kind == NodeKind::Layout {
            continue;
        }
        if indistinct(sibling, node) {
            return Err(ConfigError::Conflict {
                with: sibling.pattern.clone(),
            });
        }
    }

    Ok(())
}

// Two sibling routes conflict when no input can tell them apart: their
// segments pair up with equal kinds and literals carry the same text.
// Parameter names do not differentiate patterns.
fn indistinct<T>(a: &Node<T>, b: &Node<T>) -> bool {
    if a.segments.len() != b.segments.len() {
        return false;
    }

    a.segments
        .iter()
        .zip(&b.segments)
        .all(|(x, y)| match (x, y) {
            (Segment::Literal(x), Segment::Literal(y)) => x == y,
            (Segment::Param(_), Segment::Param(_)) => true,
            (Segment::Splat, Segment::Splat) => true,
            _ => false,
        })
}

fn build_candidates<T>(children: &[Node<T>]) -> Vec<Candidate> {
    fn walk<T>(children: &[Node<T>], prefix: &mut Vec<usize>, out: &mut Vec<Candidate>) {
        for (i, child) in children.iter().enumerate() {
            prefix.push(i);
            if child.kind == NodeKind::Layout {
                walk(&child.children, prefix, out);
            } else {
                out.push(Candidate {
                    steps: prefix.clone(),
                });
            }
            prefix.pop();
        }
    }

    let mut candidates = Vec::new();
    walk(children, &mut Vec::new(), &mut candidates);

    // stable sort, so declaration order breaks specificity ties
    candidates.sort_by(|a, b| {
        let a = node_at(children, &a.steps).score;
        let b = node_at(children, &b.steps).score;
        b.cmp(&a)
    });

    candidates
}

fn node_at<'a, T>(children: &'a [Node<T>], steps: &[usize]) -> &'a Node<T> {
    let mut node = &children[steps[0]];
    for &step in &steps[1..] {
        node = &node.children[step];
    }
    node
}

pub(crate) fn parse_pattern(path: &str) -> Result<Vec<Segment>, ConfigError> {
    let mut segments = Vec::new();

    for span in path::split(path) {
        let seg = span.text;

        if seg == "*" {
            segments.push(Segment::Splat);
            continue;
        }

        if let Some(name) = seg.strip_prefix(':') {
            if name.is_empty() || name.contains(':') || name.contains('*') {
                return Err(ConfigError::InvalidParam);
            }
            segments.push(Segment::Param(name.to_owned()));
            continue;
        }

        if seg.contains('*') {
            return Err(ConfigError::InvalidSplat);
        }
        if seg.contains(':') {
            return Err(ConfigError::InvalidParam);
        }

        segments.push(Segment::Literal(seg.to_owned()));
    }

    if let Some(at) = segments.iter().position(|seg| *seg == Segment::Splat) {
        if at != segments.len() - 1 {
            return Err(ConfigError::InvalidSplat);
        }
    }

    Ok(segments)
}

/// Renders the full pattern of a node from its parent's pattern and its
/// own segments.
pub(crate) fn pattern_of(parent: &str, segments: &[Segment]) -> String {
    let parent = if parent == "/" { "" } else { parent };

    if segments.is_empty() {
        if parent.is_empty() {
            return "/".to_owned();
        }
        return parent.to_owned();
    }

    let mut out = String::from(parent);
    for segment in segments {
        out.push('/');
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Param(name) => {
                out.push(':');
                out.push_str(name);
            }
            Segment::Splat => out.push('*'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(routes: Vec<Route<&'static str>>) -> Node<&'static str> {
        let mut root = Node::root();
        for route in routes {
            let node = Node::compile(route, "").unwrap();
            root.adopt(node).unwrap();
        }
        root
    }

    fn candidate_patterns<'a>(node: &'a Node<&'static str>) -> Vec<&'a str> {
        node.candidates
            .iter()
            .map(|candidate| node_at(&node.children, &candidate.steps).pattern())
            .collect()
    }

    #[test]
    fn candidates_rank_by_specificity() {
        let root = compiled(vec![
            Route::new("*").handler("splat"),
            Route::new(":page").handler("page"),
            Route::new("about").handler("about"),
        ]);

        assert_eq!(candidate_patterns(&root), ["/about", "/:page", "/*"]);
    }

    #[test]
    fn ties_keep_declaration_order() {
        let root = compiled(vec![
            Route::new("a/:x").handler("first"),
            Route::new(":y/b").handler("second"),
        ]);

        assert_eq!(candidate_patterns(&root), ["/a/:x", "/:y/b"]);
    }

    #[test]
    fn layouts_flatten_into_parent_candidates() {
        let root = compiled(vec![
            Route::layout()
                .handler("shell")
                .child(Route::new("settings").handler("settings")),
            Route::new(":page").handler("page"),
        ]);

        assert_eq!(candidate_patterns(&root), ["/settings", "/:page"]);
        assert_eq!(root.candidates[0].steps.len(), 2);
    }

    #[test]
    fn boundary_children_become_a_target() {
        let node = Node::compile(
            Route::new("/blog/*")
                .handler("blog")
                .child(Route::new(":slug").handler("post")),
            "",
        )
        .unwrap();

        assert!(node.is_boundary());
        assert!(node.children.is_empty());

        let target = node.target.as_deref().unwrap();
        assert_eq!(target.children[0].pattern(), "/blog/:slug");
    }

    #[test]
    fn score_order() {
        let literal = Score {
            literals: 1,
            params: 0,
            splat: false,
        };
        let param = Score {
            literals: 0,
            params: 1,
            splat: false,
        };
        let splat = Score {
            literals: 0,
            params: 0,
            splat: true,
        };

        assert!(literal > param);
        assert!(param > splat);
        assert!(
            Score {
                literals: 1,
                params: 1,
                splat: false
            } > literal
        );
        assert!(
            Score {
                literals: 1,
                params: 0,
                splat: true
            } < literal
        );
    }

    #[test]
    fn score_saturates_on_enormous_patterns() {
        let deep = "/x".repeat(u16::MAX as usize + 10);
        let node = Node::compile(Route::new(deep).handler("deep"), "").unwrap();
        assert_eq!(node.score.literals, u16::MAX);

        let wide = "/:p".repeat(u16::MAX as usize + 10);
        let node = Node::compile(Route::new(wide).handler("wide"), "").unwrap();
        assert_eq!(node.score.params, u16::MAX);
    }

    #[test]
    fn patterns_compose() {
        let node = Node::compile(
            Route::new("/users/:id").child(Route::new("posts/*").handler("posts")),
            "",
        )
        .unwrap();

        assert_eq!(node.pattern(), "/users/:id");
        assert_eq!(node.children[0].pattern(), "/users/:id/posts/*");
    }
}

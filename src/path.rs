use crate::error::GenerateError;

/// A non-empty path segment, with its byte offset into the original string.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Span<'p> {
    pub(crate) text: &'p str,
    pub(crate) start: usize,
}

/// Splits a path into its non-empty segments.
///
/// Empty segments are skipped, so leading, trailing and doubled slashes
/// never influence matching.
pub(crate) fn split(path: &str) -> Vec<Span<'_>> {
    let bytes = path.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'/' {
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < bytes.len() && bytes[pos] != b'/' {
            pos += 1;
        }

        spans.push(Span {
            text: &path[start..pos],
            start,
        });
    }

    spans
}

/// Returns the suffix of `path` from the given span to the end, including
/// the separator before it when one exists.
pub(crate) fn suffix_from<'p>(path: &'p str, span: Span<'p>) -> &'p str {
    if span.start > 0 && path.as_bytes()[span.start - 1] == b'/' {
        &path[span.start - 1..]
    } else {
        &path[span.start..]
    }
}

/// Generates a concrete path by substituting parameter values into a
/// pattern.
///
/// Every `:name` segment must be covered by an entry in `params`, keyed by
/// the bare name. A trailing splat takes its value from the `"*"` key and
/// may be left out, in which case it renders as nothing. Generated paths
/// always start with `/`.
///
/// ```
/// use handoff::generate_path;
///
/// let path = generate_path("/users/:id/files/*", &[("id", "7"), ("*", "a/b.png")])?;
/// assert_eq!(path, "/users/7/files/a/b.png");
///
/// let path = generate_path("/users/:id/files/*", &[("id", "7")])?;
/// assert_eq!(path, "/users/7/files");
/// # Ok::<(), handoff::GenerateError>(())
/// ```
pub fn generate_path(pattern: &str, params: &[(&str, &str)]) -> Result<String, GenerateError> {
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    };

    let mut out = String::with_capacity(pattern.len());
    for span in split(pattern) {
        let segment = span.text;

        if segment == "*" {
            let value = lookup("*").unwrap_or("");
            if !value.is_empty() {
                out.push('/');
                out.push_str(value);
            }
            continue;
        }

        if let Some(name) = segment.strip_prefix(':') {
            let value = lookup(name).ok_or_else(|| GenerateError::MissingParam {
                name: name.to_owned(),
            })?;
            out.push('/');
            out.push_str(value);
            continue;
        }

        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        out.push('/');
    }

    Ok(out)
}

//! Normalized path handling for cross-platform compatibility

use std::path::Path;

/// A path normalized to use forward slashes.
///
/// State keys are derived from this form so that the same file yields the
/// same key regardless of which separator the caller used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Reduce a caller-supplied relative path to safe forward-slash segments.
///
/// Empty, `.` and `..` segments are dropped, which also strips any leading
/// root, so the result can never escape the directory it is joined onto.
///
/// # Examples
///
/// ```
/// use artisync_fs::sanitize_relative;
///
/// assert_eq!(sanitize_relative("../../etc/passwd"), "etc/passwd");
/// assert_eq!(sanitize_relative("\\skills\\review"), "skills/review");
/// ```
pub fn sanitize_relative(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_forward_slashes() {
        let path = NormalizedPath::new("C:\\work\\agents\\a.agent.md");
        assert_eq!(path.to_string(), "C:/work/agents/a.agent.md");
    }
}

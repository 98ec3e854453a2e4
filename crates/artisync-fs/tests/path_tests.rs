//! Tests for path normalization and sanitization

use std::path::Path;

use artisync_fs::{NormalizedPath, sanitize_relative};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("my-feature", "my-feature")]
#[case("skills/my-feature", "skills/my-feature")]
#[case("/abs/dir", "abs/dir")]
#[case("../../escape", "escape")]
#[case("a/../b", "a/b")]
#[case("C:\\nested\\dir", "C:/nested/dir")]
#[case("./here/", "here")]
#[case("..", "")]
#[case("", "")]
fn sanitize_relative_cases(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(sanitize_relative(raw), expected);
}

#[test]
fn sanitized_segments_never_escape_base() {
    let base = Path::new("/work/project/.github/skills");
    let mut joined = base.to_path_buf();
    joined.extend(sanitize_relative("../../../etc/../x").split('/'));

    assert!(joined.starts_with(base));
    assert_eq!(joined, base.join("etc").join("x"));
}

#[test]
fn backslash_paths_compare_equal_to_forward_slash() {
    assert_eq!(
        NormalizedPath::new("C:\\work\\a.md"),
        NormalizedPath::new("C:/work/a.md")
    );
    assert_eq!(NormalizedPath::new("C:\\work\\a.md").as_str(), "C:/work/a.md");
}

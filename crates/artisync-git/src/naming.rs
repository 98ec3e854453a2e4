//! Repository URL to mirror directory name mapping

use std::sync::LazyLock;

use artisync_fs::checksum::short_digest;
use regex::Regex;

/// Matches the trailing `owner/repo` pair of https, ssh and scp-style URLs.
static OWNER_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^/:]+)[/:]([^/:]+?)(?:\.git)?/*$").expect("owner/repo pattern is valid")
});

/// Map a repository URL to a stable local cache directory name.
///
/// Names combine a readable `owner_repo` fragment with a short hash of the
/// full URL, so `github.com/a/tools` and `gitlab.com/b/tools` never collide.
/// URLs without a recognisable owner/repo pair fall back to `repo_<hash>`.
///
/// # Examples
///
/// ```
/// use artisync_git::mirror_name;
///
/// let name = mirror_name("https://github.com/octo/prompts.git");
/// assert!(name.starts_with("octo_prompts_"));
/// assert_eq!(name, mirror_name("https://github.com/octo/prompts.git"));
/// ```
pub fn mirror_name(repo_url: &str) -> String {
    let digest = short_digest(repo_url.as_bytes(), 8);

    match OWNER_REPO.captures(repo_url) {
        Some(caps) => {
            let owner = slug(&caps[1]);
            let repo = slug(&caps[2]);
            if owner.is_empty() || repo.is_empty() {
                format!("repo_{digest}")
            } else {
                format!("{owner}_{repo}_{}", &digest[..6])
            }
        }
        None => format!("repo_{digest}"),
    }
}

/// Keep only characters that are safe in a directory name on every platform.
fn slug(fragment: &str) -> String {
    fragment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .trim_matches(|c| c == '-' || c == '.')
        .to_string()
}

//! Property tests for mirror directory naming

use artisync_git::mirror_name;
use proptest::prelude::*;
use rstest::rstest;

proptest! {
    #[test]
    fn mirror_name_is_deterministic(url in "\\PC{0,80}") {
        prop_assert_eq!(mirror_name(&url), mirror_name(&url));
    }

    #[test]
    fn mirror_name_is_a_single_safe_path_segment(url in "\\PC{0,80}") {
        let name = mirror_name(&url);
        prop_assert!(!name.is_empty());
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn distinct_urls_get_distinct_names(
        owner in "[a-z]{1,12}",
        repo in "[a-z]{1,12}",
        host_a in "[a-z]{3,8}",
        host_b in "[a-z]{3,8}",
    ) {
        prop_assume!(host_a != host_b);
        let a = format!("https://{host_a}.com/{owner}/{repo}");
        let b = format!("https://{host_b}.com/{owner}/{repo}");
        prop_assert_ne!(mirror_name(&a), mirror_name(&b));
    }
}

#[rstest]
#[case("https://github.com/octo/prompts", "octo_prompts_")]
#[case("https://github.com/octo/prompts.git", "octo_prompts_")]
#[case("git@github.com:octo/prompts.git", "octo_prompts_")]
#[case("https://gitlab.example.com/group/sub/tools/", "sub_tools_")]
fn mirror_name_prefix(#[case] url: &str, #[case] prefix: &str) {
    let name = mirror_name(url);
    assert!(name.starts_with(prefix), "{url} -> {name}");
}

#[test]
fn same_final_segment_different_owner_do_not_collide() {
    assert_ne!(
        mirror_name("https://github.com/alice/prompts"),
        mirror_name("https://github.com/bob/prompts")
    );
}

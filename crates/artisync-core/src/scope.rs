//! Choosing the state scope for an install target

use std::path::{Path, PathBuf};

use crate::state::Scope;

/// Decides which [`Scope`] holds the install record of a target path.
pub trait ScopePolicy {
    fn scope_for(&self, target: &Path) -> Scope;
}

/// Any `Fn(&Path) -> bool` is a policy; `true` selects [`Scope::Global`].
impl<F> ScopePolicy for F
where
    F: Fn(&Path) -> bool,
{
    fn scope_for(&self, target: &Path) -> Scope {
        if self(target) {
            Scope::Global
        } else {
            Scope::Workspace
        }
    }
}

/// Targets under any of the configured roots are global, everything else
/// belongs to the workspace.
#[derive(Debug, Clone, Default)]
pub struct GlobalRoots {
    roots: Vec<PathBuf>,
}

impl GlobalRoots {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl ScopePolicy for GlobalRoots {
    fn scope_for(&self, target: &Path) -> Scope {
        // Path::starts_with compares whole components, so /a/bc is not under /a/b
        if self.roots.iter().any(|root| target.starts_with(root)) {
            Scope::Global
        } else {
            Scope::Workspace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_policy() {
        let policy = |p: &Path| p.ends_with("global.md");
        assert_eq!(policy.scope_for(Path::new("/x/global.md")), Scope::Global);
        assert_eq!(policy.scope_for(Path::new("/x/local.md")), Scope::Workspace);
    }

    #[test]
    fn global_roots_match_whole_components() {
        let policy = GlobalRoots::new([PathBuf::from("/home/u/prompts")]);

        assert_eq!(
            policy.scope_for(Path::new("/home/u/prompts/a.agent.md")),
            Scope::Global
        );
        assert_eq!(
            policy.scope_for(Path::new("/home/u/prompts-old/a.agent.md")),
            Scope::Workspace
        );
    }

    #[test]
    fn no_roots_means_workspace() {
        assert_eq!(
            GlobalRoots::default().scope_for(Path::new("/anything")),
            Scope::Workspace
        );
    }
}

//! Artifact descriptors
//!
//! An [`Artifact`] identifies one agent or skill document inside a source
//! repository and points at its copy in the local mirror.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of installable document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Agent,
    Skill,
}

impl ArtifactKind {
    /// Classify a mirror file by name.
    ///
    /// `SKILL.md` and `*.skill.md` are skills, `*.agent.md` are agents.
    /// Anything else is not an artifact.
    pub fn detect(file_name: &str) -> Option<Self> {
        if file_name == "SKILL.md" || file_name.ends_with(".skill.md") {
            Some(Self::Skill)
        } else if file_name.ends_with(".agent.md") {
            Some(Self::Agent)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Skill => write!(f, "skill"),
        }
    }
}

/// An installable document published in a source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier, conventionally `<repository>:<path>`
    pub id: String,
    pub kind: ArtifactKind,
    /// Human readable name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source repository URL
    pub repository: String,
    /// Path of the document relative to the repository root
    pub path: String,
    /// Absolute path of the document inside its local mirror
    pub install_url: PathBuf,
    /// Folder the document is installed under, for folder-shaped artifacts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<String>,
}

impl Artifact {
    /// Describe a file found inside a mirror checkout.
    ///
    /// `file` must live under `mirror_root`. Skills named `SKILL.md` take the
    /// name of their parent folder as base directory, unless that folder is a
    /// generic `skills`/`skill` container.
    pub fn from_mirror_file(repository: &str, mirror_root: &Path, file: &Path) -> Result<Self> {
        let relative = file.strip_prefix(mirror_root).map_err(|_| Error::InvalidArtifact {
            message: format!(
                "{} is not inside mirror {}",
                file.display(),
                mirror_root.display()
            ),
        })?;
        let relative = relative.to_string_lossy().replace('\\', "/");

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidArtifact {
                message: format!("{} has no file name", file.display()),
            })?;
        let kind = ArtifactKind::detect(&file_name).ok_or_else(|| Error::InvalidArtifact {
            message: format!(
                "'{file_name}' is neither an agent (*.agent.md) nor a skill (SKILL.md, *.skill.md)"
            ),
        })?;

        let base_directory = if file_name == "SKILL.md" {
            Path::new(&relative)
                .parent()
                .and_then(|dir| dir.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .filter(|n| !n.eq_ignore_ascii_case("skills") && !n.eq_ignore_ascii_case("skill"))
        } else {
            None
        };

        let name = base_directory.clone().unwrap_or_else(|| {
            file_name
                .trim_end_matches(".md")
                .trim_end_matches(".agent")
                .trim_end_matches(".skill")
                .to_string()
        });

        Ok(Self {
            id: format!("{repository}:{relative}"),
            kind,
            name,
            description: None,
            repository: repository.to_string(),
            path: relative,
            install_url: file.to_path_buf(),
            base_directory,
        })
    }

    /// File name the artifact is installed under.
    pub fn file_name(&self) -> Result<String> {
        let from_path = self
            .path
            .replace('\\', "/")
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .map(str::to_string);

        from_path
            .or_else(|| {
                self.install_url
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .ok_or_else(|| Error::InvalidArtifact {
                message: format!("artifact '{}' has no file name", self.id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("SKILL.md", Some(ArtifactKind::Skill))]
    #[case("lint.skill.md", Some(ArtifactKind::Skill))]
    #[case("reviewer.agent.md", Some(ArtifactKind::Agent))]
    #[case("README.md", None)]
    #[case("skill.md", None)]
    fn detect_kind(#[case] name: &str, #[case] expected: Option<ArtifactKind>) {
        assert_eq!(ArtifactKind::detect(name), expected);
    }

    #[test]
    fn skill_folder_becomes_base_directory() {
        let root = Path::new("/mirrors/octo_prompts_abc123");
        let artifact = Artifact::from_mirror_file(
            "https://github.com/octo/prompts",
            root,
            &root.join("skills/review/SKILL.md"),
        )
        .unwrap();

        assert_eq!(artifact.kind, ArtifactKind::Skill);
        assert_eq!(artifact.base_directory.as_deref(), Some("review"));
        assert_eq!(artifact.name, "review");
        assert_eq!(artifact.path, "skills/review/SKILL.md");
        assert_eq!(
            artifact.id,
            "https://github.com/octo/prompts:skills/review/SKILL.md"
        );
    }

    #[test]
    fn generic_skills_folder_is_not_a_base_directory() {
        let root = Path::new("/m");
        let artifact =
            Artifact::from_mirror_file("r", root, &root.join("Skills/SKILL.md")).unwrap();
        assert_eq!(artifact.base_directory, None);
    }

    #[test]
    fn agent_has_no_base_directory() {
        let root = Path::new("/m");
        let artifact =
            Artifact::from_mirror_file("r", root, &root.join("agents/reviewer.agent.md")).unwrap();

        assert_eq!(artifact.kind, ArtifactKind::Agent);
        assert_eq!(artifact.base_directory, None);
        assert_eq!(artifact.name, "reviewer");
        assert_eq!(artifact.file_name().unwrap(), "reviewer.agent.md");
    }

    #[test]
    fn file_outside_mirror_is_rejected() {
        let err = Artifact::from_mirror_file("r", Path::new("/m"), Path::new("/elsewhere/a.agent.md"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact { .. }));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ArtifactKind::Skill).unwrap(), "\"skill\"");
    }
}

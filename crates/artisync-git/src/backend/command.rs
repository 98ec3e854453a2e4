//! Backend that shells out to the `git` executable

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{GitBackend, MERGE_LABELS, MergeOutcome};
use crate::{Error, Result};

/// Runs git primitives through an external `git` program.
///
/// Arguments are passed directly to the process, never through a shell, so
/// paths and URLs need no quoting.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: PathBuf,
}

impl Default for CommandBackend {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CommandBackend {
    /// Create a backend for the given git executable (name or path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn describe(&self, args: &[OsString]) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Spawn git and wait for it, without interpreting the exit status.
    fn output(&self, cwd: Option<&Path>, args: &[OsString]) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = cwd {
            // A missing working directory would surface as a spawn failure
            // and be mistaken for a missing git
            if !dir.is_dir() {
                return Err(Error::NotARepository {
                    path: dir.to_path_buf(),
                });
            }
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %self.describe(args), "Running git");

        cmd.output().map_err(|source| Error::ToolUnavailable {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })
    }

    /// Run git and return stdout, mapping a non-zero exit to an error.
    fn run(&self, cwd: Option<&Path>, args: &[OsString]) -> Result<Vec<u8>> {
        let output = self.output(cwd, args)?;
        if output.status.success() {
            return Ok(output.stdout);
        }

        match output.status.code() {
            Some(code) => Err(Error::CommandFailed {
                command: self.describe(args),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            None => Err(Error::Terminated {
                command: self.describe(args),
            }),
        }
    }
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items.into_iter().map(|s| s.as_ref().to_os_string()).collect()
}

fn trimmed(stdout: Vec<u8>) -> String {
    String::from_utf8_lossy(&stdout).trim().to_string()
}

impl GitBackend for CommandBackend {
    fn name(&self) -> &'static str {
        "git-command"
    }

    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<()> {
        let mut argv = args(["clone", "--depth", "1", "--single-branch", url]);
        argv.push(dest.as_os_str().to_os_string());
        self.run(None, &argv)?;
        Ok(())
    }

    fn fetch_and_reset(&self, mirror: &Path) -> Result<()> {
        self.run(Some(mirror), &args(["fetch", "--depth", "1"]))?;
        self.run(Some(mirror), &args(["reset", "--hard", "origin/HEAD"]))?;
        Ok(())
    }

    fn head_revision(&self, mirror: &Path) -> Result<String> {
        let stdout = self.run(Some(mirror), &args(["rev-parse", "HEAD"]))?;
        Ok(trimmed(stdout))
    }

    fn show(&self, mirror: &Path, revision: &str, relative_path: &str) -> Result<Vec<u8>> {
        // cat-file returns the blob untouched; no textconv or EOL filters
        let spec = format!("{revision}:{relative_path}");
        match self.run(Some(mirror), &args(["cat-file", "blob", spec.as_str()])) {
            Ok(bytes) => Ok(bytes),
            Err(Error::CommandFailed { stderr, .. }) => Err(Error::HistoricalContentUnavailable {
                revision: revision.to_string(),
                path: relative_path.to_string(),
                reason: stderr,
            }),
            Err(other) => Err(other),
        }
    }

    fn toplevel(&self, dir: &Path) -> Result<PathBuf> {
        match self.run(Some(dir), &args(["rev-parse", "--show-toplevel"])) {
            Ok(stdout) => Ok(PathBuf::from(trimmed(stdout))),
            Err(Error::CommandFailed { .. }) => Err(Error::NotARepository {
                path: dir.to_path_buf(),
            }),
            Err(other) => Err(other),
        }
    }

    fn merge_file(&self, current: &Path, base: &Path, new: &Path) -> Result<MergeOutcome> {
        let mut full = args(["merge-file"]);
        for label in MERGE_LABELS {
            full.extend(args(["-L", label]));
        }
        full.extend(args([current, base, new]));

        let output = self.output(None, &full)?;

        // merge-file exits with the number of conflicts (capped at 127) and
        // with a negative status on error
        match output.status.code() {
            Some(0) => Ok(MergeOutcome::Clean),
            Some(1..=127) => Ok(MergeOutcome::Conflicted),
            Some(code) => Err(Error::MergeFailed {
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            None => Err(Error::Terminated {
                command: self.describe(&full),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_reports_tool_unavailable() {
        let backend = CommandBackend::new("artisync-no-such-git-binary");
        let err = backend.head_revision(Path::new(".")).unwrap_err();
        assert!(matches!(err, Error::ToolUnavailable { .. }), "got {err:?}");
        assert!(err.is_execution_failure());
    }

    #[test]
    fn describe_includes_program_and_args() {
        let backend = CommandBackend::new("git");
        assert_eq!(
            backend.describe(&args(["rev-parse", "HEAD"])),
            "git rev-parse HEAD"
        );
    }
}

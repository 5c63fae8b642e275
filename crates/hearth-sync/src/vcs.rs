//! The version-control port.
//!
//! All git interaction goes through [`VcsPort`] so the engine's safety
//! properties (whitelist-only mutation, backup-before-write) can be
//! unit-tested against a fake implementation without a real upstream.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

use hearth_core::{HearthError, Result};

/// Narrow interface over the version-control binary. Paths are
/// workspace-relative; the implementation anchors them at its root.
pub trait VcsPort {
    /// True when a remote of this name is configured.
    fn has_remote(&self, name: &str) -> Result<bool>;

    /// Add the remote if absent. Idempotent.
    fn ensure_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Fetch reference metadata from the remote. Never touches the
    /// working tree. Bounded by `timeout`; expiry kills the subprocess.
    fn fetch(&self, remote: &str, timeout: Duration) -> Result<()>;

    /// Working-tree paths with uncommitted modifications (including
    /// untracked files), restricted to the given pathspecs.
    fn modified_paths(&self, pathspecs: &[&str]) -> Result<Vec<PathBuf>>;

    /// Paths whose working-tree content differs from `refspec`,
    /// restricted to the given pathspecs.
    fn diff_paths(&self, refspec: &str, pathspecs: &[&str]) -> Result<Vec<PathBuf>>;

    /// Read one file's content from `refspec` without checking anything
    /// out. `None` when the file does not exist at that ref.
    fn read_blob(&self, refspec: &str, path: &str) -> Result<Option<String>>;

    /// Replace the content at exactly `path` with the content at
    /// `refspec`. The operation's scope is the literal path argument.
    fn checkout_path(&self, refspec: &str, path: &Path) -> Result<()>;

    /// Record the current content of exactly the named paths so the
    /// working tree reads clean for the next invocation's precondition
    /// check. Scope is the literal path list.
    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<()>;
}

/// [`VcsPort`] implementation that shells out to the `git` binary.
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "git");
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .map_err(|e| HearthError::Vcs(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HearthError::Vcs(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(output)
    }

    fn stdout_lines(output: &Output) -> Vec<String> {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

impl VcsPort for GitCli {
    fn has_remote(&self, name: &str) -> Result<bool> {
        let output = self.run(&["remote"])?;
        Ok(Self::stdout_lines(&output).iter().any(|r| r == name))
    }

    fn ensure_remote(&self, name: &str, url: &str) -> Result<()> {
        if self.has_remote(name)? {
            debug!(remote = name, "remote already configured");
            return Ok(());
        }
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    fn fetch(&self, remote: &str, timeout: Duration) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root)
            .args(["fetch", "--quiet", remote])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = run_with_timeout(cmd, timeout)
            .map_err(|e| HearthError::Network(format!("fetch from '{remote}': {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HearthError::Network(format!(
                "fetch from '{remote}' failed: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn modified_paths(&self, pathspecs: &[&str]) -> Result<Vec<PathBuf>> {
        let mut args = vec!["status", "--porcelain", "--"];
        args.extend_from_slice(pathspecs);
        let output = self.run(&args)?;

        // Porcelain lines are "XY <path>"; renames are "XY <from> -> <to>".
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|l| l.len() > 3)
            .map(|l| {
                let path = &l[3..];
                let path = path.rsplit(" -> ").next().unwrap_or(path);
                PathBuf::from(path.trim().trim_matches('"'))
            })
            .collect())
    }

    fn diff_paths(&self, refspec: &str, pathspecs: &[&str]) -> Result<Vec<PathBuf>> {
        let mut args = vec!["diff", "--name-only", refspec, "--"];
        args.extend_from_slice(pathspecs);
        let output = self.run(&args)?;
        Ok(Self::stdout_lines(&output).into_iter().map(PathBuf::from).collect())
    }

    fn read_blob(&self, refspec: &str, path: &str) -> Result<Option<String>> {
        let spec = format!("{refspec}:{path}");
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(["show", &spec])
            .output()
            .map_err(|e| HearthError::Vcs(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            // Missing at that ref, or the ref itself is unknown
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    fn checkout_path(&self, refspec: &str, path: &Path) -> Result<()> {
        let path = path
            .to_str()
            .ok_or_else(|| HearthError::Vcs(format!("path is not valid UTF-8: {path:?}")))?;
        self.run(&["checkout", refspec, "--", path])?;
        Ok(())
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<()> {
        let mut args = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
        args.push("--".to_string());
        for path in paths {
            let p = path
                .to_str()
                .ok_or_else(|| HearthError::Vcs(format!("path is not valid UTF-8: {path:?}")))?;
            args.push(p.to_string());
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&arg_refs)?;
        Ok(())
    }
}

/// Run a subprocess with a wall-clock bound. On expiry the child is
/// killed and an error returned; there is no cancellation primitive
/// beyond this boundary.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> std::io::Result<Output> {
    let start = Instant::now();
    let mut child = cmd.spawn()?;

    loop {
        if child.try_wait()?.is_some() {
            return child.wait_with_output();
        }
        if start.elapsed() >= timeout {
            child.kill()?;
            child.wait()?;
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("timed out after {}s", timeout.as_secs()),
            ));
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_kills_slow_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5").stdout(Stdio::null()).stderr(Stdio::null());
        let start = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(200)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn fast_child_completes() {
        let mut cmd = Command::new("echo");
        cmd.arg("ok").stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
    }
}

//! Clean-environment handling
//!
//! Some executables keep state in their resource directory and must get a
//! fresh one for every test case. The directory only lives for the duration
//! of one child process.

use std::collections::BTreeSet;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, error};

use super::error::TaskError;
use crate::models::Task;

const TEMP_DIR_PREFIX: &str = "integration-runner-";

/// Set of executables that need a clean environment per test case
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsolationPolicy {
    executables: BTreeSet<String>,
}

impl IsolationPolicy {
    pub fn new<I, S>(executables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executables: executables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn requires_isolation(&self, executable: &str) -> bool {
        self.executables.contains(executable)
    }

    /// Run `run` for `task`, inside a fresh temp directory when the policy says so
    ///
    /// `run` receives the directory path, or `None` when the task's executable
    /// is not isolated. The directory is removed once `run` completes,
    /// whatever it returned. Removal failures are logged and swallowed.
    pub async fn with_isolated_env<F, Fut, T>(&self, task: &Task, run: F) -> Result<T, TaskError>
    where
        F: FnOnce(Option<PathBuf>) -> Fut,
        Fut: Future<Output = T>,
    {
        if !self.requires_isolation(&task.executable) {
            return Ok(run(None).await);
        }

        let env = IsolatedEnv::create().map_err(|source| TaskError::IsolationSetup {
            task: task.clone(),
            source,
        })?;
        debug!("Temp dir for {}: {}", task, env.path().display());

        let output = run(Some(env.path().to_path_buf())).await;
        env.close().await;

        Ok(output)
    }
}

/// Ephemeral resource directory owned by one task execution
#[derive(Debug)]
pub struct IsolatedEnv {
    dir: TempDir,
}

impl IsolatedEnv {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory on the blocking pool, logging instead of failing
    pub async fn close(self) {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Failed to remove tempdir {}: {}", path.display(), e),
            Err(e) => error!("Tempdir removal for {} aborted: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_policy_membership() {
        let policy = IsolationPolicy::new(["search_integration_tests"]);
        assert!(policy.requires_isolation("search_integration_tests"));
        assert!(!policy.requires_isolation("storage_integration_tests"));
    }

    #[tokio::test]
    async fn test_not_isolated_gets_no_directory() {
        let policy = IsolationPolicy::new(["other"]);
        let task = Task::new("plain", "t1");

        let seen = policy.with_isolated_env(&task, |dir| async move { dir }).await.unwrap();
        assert!(seen.is_none());
    }

    #[tokio::test]
    async fn test_isolated_directory_is_fresh_and_removed() {
        let policy = IsolationPolicy::new(["stateful"]);
        let task = Task::new("stateful", "t1");

        let first = policy
            .with_isolated_env(&task, |dir| async move {
                let dir = dir.unwrap();
                assert!(dir.is_dir());
                fs::write(dir.join("state.bin"), b"x").unwrap();
                dir
            })
            .await
            .unwrap();
        let second = policy
            .with_isolated_env(&task, |dir| async move { dir.unwrap() })
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(!first.exists());
        assert!(!second.exists());
    }

    #[tokio::test]
    async fn test_directory_removed_when_run_fails() {
        let policy = IsolationPolicy::new(["stateful"]);
        let task = Task::new("stateful", "t1");

        let (dir, result): (PathBuf, Result<(), &str>) = policy
            .with_isolated_env(&task, |dir| async move { (dir.unwrap(), Err("child failed")) })
            .await
            .unwrap();

        assert!(result.is_err());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_close_tolerates_already_removed_directory() {
        let env = IsolatedEnv::create().unwrap();
        fs::remove_dir_all(env.path()).unwrap();
        env.close().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_populated_directory_is_removed() {
        let env = IsolatedEnv::create().unwrap();
        let root = env.path().to_path_buf();
        for i in 0..200 {
            let sub = root.join(format!("d{i}"));
            fs::create_dir(&sub).unwrap();
            fs::write(sub.join("index.bin"), vec![0u8; 1024]).unwrap();
        }

        env.close().await;
        assert!(!root.exists());
    }
}

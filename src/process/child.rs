//! Managed child process spawning and control.
//!
//! This module wraps the single child process the supervisor manages,
//! providing spawn with piped output streams and termination that always
//! reaps the exit status before returning.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// Error type for process spawning operations.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The command vector was empty.
    #[error("Child command is empty")]
    EmptyCommand,
    /// The program was not found.
    #[error("Child program not found")]
    NotFound,
    /// Permission denied when spawning.
    #[error("Permission denied")]
    PermissionDenied,
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// The single child process currently under supervision.
#[derive(Debug)]
pub struct ManagedChild {
    child: Child,
}

impl ManagedChild {
    /// Spawn a child from a command vector with piped stdout and stderr.
    ///
    /// The first element is the program, the remainder its arguments.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the vector is empty or the process fails to
    /// spawn.
    pub fn spawn(command: &[String]) -> Result<Self, SpawnError> {
        let (program, args) = command.split_first().ok_or(SpawnError::EmptyCommand)?;

        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(SpawnError::from_io)?;

        Ok(Self { child })
    }

    /// Take ownership of the stdout handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Take ownership of the stderr handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Get the process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Check if the process has exited without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if the process state cannot be queried.
    pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Wait for the process to exit and reap its status.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Forcefully kill the process and wait for it to be reaped.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be sent.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    /// Terminate the process and block until its exit status is reaped.
    ///
    /// On Unix, sends SIGTERM first, then SIGKILL after the grace period.
    /// On other platforms, kills immediately. Either way the child has been
    /// waited on when this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if termination fails.
    pub async fn terminate(&mut self, grace: Duration) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            self.terminate_unix(grace).await
        }

        #[cfg(not(unix))]
        {
            let _ = grace;
            self.kill().await
        }
    }

    #[cfg(unix)]
    async fn terminate_unix(&mut self, grace: Duration) -> std::io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = self.id() {
            let nix_pid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
            let _ = kill(nix_pid, Signal::SIGTERM);

            match tokio::time::timeout(grace, self.child.wait()).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(_) => {
                    // Grace elapsed, force kill (kill waits for the exit).
                    self.child.kill().await
                }
            }
        } else {
            // Process already exited and was reaped.
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn test_empty_command_rejected() {
        let result = ManagedChild::spawn(&[]);
        assert!(matches!(result, Err(SpawnError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_missing_program_classified_not_found() {
        let result = ManagedChild::spawn(&cmd(&["definitely-not-a-real-binary-xyz"]));
        assert!(matches!(result, Err(SpawnError::NotFound)));
    }

    #[tokio::test]
    async fn test_spawn_echo_and_wait() {
        let mut child = ManagedChild::spawn(&cmd(&["echo", "hello"])).unwrap();
        assert!(child.id().is_some());

        let status = child.wait().await.unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn test_take_stdout_once() {
        let mut child = ManagedChild::spawn(&cmd(&["echo", "hi"])).unwrap();
        assert!(child.take_stdout().is_some());
        assert!(child.take_stdout().is_none());
        child.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_take_stderr_once() {
        let mut child = ManagedChild::spawn(&cmd(&["echo", "hi"])).unwrap();
        assert!(child.take_stderr().is_some());
        assert!(child.take_stderr().is_none());
        child.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_terminate_reaps_sleeping_child() {
        let mut child = ManagedChild::spawn(&cmd(&["sleep", "30"])).unwrap();
        assert!(child.id().is_some());

        child
            .terminate(Duration::from_millis(200))
            .await
            .unwrap();

        // Reaped: the handle no longer reports a live pid.
        assert!(child.id().is_none());
    }

    #[tokio::test]
    async fn test_try_wait_on_running_process() {
        let mut child = ManagedChild::spawn(&cmd(&["sleep", "30"])).unwrap();
        assert!(child.try_wait().unwrap().is_none());
        child.kill().await.unwrap();
    }
}

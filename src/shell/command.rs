//! Structured external command execution.
//!
//! Commands are described by a [`ToolCommand`] (program plus explicit
//! argument list) and executed through a [`CommandRunner`]. Nothing is ever
//! passed through a shell, so module paths and versions are never subject
//! to quoting.

use crate::error::{CompatError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// An external command: program, argument list, working directory and
/// extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl ToolCommand {
    /// Start building a command for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command inside `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set an environment variable for this command only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The program's file name (e.g. `go1.21.0`), falling back to the full path.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program_name())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl CommandOutput {
    /// Create a result with the given exit code and no output.
    pub fn with_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    /// Whether command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }

    /// Short human description of a failure, used in logs and error messages.
    pub fn failure_summary(&self) -> String {
        let status = if self.timed_out {
            "timed out".to_string()
        } else {
            match self.exit_code {
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            }
        };
        let detail = self.combined();
        if detail.is_empty() {
            status
        } else {
            format!("{}: {}", status, detail)
        }
    }
}

/// Executes [`ToolCommand`]s.
///
/// This trait allows substituting a scripted runner in tests.
pub trait CommandRunner {
    /// Run the command to completion and capture its output.
    ///
    /// Returns `Err(CompatError::CommandSpawn)` only if the process could not
    /// be started; a non-zero exit is reported through [`CommandOutput`].
    fn run(&self, command: &ToolCommand) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any command that runs longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let start = Instant::now();
        tracing::debug!("Running: {}", command);

        let mut cmd = Command::new(command.program());
        cmd.args(command.get_args());
        if let Some(cwd) = command.get_cwd() {
            cmd.current_dir(cwd);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        // Wrappers exec the real toolchain, which forks compilers; a timed
        // command leads its own process group so the kill reaches all of them.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            if self.timeout.is_some() {
                cmd.process_group(0);
            }
        }

        let mut child = cmd.spawn().map_err(|source| CompatError::CommandSpawn {
            command: command.to_string(),
            source,
        })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we wait on it.
        let stdout_handle = drain(child.stdout.take());
        let stderr_handle = drain(child.stderr.take());

        let (exit_code, timed_out) = wait_with_timeout(&mut child, self.timeout, command)?;

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        let output = CommandOutput {
            exit_code,
            stdout,
            stderr,
            duration: start.elapsed(),
            timed_out,
        };
        tracing::debug!(
            "{} finished in {:?} (exit {:?})",
            command.program_name(),
            output.duration,
            output.exit_code
        );
        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
    command: &ToolCommand,
) -> Result<(Option<i32>, bool)> {
    let spawn_err = |source| CompatError::CommandSpawn {
        command: command.to_string(),
        source,
    };

    let Some(timeout) = timeout else {
        let status = child.wait().map_err(spawn_err)?;
        return Ok((status.code(), false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().map_err(spawn_err)? {
            return Ok((status.code(), false));
        }
        if Instant::now() >= deadline {
            tracing::warn!("{} exceeded {:?}, killing it", command, timeout);
            kill_process_group(child);
            let _ = child.wait();
            return Ok((None, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the child and every process in its group.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: killpg only sends a signal; the group was created for this
        // child by `process_group(0)`, so no unrelated process shares it.
        unsafe {
            libc::killpg(pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

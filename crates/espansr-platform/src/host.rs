//! The environment seam used by platform detection

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crate::command::{self, CommandOutput};
use crate::error::Unavailable;

/// Kernel version marker read on Linux to spot WSL
pub const KERNEL_VERSION_FILE: &str = "/proc/version";

/// Operating system family as reported by the build target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Darwin,
    Windows,
    Other(String),
}

impl OsFamily {
    /// The family of the running binary.
    pub fn native() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "macos" => Self::Darwin,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Source of every environment fact platform detection depends on.
pub trait Host {
    /// Operating system family.
    fn os_family(&self) -> OsFamily;

    /// Contents of the kernel version marker, `None` if unreadable.
    fn kernel_version(&self) -> Option<String>;

    /// An environment variable; empty values count as unset.
    fn env_var(&self, key: &str) -> Option<String>;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Run an external command with a bounded timeout.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, Unavailable>;
}

/// The real environment of the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn os_family(&self) -> OsFamily {
        OsFamily::native()
    }

    fn kernel_version(&self) -> Option<String> {
        std::fs::read_to_string(KERNEL_VERSION_FILE).ok()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, Unavailable> {
        command::run_with_timeout(program, args, timeout)
    }
}

/// A host with fixed answers.
///
/// Commands are answered from a table keyed by program name; unknown
/// programs report [`Unavailable::NotFound`]. Every command invocation is
/// recorded so callers can assert on what was (or was not) run.
#[derive(Debug)]
pub struct FixedHost {
    os: OsFamily,
    kernel_version: Option<String>,
    env: HashMap<String, String>,
    home: Option<PathBuf>,
    commands: HashMap<String, Result<CommandOutput, Unavailable>>,
    calls: Mutex<Vec<String>>,
}

impl FixedHost {
    pub fn new(os: OsFamily) -> Self {
        Self {
            os,
            kernel_version: None,
            env: HashMap::new(),
            home: None,
            commands: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_kernel_version(mut self, version: impl Into<String>) -> Self {
        self.kernel_version = Some(version.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Answer `program` with a successful run printing `stdout`.
    pub fn with_command_output(mut self, program: &str, stdout: impl Into<String>) -> Self {
        self.commands.insert(
            program.to_string(),
            Ok(CommandOutput {
                code: Some(0),
                stdout: stdout.into(),
                stderr: String::new(),
            }),
        );
        self
    }

    /// Answer `program` with a failure.
    pub fn with_command_error(mut self, program: &str, error: Unavailable) -> Self {
        self.commands.insert(program.to_string(), Err(error));
        self
    }

    /// Programs run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Host for FixedHost {
    fn os_family(&self) -> OsFamily {
        self.os.clone()
    }

    fn kernel_version(&self) -> Option<String> {
        self.kernel_version.clone()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn run(
        &self,
        program: &str,
        _args: &[&str],
        _timeout: Duration,
    ) -> Result<CommandOutput, Unavailable> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(program.to_string());
        }
        self.commands.get(program).cloned().unwrap_or_else(|| {
            Err(Unavailable::NotFound {
                program: program.to_string(),
            })
        })
    }
}

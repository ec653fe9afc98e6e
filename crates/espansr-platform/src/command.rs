//! External command execution with a bounded timeout
//!
//! Commands run on a throwaway current-thread runtime so the public API
//! stays synchronous. A command that outlives its timeout is killed.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::Unavailable;

/// Timeout used for environment lookups (username, distro name).
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout used for Espanso daemon control.
pub const DAEMON_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `program args...` and wait at most `timeout` for it to finish.
///
/// Never blocks longer than the timeout and never panics; every failure
/// mode maps onto an [`Unavailable`] variant.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput, Unavailable> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Unavailable::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(program, ?args, timeout_secs = timeout.as_secs(), "Running command");

    let result = runtime.block_on(async { tokio::time::timeout(timeout, cmd.output()).await });

    match result {
        Ok(Ok(output)) => Ok(CommandOutput {
            code: output.status.code(),
            stdout: decode_console_text(&output.stdout),
            stderr: decode_console_text(&output.stderr),
        }),
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Err(Unavailable::NotFound {
            program: program.to_string(),
        }),
        Ok(Err(e)) => Err(Unavailable::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        }),
        Err(_elapsed) => {
            tracing::debug!(program, "Command timed out");
            Err(Unavailable::TimedOut {
                program: program.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    }
}

/// Decode console output that may be UTF-16LE.
///
/// Windows tools such as `wsl.exe` write UTF-16LE even when piped into a
/// Linux process; everything else is treated as (lossy) UTF-8.
pub fn decode_console_text(bytes: &[u8]) -> String {
    let looks_utf16 = bytes.len() >= 2
        && bytes.len() % 2 == 0
        && bytes.iter().skip(1).step_by(2).all(|b| *b == 0);
    if looks_utf16 {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
            .trim_start_matches('\u{feff}')
            .to_string()
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

//! Best-effort environment lookups backed by external commands
//!
//! None of these raise: a missing tool, a timeout or empty output all mean
//! "unavailable", which is the normal answer outside WSL2.

use std::path::PathBuf;

use crate::command::{CommandOutput, LOOKUP_TIMEOUT};
use crate::error::Unavailable;
use crate::host::{Host, OsFamily};

/// Environment variable WSL sets to the running distribution's name
pub const WSL_DISTRO_ENV: &str = "WSL_DISTRO_NAME";

/// Resolve the Windows username from inside WSL2 via `cmd.exe`.
pub fn windows_username(host: &dyn Host) -> Result<String, Unavailable> {
    let output = host.run("cmd.exe", &["/c", "echo %USERNAME%"], LOOKUP_TIMEOUT)?;
    let name = first_line("cmd.exe", output)?;
    // cmd echoes the literal when the variable is not defined
    if name.eq_ignore_ascii_case("%USERNAME%") {
        return Err(Unavailable::Empty {
            program: "cmd.exe".into(),
        });
    }
    Ok(name)
}

/// Resolve the WSL distribution name.
///
/// Prefers `WSL_DISTRO_NAME`, falling back to the first entry of
/// `wsl.exe -l -q` (the default distribution).
pub fn wsl_distro_name(host: &dyn Host) -> Result<String, Unavailable> {
    if let Some(name) = host.env_var(WSL_DISTRO_ENV) {
        return Ok(name);
    }
    let output = host.run("wsl.exe", &["-l", "-q"], LOOKUP_TIMEOUT)?;
    first_line("wsl.exe", output)
}

/// Locate an executable on `PATH` using `which` (or `where` on Windows).
pub fn find_executable(host: &dyn Host, name: &str) -> Option<PathBuf> {
    let which = match host.os_family() {
        OsFamily::Windows => "where",
        _ => "which",
    };
    match host.run(which, &[name], LOOKUP_TIMEOUT) {
        Ok(output) => first_line(which, output).ok().map(PathBuf::from),
        Err(e) => {
            tracing::debug!(executable = name, reason = %e, "Executable lookup failed");
            None
        }
    }
}

fn first_line(program: &str, output: CommandOutput) -> Result<String, Unavailable> {
    if !output.success() {
        return Err(Unavailable::Failed {
            program: program.to_string(),
            code: output.code.unwrap_or(-1),
            stderr: output.stderr.trim().to_string(),
        });
    }
    output
        .stdout
        .lines()
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Unavailable::Empty {
            program: program.to_string(),
        })
}

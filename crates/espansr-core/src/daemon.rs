//! Espanso daemon control
//!
//! On WSL2, files written through `/mnt/c` do not wake Espanso's Windows
//! file watcher, so the daemon is restarted after a sync. All of this is
//! best-effort: failures surface as [`Unavailable`], never as errors.

use espansr_platform::command::{CommandOutput, DAEMON_TIMEOUT};
use espansr_platform::{Host, PlatformInfo, SystemHost, Unavailable, find_executable};

const POWERSHELL: &str = "powershell.exe";

/// Something that can restart the Espanso daemon.
pub trait DaemonControl {
    fn restart(&self) -> Result<(), Unavailable>;
}

/// Restarts the Windows-side Espanso service from inside WSL2.
///
/// Stops the service, then starts it hidden. Only the start command's exit
/// status decides success; a failed stop usually means it was not running.
#[derive(Debug, Default)]
pub struct WslDaemon<H = SystemHost> {
    host: H,
}

impl<H: Host> WslDaemon<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<H: Host> DaemonControl for WslDaemon<H> {
    fn restart(&self) -> Result<(), Unavailable> {
        let stop = self.host.run(
            POWERSHELL,
            &["-NoProfile", "-Command", "cd C:/; espanso service stop"],
            DAEMON_TIMEOUT,
        );
        if let Err(e) = stop {
            tracing::debug!(reason = %e, "Stopping Espanso service failed");
        }

        let start = self.host.run(
            POWERSHELL,
            &[
                "-NoProfile",
                "-Command",
                "cd C:/; Start-Process espanso -ArgumentList 'service','start' -WindowStyle Hidden",
            ],
            DAEMON_TIMEOUT,
        )?;
        require_success(POWERSHELL, start)?;
        tracing::info!("Restarted Espanso service");
        Ok(())
    }
}

/// Restart Espanso on demand.
///
/// WSL2 goes through PowerShell on the Windows host; elsewhere the native
/// `espanso` binary must be on `PATH`.
pub fn restart_espanso(host: &dyn Host, platform: &PlatformInfo) -> Result<(), Unavailable> {
    if platform.is_wsl2() {
        let output = host.run(POWERSHELL, &["-Command", "espanso restart"], DAEMON_TIMEOUT)?;
        return require_success(POWERSHELL, output);
    }

    let Some(binary) = find_executable(host, "espanso") else {
        return Err(Unavailable::NotFound {
            program: "espanso".into(),
        });
    };
    let program = binary.to_string_lossy();
    let output = host.run(&program, &["restart"], DAEMON_TIMEOUT)?;
    require_success(&program, output)
}

fn require_success(program: &str, output: CommandOutput) -> Result<(), Unavailable> {
    if output.success() {
        Ok(())
    } else {
        Err(Unavailable::Failed {
            program: program.to_string(),
            code: output.code.unwrap_or(-1),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

use std::path::Path;
use std::process::Command;

use super::AuthError;

const KERNEL_VERSION_FILE: &str = "/proc/version";
const WSL_MARKER: &str = "microsoft";

/// Closed set of environments the launcher distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Wsl,
    MacOs,
    Unix,
}

impl Platform {
    /// Detect the host platform, including Linux running under WSL.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if kernel_reports_wsl(Path::new(KERNEL_VERSION_FILE)) {
            Platform::Wsl
        } else {
            Platform::Unix
        }
    }
}

fn kernel_reports_wsl(version_file: &Path) -> bool {
    std::fs::read_to_string(version_file)
        .map(|contents| contents.to_ascii_lowercase().contains(WSL_MARKER))
        .unwrap_or(false)
}

/// Command line handing a URL to the platform's default opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

pub fn launch_command(platform: Platform, url: &str) -> LaunchCommand {
    match platform {
        // `start` runs through cmd.exe, which treats a bare & as a command
        // separator, so it must be escaped inside the URL.
        Platform::Windows | Platform::Wsl => LaunchCommand {
            program: "cmd.exe",
            args: vec!["/c".to_owned(), "start".to_owned(), url.replace('&', "^&")],
        },
        Platform::MacOs => LaunchCommand {
            program: "open",
            args: vec![url.to_owned()],
        },
        Platform::Unix => LaunchCommand {
            program: "xdg-open",
            args: vec![url.to_owned()],
        },
    }
}

/// Launch the user's default browser at `url` as a detached process.
pub fn open_url(url: &str) -> Result<(), AuthError> {
    let command = launch_command(Platform::detect(), url);
    Command::new(command.program)
        .args(&command.args)
        .spawn()
        .map_err(|err| AuthError::BrowserLaunch(err.to_string()))?;
    Ok(())
}

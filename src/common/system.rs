//! Host, user and session information

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Login name of the user running the banner, empty when it cannot be determined
pub fn current_user() -> String {
    let from_passwd = nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.name);

    from_passwd
        .or_else(|| std::env::var("LOGNAME").ok())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default()
}

/// Host name without the domain part
pub fn short_hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => short_name(&name.to_string_lossy()).to_string(),
        Err(e) => {
            debug!(error = %e, "Failed to read host name");
            String::new()
        }
    }
}

fn short_name(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

/// Log the session details relevant to window placement
pub fn log_session_info() {
    if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
        info!("Session Type: {}", session);
    }
    if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
        info!("Desktop Environment: {}", desktop);
    }
    if let Ok(disp) = std::env::var("DISPLAY") {
        info!("Display: {}", disp);
    }
}

/// Run a command and return its standard output
pub fn command_output(cmd: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run '{}'", cmd))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "'{}' exited with {}: {}",
            cmd,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("workstation.example.mil"), "workstation");
        assert_eq!(short_name("workstation"), "workstation");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn test_command_output_reports_failure() {
        assert!(command_output("false", &[]).is_err());
        assert!(command_output("this-command-does-not-exist-4242", &[]).is_err());
    }

    #[test]
    fn test_command_output_captures_stdout() {
        let output = command_output("echo", &["banner"]).unwrap();
        assert_eq!(output.trim(), "banner");
    }
}

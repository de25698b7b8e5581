use std::process::{Command, Stdio};

/// Whether the process runs with administrative rights.
///
/// Any failure to find out reads as "not elevated".
#[cfg(windows)]
pub fn is_elevated() -> bool {
    // `net session` is refused for non-administrators
    Command::new("net")
        .arg("session")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    Command::new("id")
        .arg("-u")
        .stderr(Stdio::null())
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "0")
        .unwrap_or(false)
}

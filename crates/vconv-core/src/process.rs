//! Cross-platform process spawning helpers.
//!
//! On Windows, spawning a console binary such as ffmpeg from a GUI shell pops
//! up a console window for each invocation. Every command the library spawns
//! goes through these helpers so the creation flags live in one place.

use std::process::Stdio;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Apply platform flags and capture both output streams on a std command.
pub fn configure_std_command(cmd: &mut std::process::Command) {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
}

/// Apply platform flags and capture both output streams on a tokio command.
pub fn configure_tokio_command(cmd: &mut tokio::process::Command) {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(target_os = "windows")]
    {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_command_captures_stdout() {
        #[cfg(target_os = "windows")]
        let mut cmd = std::process::Command::new("cmd");
        #[cfg(not(target_os = "windows"))]
        let mut cmd = std::process::Command::new("echo");

        configure_std_command(&mut cmd);

        #[cfg(target_os = "windows")]
        let output = cmd.args(["/C", "echo", "test"]).output();
        #[cfg(not(target_os = "windows"))]
        let output = cmd.arg("test").output();

        let output = output.expect("echo should run");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("test"));
    }

    #[test]
    fn std_command_configuration_is_idempotent() {
        // Calling configure multiple times should not cause issues
        #[cfg(target_os = "windows")]
        let mut cmd = std::process::Command::new("cmd");
        #[cfg(not(target_os = "windows"))]
        let mut cmd = std::process::Command::new("echo");

        configure_std_command(&mut cmd);
        configure_std_command(&mut cmd);
        configure_std_command(&mut cmd);
    }

    #[tokio::test]
    async fn tokio_command_captures_stdout() {
        #[cfg(target_os = "windows")]
        let mut cmd = tokio::process::Command::new("cmd");
        #[cfg(not(target_os = "windows"))]
        let mut cmd = tokio::process::Command::new("echo");

        configure_tokio_command(&mut cmd);

        #[cfg(target_os = "windows")]
        let output = cmd.args(["/C", "echo", "ok"]).output().await;
        #[cfg(not(target_os = "windows"))]
        let output = cmd.arg("ok").output().await;

        let output = output.expect("echo should run");
        assert!(output.status.success(), "Command should succeed");
        assert!(String::from_utf8_lossy(&output.stdout).contains("ok"));
    }

    #[test]
    fn create_no_window_constant_is_correct() {
        #[cfg(target_os = "windows")]
        {
            assert_eq!(CREATE_NO_WINDOW, 0x08000000);
        }
    }
}

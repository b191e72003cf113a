//! Best-effort freeing of the server port before a launch. Windows is the
//! only platform where stale listeners are actively terminated; everywhere
//! else this is a no-op.

#[cfg(any(target_os = "windows", test))]
use std::collections::BTreeSet;

/// Force-frees `port`. Never fails; every step is best-effort and failures
/// are swallowed after a log line.
pub(crate) fn free_port(port: u16) {
    #[cfg(target_os = "windows")]
    windows_free_port(port);

    #[cfg(not(target_os = "windows"))]
    let _ = port;
}

#[cfg(target_os = "windows")]
fn windows_free_port(port: u16) {
    use std::process::{Command, Stdio};

    use crate::{append_desktop_log, PORT_RELEASE_GRACE};

    let output = match Command::new("netstat").arg("-ano").output() {
        Ok(output) => output,
        Err(error) => {
            append_desktop_log(&format!("netstat failed while freeing port {port}: {error}"));
            return;
        }
    };

    let listing = String::from_utf8_lossy(&output.stdout);
    let pids = pids_owning_port(&listing, port, std::process::id());
    if pids.is_empty() {
        return;
    }

    for pid in &pids {
        match Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => append_desktop_log(&format!("stopped process {pid} using port {port}")),
            Err(error) => {
                append_desktop_log(&format!("failed to stop process {pid} on port {port}: {error}"))
            }
        }
    }

    // Give the OS a moment to actually release the port.
    std::thread::sleep(PORT_RELEASE_GRACE);
}

/// Extracts the distinct PIDs from `netstat -ano` output for lines that
/// mention `port`, skipping `own_pid`. The PID is the trailing token of each
/// matching line.
#[cfg(any(target_os = "windows", test))]
fn pids_owning_port(listing: &str, port: u16, own_pid: u32) -> BTreeSet<u32> {
    let needle = format!(":{port}");
    listing
        .lines()
        .filter(|line| line.contains(&needle))
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|token| token.parse::<u32>().ok())
        .filter(|pid| *pid != own_pid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_NETSTAT: &str = "\
  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:5678           0.0.0.0:0              LISTENING       4242
  TCP    127.0.0.1:5678         127.0.0.1:52002        ESTABLISHED     4242
  TCP    127.0.0.1:52002        127.0.0.1:5678         ESTABLISHED     9001
  TCP    0.0.0.0:8080           0.0.0.0:0              LISTENING       7777
  UDP    0.0.0.0:5678           *:*                                    misc
";

    #[test]
    fn pids_owning_port_collects_distinct_trailing_pids() {
        let pids = pids_owning_port(SAMPLE_NETSTAT, 5678, 1);
        assert_eq!(pids.into_iter().collect::<Vec<_>>(), vec![4242, 9001]);
    }

    #[test]
    fn pids_owning_port_excludes_our_own_pid() {
        let pids = pids_owning_port(SAMPLE_NETSTAT, 5678, 4242);
        assert_eq!(pids.into_iter().collect::<Vec<_>>(), vec![9001]);
    }

    #[test]
    fn pids_owning_port_ignores_unrelated_ports_and_junk_tokens() {
        let pids = pids_owning_port(SAMPLE_NETSTAT, 9999, 1);
        assert!(pids.is_empty());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn free_port_is_a_harmless_no_op_off_windows() {
        free_port(0);
        free_port(5678);
        free_port(u16::MAX);
    }
}

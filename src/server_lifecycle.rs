use std::{process::Child, sync::Mutex};

use crate::{
    append_desktop_log, append_server_log, append_shutdown_log, port_guard, server_config,
    server_launch::LaunchPlan,
};

/// Owner of the single tracked server process. At most one child exists at a
/// time; the handle is cleared on stop and when an exit is observed.
#[derive(Debug)]
pub(crate) struct ServerState {
    child: Mutex<Option<Child>>,
    server_url: String,
    port: u16,
}

impl Default for ServerState {
    fn default() -> Self {
        let port = server_config::resolve_server_port();
        Self {
            child: Mutex::new(None),
            server_url: server_config::server_url_for_port(port),
            port,
        }
    }
}

impl ServerState {
    pub(crate) fn server_url(&self) -> &str {
        &self.server_url
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Frees the port and spawns the server. Spawn failures are logged and
    /// swallowed; they surface to the user later through poll exhaustion.
    pub(crate) fn start(&self, plan: &LaunchPlan) {
        if self.is_running() {
            append_desktop_log("server start skipped: a server process is already tracked");
            return;
        }

        port_guard::free_port(self.port);

        match crate::server_launch::spawn_server(plan) {
            Ok(child) => {
                let mut guard = self.lock_child();
                if guard.is_some() {
                    // Lost a start race; keep the first process.
                    append_desktop_log("duplicate server spawn detected, stopping the newcomer");
                    let mut newcomer = child;
                    kill_child(&mut newcomer);
                    return;
                }
                *guard = Some(child);
            }
            Err(error) => append_desktop_log(&format!("failed to start server: {error}")),
        }
    }

    /// Kills the tracked process if one exists and clears the handle. No-op
    /// when nothing is running.
    pub(crate) fn stop(&self) {
        let child = self.lock_child().take();
        let Some(mut child) = child else {
            return;
        };
        append_shutdown_log(&format!("stopping server process {}", child.id()));
        kill_child(&mut child);
    }

    /// Reaps an already-exited child, logging unexpected termination. Returns
    /// whether the process was found to have exited.
    pub(crate) fn check_unexpected_exit(&self) -> bool {
        let mut guard = self.lock_child();
        let Some(child) = guard.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    append_server_log(&format!("server process exited with {status}"));
                } else {
                    append_server_log(&format!("server exited unexpectedly with {status}"));
                }
                *guard = None;
                true
            }
            Ok(None) => false,
            Err(error) => {
                append_desktop_log(&format!("failed to poll server process status: {error}"));
                false
            }
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lock_child().is_some()
    }

    fn lock_child(&self) -> std::sync::MutexGuard<'_, Option<Child>> {
        match self.child.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                append_desktop_log("server process lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

fn kill_child(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        use std::process::{Command, Stdio};

        // taskkill tears down the whole tree, which plain kill() does not.
        let _ = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        let _ = child.wait();
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    fn sleeper_plan(dir: &std::path::Path) -> LaunchPlan {
        LaunchPlan {
            shell_command: "sleep 30".to_string(),
            user_data_dir: dir.join(".n8n"),
            port: 5678,
        }
    }

    #[test]
    fn start_tracks_exactly_one_process_and_ignores_a_second_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = ServerState::default();
        let plan = sleeper_plan(dir.path());

        state.start(&plan);
        assert!(state.is_running());
        let first_pid = state.lock_child().as_ref().map(|child| child.id());

        state.start(&plan);
        let second_pid = state.lock_child().as_ref().map(|child| child.id());
        assert_eq!(first_pid, second_pid);

        state.stop();
        assert!(!state.is_running());
    }

    #[test]
    fn stop_then_start_leaves_exactly_one_tracked_process() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = ServerState::default();
        let plan = sleeper_plan(dir.path());

        state.start(&plan);
        state.stop();
        state.start(&plan);
        assert!(state.is_running());

        state.stop();
    }

    #[test]
    fn stop_without_a_running_process_is_a_no_op() {
        let state = ServerState::default();
        state.stop();
        assert!(!state.is_running());
    }

    #[test]
    fn check_unexpected_exit_reaps_a_dead_child_and_clears_the_handle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = ServerState::default();
        let plan = LaunchPlan {
            shell_command: "exit 3".to_string(),
            user_data_dir: dir.path().join(".n8n"),
            port: 5678,
        };

        state.start(&plan);
        // Give the shell a moment to run to completion.
        let mut exited = false;
        for _ in 0..50 {
            if state.check_unexpected_exit() {
                exited = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(exited);
        assert!(!state.is_running());
    }

    #[test]
    fn default_state_derives_url_from_port() {
        let state = ServerState::default();
        assert_eq!(
            state.server_url(),
            format!("http://localhost:{}/", state.port())
        );
    }
}

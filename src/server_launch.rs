use std::{
    env,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
};

use tauri::AppHandle;

use crate::{
    append_desktop_log, append_server_log, runtime_paths, server_config, server_path,
    ELECTRON_RUN_AS_NODE_ENV, SERVER_CMD_ENV, USER_FOLDER_ENV,
};

/// Everything needed to spawn the server once: the shell command line and
/// the environment overrides that go with it.
#[derive(Debug, Clone)]
pub(crate) struct LaunchPlan {
    pub(crate) shell_command: String,
    pub(crate) user_data_dir: PathBuf,
    pub(crate) port: u16,
}

/// Builds the launch plan from the current environment. A custom command
/// override replaces the default `node <cli> start` line entirely.
pub(crate) fn resolve_launch_plan(app_handle: &AppHandle, port: u16) -> Result<LaunchPlan, String> {
    let user_data_dir = runtime_paths::user_data_dir(app_handle)
        .ok_or_else(|| "Cannot resolve a user data directory for the server.".to_string())?;

    let custom_command = env::var(SERVER_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let shell_command = match custom_command {
        Some(raw) => validate_custom_command(&raw)?,
        None => shell_command_line(&server_path::resolve_cli_entry_point()),
    };

    Ok(LaunchPlan {
        shell_command,
        user_data_dir,
        port,
    })
}

/// The default launch line. Quoted so entry-point paths with spaces survive
/// the shell; `node` is left bare so the shell resolves it from `PATH`
/// rather than using any runtime bundled with the desktop app.
pub(crate) fn shell_command_line(entry_point: &Path) -> String {
    format!("\"node\" \"{}\" start", entry_point.display())
}

fn validate_custom_command(raw: &str) -> Result<String, String> {
    let pieces =
        shlex::split(raw).ok_or_else(|| format!("Invalid {SERVER_CMD_ENV} value: {raw}"))?;
    if pieces.is_empty() {
        return Err(format!("{SERVER_CMD_ENV} is empty."));
    }
    Ok(raw.to_string())
}

/// Environment overrides applied to the child on top of the inherited
/// environment.
fn launch_env(plan: &LaunchPlan) -> Vec<(String, String)> {
    vec![
        (
            USER_FOLDER_ENV.to_string(),
            plan.user_data_dir.display().to_string(),
        ),
        (
            crate::SERVER_PORT_ENV.to_string(),
            plan.port.to_string(),
        ),
    ]
}

pub(crate) fn spawn_server(plan: &LaunchPlan) -> Result<Child, String> {
    std::fs::create_dir_all(&plan.user_data_dir).map_err(|error| {
        format!(
            "Failed to create user data directory {}: {}",
            plan.user_data_dir.display(),
            error
        )
    })?;

    let mut command = shell_invocation(&plan.shell_command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // The child must not inherit the flag that makes a bundled runtime
        // behave like plain Node.
        .env_remove(ELECTRON_RUN_AS_NODE_ENV);
    for (key, value) in launch_env(plan) {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(|error| {
        format!(
            "Failed to spawn server with command {:?}: {}",
            plan.shell_command, error
        )
    })?;

    append_server_log(&format!(
        "server starting: {} (url {})",
        plan.shell_command,
        server_config::server_url_for_port(plan.port)
    ));
    relay_child_output(&mut child);
    Ok(child)
}

#[cfg(target_os = "windows")]
fn shell_invocation(shell_command: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", shell_command]);
    command
}

#[cfg(not(target_os = "windows"))]
fn shell_invocation(shell_command: &str) -> Command {
    let mut command = Command::new("sh");
    command.args(["-c", shell_command]);
    command
}

/// Moves the child's stdout/stderr into reader threads that relay each line
/// into the desktop log.
fn relay_child_output(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        spawn_relay_thread(stdout, "n8n");
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_relay_thread(stderr, "n8n error");
    }
}

fn spawn_relay_thread<R>(stream: R, prefix: &'static str)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                Ok(line) => append_server_log(&format!("{prefix}: {line}")),
                Err(error) => {
                    append_desktop_log(&format!("server output relay ended ({prefix}): {error}"));
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_for_test(shell_command: &str) -> LaunchPlan {
        LaunchPlan {
            shell_command: shell_command.to_string(),
            user_data_dir: PathBuf::from("/tmp/userdata/.n8n"),
            port: 5678,
        }
    }

    #[test]
    fn shell_command_line_quotes_entry_point_paths() {
        let line = shell_command_line(Path::new("/opt/my apps/n8n/bin/n8n"));
        assert_eq!(line, "\"node\" \"/opt/my apps/n8n/bin/n8n\" start");
    }

    #[test]
    fn launch_env_overrides_user_folder_and_port() {
        let env = launch_env(&plan_for_test("\"node\" \"n8n\" start"));
        assert!(env.contains(&("N8N_USER_FOLDER".to_string(), "/tmp/userdata/.n8n".to_string())));
        assert!(env.contains(&("N8N_PORT".to_string(), "5678".to_string())));
    }

    #[test]
    fn validate_custom_command_rejects_unparseable_or_empty_input() {
        assert!(validate_custom_command("pnpm start \"unclosed").is_err());
        assert!(validate_custom_command("   ").is_err());
        assert_eq!(
            validate_custom_command("pnpm run dev --port 5678").expect("valid command"),
            "pnpm run dev --port 5678"
        );
    }
}

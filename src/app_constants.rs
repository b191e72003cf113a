use std::time::Duration;

pub(crate) const DEFAULT_SERVER_PORT: u16 = 5678;
pub(crate) const SERVER_PORT_ENV: &str = "N8N_PORT";
pub(crate) const SERVER_CMD_ENV: &str = "N8N_DESKTOP_SERVER_CMD";
pub(crate) const CLI_PATH_ENV: &str = "N8N_CLI_PATH";
pub(crate) const LOCALES_DIR_ENV: &str = "N8N_DESKTOP_LOCALES_DIR";
pub(crate) const USER_FOLDER_ENV: &str = "N8N_USER_FOLDER";
pub(crate) const ELECTRON_RUN_AS_NODE_ENV: &str = "ELECTRON_RUN_AS_NODE";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1400.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 900.0;

pub(crate) const READY_MAX_ATTEMPTS: u32 = 60;
pub(crate) const READY_INITIAL_DELAY: Duration = Duration::from_millis(2_000);
pub(crate) const READY_POLL_INTERVAL: Duration = Duration::from_millis(1_000);
pub(crate) const READY_PROBE_TIMEOUT: Duration = Duration::from_millis(2_000);

pub(crate) const RESTART_DELAY: Duration = Duration::from_millis(1_000);
pub(crate) const PORT_RELEASE_GRACE: Duration = Duration::from_millis(1_000);

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 3;

pub(crate) const DEFAULT_SHELL_LOCALE: &str = "en";

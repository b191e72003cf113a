use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Server,
    Restart,
    Shutdown,
}

impl DesktopLogCategory {
    fn label(self) -> &'static str {
        match self {
            DesktopLogCategory::Startup => "startup",
            DesktopLogCategory::Runtime => "runtime",
            DesktopLogCategory::Server => "server",
            DesktopLogCategory::Restart => "restart",
            DesktopLogCategory::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(user_data_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    user_data_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
        .join(file_name)
}

fn format_log_line(category: DesktopLogCategory, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{timestamp}] [{}] {}\n", category.label(), message)
}

/// Appends one line to the desktop log, rotating the file when it grows past
/// `max_bytes`. Failures fall back to stderr so a broken log path never takes
/// the shell down.
pub(crate) fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    log_path: &Path,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(category, message);
    let lock = write_lock.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Err(error) = append_line(&line, log_path, max_bytes, backup_count) {
        eprintln!("n8n desktop log write failed ({error}): {}", line.trim_end());
    }
}

fn append_line(
    line: &str,
    log_path: &Path,
    max_bytes: u64,
    backup_count: usize,
) -> Result<(), String> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|error| format!("cannot create {}: {error}", parent.display()))?;
    }

    if should_rotate(log_path, max_bytes) {
        rotate_log_files(log_path, backup_count);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("cannot open {}: {error}", log_path.display()))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("cannot write {}: {error}", log_path.display()))
}

fn should_rotate(log_path: &Path, max_bytes: u64) -> bool {
    fs::metadata(log_path)
        .map(|metadata| metadata.len() >= max_bytes)
        .unwrap_or(false)
}

fn backup_path(log_path: &Path, index: usize) -> PathBuf {
    let mut name = log_path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn rotate_log_files(log_path: &Path, backup_count: usize) {
    if backup_count == 0 {
        let _ = fs::remove_file(log_path);
        return;
    }

    let _ = fs::remove_file(backup_path(log_path, backup_count));
    for index in (1..backup_count).rev() {
        let _ = fs::rename(backup_path(log_path, index), backup_path(log_path, index + 1));
    }
    let _ = fs::rename(log_path, backup_path(log_path, 1));
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    #[test]
    fn append_desktop_log_creates_file_with_category_tag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("logs").join("desktop.log");
        let lock: OnceLock<Mutex<()>> = OnceLock::new();

        append_desktop_log(
            DesktopLogCategory::Startup,
            "desktop process starting",
            &log_path,
            1024,
            2,
            &lock,
        );

        let contents = std::fs::read_to_string(&log_path).expect("log file readable");
        assert!(contents.contains("[startup] desktop process starting"));
    }

    #[test]
    fn log_rotation_keeps_bounded_number_of_backups() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("desktop.log");
        let lock: OnceLock<Mutex<()>> = OnceLock::new();

        // Tiny rotation threshold so every line forces a rotation.
        for index in 0..5 {
            append_desktop_log(
                DesktopLogCategory::Runtime,
                &format!("line {index}"),
                &log_path,
                1,
                2,
                &lock,
            );
        }

        assert!(log_path.exists());
        assert!(backup_path(&log_path, 1).exists());
        assert!(backup_path(&log_path, 2).exists());
        assert!(!backup_path(&log_path, 3).exists());
    }

    #[test]
    fn resolve_desktop_log_path_falls_back_to_current_dir() {
        let resolved = resolve_desktop_log_path(None, "desktop.log");
        assert_eq!(resolved, PathBuf::from("./logs/desktop.log"));
    }
}

use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{append_desktop_log, CLI_PATH_ENV};

/// Locates the n8n CLI entry point. Tries the explicit override, then a
/// `PATH` lookup, then candidate filesystem paths; when nothing exists the
/// first candidate is returned unverified and the failure surfaces later as
/// a spawn error.
pub(crate) fn resolve_cli_entry_point() -> PathBuf {
    let override_path = env::var(CLI_PATH_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let standard = which::which("n8n").ok();
    let candidates = candidate_entry_points();

    let (entry_point, verified) = pick_entry_point(override_path, standard, candidates);
    if !verified {
        append_desktop_log(&format!(
            "n8n CLI entry point not found, falling back to {}",
            entry_point.display()
        ));
    }
    entry_point
}

fn candidate_entry_points() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe) = env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.join("../../cli/bin/n8n"));
        }
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join("packages").join("cli").join("bin").join("n8n"));
    }
    candidates
}

/// Pure selection: override wins unconditionally, then the `PATH` hit, then
/// the first candidate that exists. Returns whether the chosen path was
/// actually verified to exist.
fn pick_entry_point(
    override_path: Option<PathBuf>,
    standard: Option<PathBuf>,
    candidates: Vec<PathBuf>,
) -> (PathBuf, bool) {
    if let Some(path) = override_path {
        return (path, true);
    }
    if let Some(path) = standard {
        return (path, true);
    }
    if let Some(existing) = candidates.iter().find(|path| path.is_file()) {
        return (existing.clone(), true);
    }

    let fallback = candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| Path::new("n8n").to_path_buf());
    (fallback, false)
}

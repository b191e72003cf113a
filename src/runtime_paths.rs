use std::path::PathBuf;

use tauri::{path::BaseDirectory, AppHandle, Manager};

/// Directory handed to the server as `N8N_USER_FOLDER`. Mirrors the
/// `userData/.n8n` layout the server expects.
pub(crate) fn user_data_dir(app_handle: &AppHandle) -> Option<PathBuf> {
    app_handle
        .path()
        .app_data_dir()
        .ok()
        .map(|dir| dir.join(".n8n"))
        .or_else(default_user_data_dir)
}

/// Fallback used by code paths that run without an `AppHandle`, such as
/// logging before the Tauri builder has finished.
pub(crate) fn default_user_data_dir() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".n8n"))
}

pub(crate) fn resolve_resource_path(app_handle: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app_handle
        .path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}

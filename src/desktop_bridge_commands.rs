use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, server_lifecycle::ServerState, server_restart};

#[tauri::command]
pub(crate) fn desktop_bridge_get_n8n_url(app_handle: AppHandle) -> String {
    let state = app_handle.state::<ServerState>();
    state.server_url().to_string()
}

#[tauri::command]
pub(crate) async fn desktop_bridge_restart_n8n(app_handle: AppHandle) -> bool {
    let task_handle = app_handle.clone();
    let joined = tauri::async_runtime::spawn_blocking(move || {
        server_restart::run_restart_flow(&task_handle);
    })
    .await;

    if let Err(error) = joined {
        append_desktop_log(&format!("restart task failed to run: {error}"));
    }
    // The bridge reports success once the sequence has been initiated.
    true
}

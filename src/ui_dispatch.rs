use tauri::AppHandle;

/// Schedules `task` on the main thread. Window mutations triggered from
/// worker threads funnel through here.
pub(crate) fn run_on_main_thread_dispatch<F>(
    app_handle: &AppHandle,
    context: &str,
    task: F,
) -> Result<(), String>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let task_handle = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&task_handle))
        .map_err(|error| format!("failed to dispatch {context}: {error}"))
}

use tauri::{Manager, RunEvent};

use crate::{
    append_shutdown_log, append_startup_log, desktop_bridge, logging, main_window, runtime_paths,
    server_lifecycle::ServerState, startup_task, translations::Translations, DEFAULT_SHELL_LOCALE,
    DESKTOP_LOG_FILE,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(runtime_paths::default_user_data_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            main_window::show_main_window(app_handle);
        }))
        .manage(ServerState::default())
        .manage(Translations::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_get_n8n_url,
            crate::desktop_bridge_commands::desktop_bridge_restart_n8n,
        ])
        .on_page_load(|webview, payload| {
            let state = webview.app_handle().state::<ServerState>();
            if desktop_bridge::should_inject_desktop_bridge(
                state.server_url(),
                payload.url().as_str(),
            ) {
                desktop_bridge::inject_desktop_bridge(webview);
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();

            let translations = app_handle.state::<Translations>();
            translations.initialize(
                DEFAULT_SHELL_LOCALE,
                runtime_paths::resolve_resource_path(&app_handle, "locales").as_deref(),
            );

            if let Err(error) = main_window::create_main_window(&app_handle) {
                append_startup_log(&format!("failed to create main window: {error}"));
            }

            startup_task::spawn_startup_task(app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                // Platform convention: closing the last window keeps the app
                // alive on macOS; everywhere else the server goes down with
                // the windows.
                if cfg!(target_os = "macos") && code.is_none() {
                    api.prevent_exit();
                    return;
                }
                let state = app_handle.state::<ServerState>();
                state.stop();
            }
            RunEvent::Exit => {
                append_shutdown_log("desktop process exiting");
                let state = app_handle.state::<ServerState>();
                state.stop();
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                if let Err(error) = main_window::create_main_window(app_handle) {
                    crate::append_desktop_log(&format!(
                        "failed to re-create main window on reactivation: {error}"
                    ));
                }
            }
            _ => {}
        });
}

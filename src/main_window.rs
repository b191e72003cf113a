use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use url::Url;

use crate::{
    append_desktop_log, append_startup_log, startup_pages, translations::Translations,
    MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL, MAIN_WINDOW_WIDTH,
};

/// Creates the main window showing the inline loading page. When a window
/// already exists it is shown and focused instead; at most one main window
/// exists at any time.
pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        show_main_window(app_handle);
        return Ok(());
    }

    let translations = app_handle.state::<Translations>();
    let loading_url = startup_pages::data_url(&startup_pages::loading_page_html(&translations));
    let parsed = Url::parse(&loading_url)
        .map_err(|error| format!("Failed to build loading page URL: {error}"))?;

    WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(parsed))
        .title("n8n")
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))?;

    append_startup_log("main window created with loading page");
    Ok(())
}

/// Replaces the displayed content. Late callbacks land here after the window
/// may already be gone, so a missing window only logs and becomes a no-op.
pub(crate) fn navigate_main_window(app_handle: &AppHandle, url: &str, context: &str) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log(&format!("main window closed, skipping navigation ({context})"));
        return;
    };

    let script = match serde_json::to_string(url) {
        Ok(encoded) => format!("window.location.replace({encoded});"),
        Err(error) => {
            append_desktop_log(&format!("failed to encode navigation target: {error}"));
            return;
        }
    };
    if let Err(error) = window.eval(&script) {
        append_desktop_log(&format!("failed to navigate main window ({context}): {error}"));
    }
}

pub(crate) fn show_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus main window: {error}"));
    }
}

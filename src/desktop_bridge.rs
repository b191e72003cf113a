//! The narrow bridge exposed to the displayed page. Instead of handing the
//! page host access, a small script published on server-origin pages maps
//! `window.electronAPI` onto the two invoke commands.

use crate::append_desktop_log;

const BRIDGE_SCRIPT: &str = r#"
(function () {
	if (window.electronAPI) {
		return;
	}
	var invoke = window.__TAURI_INTERNALS__ && window.__TAURI_INTERNALS__.invoke;
	if (!invoke) {
		return;
	}
	window.electronAPI = {
		getN8nUrl: function () {
			return invoke('desktop_bridge_get_n8n_url');
		},
		restartN8n: function () {
			return invoke('desktop_bridge_restart_n8n');
		},
	};
})();
"#;

/// The bridge belongs only to pages served by the backend, not to the inline
/// loading/error documents or anything else.
pub(crate) fn should_inject_desktop_bridge(server_url: &str, page_url: &str) -> bool {
    page_url.starts_with(server_url.trim_end_matches('/'))
}

pub(crate) fn inject_desktop_bridge(webview: &tauri::Webview<tauri::Wry>) {
    if let Err(error) = webview.eval(BRIDGE_SCRIPT) {
        append_desktop_log(&format!("failed to inject desktop bridge: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_is_injected_on_server_origin_pages_only() {
        let server_url = "http://localhost:5678/";
        assert!(should_inject_desktop_bridge(server_url, "http://localhost:5678/"));
        assert!(should_inject_desktop_bridge(
            server_url,
            "http://localhost:5678/workflows/new"
        ));
        assert!(!should_inject_desktop_bridge(server_url, "http://localhost:9999/"));
        assert!(!should_inject_desktop_bridge(server_url, "data:text/html;charset=utf-8,x"));
        assert!(!should_inject_desktop_bridge(server_url, "tauri://localhost/index.html"));
    }

    #[test]
    fn bridge_script_exposes_exactly_the_two_operations() {
        assert!(BRIDGE_SCRIPT.contains("getN8nUrl"));
        assert!(BRIDGE_SCRIPT.contains("restartN8n"));
        assert!(BRIDGE_SCRIPT.contains("desktop_bridge_get_n8n_url"));
        assert!(BRIDGE_SCRIPT.contains("desktop_bridge_restart_n8n"));
    }
}

use std::thread;

use tauri::{AppHandle, Manager};

use crate::{
    append_startup_log, main_window, server_launch, server_lifecycle::ServerState,
    server_readiness::{self, PollOutcome, PollPolicy, ProbeOutcome},
    startup_pages, translations::Translations, ui_dispatch, READY_PROBE_TIMEOUT,
};

/// Starts the server and drives the readiness poll off the main thread.
/// Every polling run ends in exactly one window update: the live UI on
/// success, an inline error page on exhaustion.
pub(crate) fn spawn_startup_task(app_handle: AppHandle) {
    thread::spawn(move || run_startup(app_handle));
}

fn run_startup(app_handle: AppHandle) {
    let state = app_handle.state::<ServerState>();

    match server_launch::resolve_launch_plan(&app_handle, state.port()) {
        Ok(plan) => state.start(&plan),
        Err(error) => append_startup_log(&format!("cannot build server launch plan: {error}")),
    }

    let server_url = state.server_url().to_string();
    let outcome = server_readiness::poll_until_ready(
        PollPolicy::default(),
        |_attempt| {
            let probed = server_readiness::http_probe(&server_url, READY_PROBE_TIMEOUT);
            if probed != ProbeOutcome::Ready {
                state.check_unexpected_exit();
            }
            probed
        },
        thread::sleep,
    );

    match outcome {
        PollOutcome::Ready { attempts } => {
            append_startup_log(&format!("server ready after {attempts} attempt(s)"));
            dispatch_navigation(&app_handle, server_url, "navigate to live server UI");
        }
        PollOutcome::ServerErroring { attempts } => {
            append_startup_log(&format!(
                "server kept answering with errors through {attempts} attempts"
            ));
            let translations = app_handle.state::<Translations>();
            let page = startup_pages::data_url(&startup_pages::erroring_error_page_html(
                &translations,
            ));
            dispatch_navigation(&app_handle, page, "show server error page");
        }
        PollOutcome::NeverReachable { attempts } => {
            append_startup_log(&format!("server never became reachable in {attempts} attempts"));
            let translations = app_handle.state::<Translations>();
            let page = startup_pages::data_url(&startup_pages::unreachable_error_page_html(
                &translations,
                attempts,
            ));
            dispatch_navigation(&app_handle, page, "show unreachable error page");
        }
    }
}

fn dispatch_navigation(app_handle: &AppHandle, url: String, context: &'static str) {
    let dispatched = ui_dispatch::run_on_main_thread_dispatch(app_handle, context, move |app| {
        main_window::navigate_main_window(app, &url, context);
    });
    if let Err(error) = dispatched {
        append_startup_log(&error);
    }
}

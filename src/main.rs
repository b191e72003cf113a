#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod desktop_bridge;
mod desktop_bridge_commands;
mod logging;
mod main_window;
mod port_guard;
mod runtime_paths;
mod server_config;
mod server_launch;
mod server_lifecycle;
mod server_path;
mod server_readiness;
mod server_restart;
mod startup_pages;
mod startup_task;
mod translations;
mod ui_dispatch;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_restart_log, append_server_log, append_shutdown_log,
    append_startup_log,
};

fn main() {
    app_runtime::run();
}

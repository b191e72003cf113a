use std::thread;

use tauri::{AppHandle, Manager};

use crate::{
    append_restart_log, port_guard, server_launch, server_lifecycle::ServerState, RESTART_DELAY,
};

/// Full stop/start cycle: kill the tracked process, force-free the port,
/// wait a fixed delay, then start again. Success is reported once the
/// sequence has been initiated; a failed spawn only shows up later through
/// poll exhaustion. Concurrent invocations are not guarded against and run
/// in undefined order.
pub(crate) fn run_restart_flow(app_handle: &AppHandle) {
    let state = app_handle.state::<ServerState>();
    append_restart_log("server restart requested");

    state.stop();
    port_guard::free_port(state.port());
    thread::sleep(RESTART_DELAY);

    match server_launch::resolve_launch_plan(app_handle, state.port()) {
        Ok(plan) => state.start(&plan),
        Err(error) => append_restart_log(&format!("restart could not build a launch plan: {error}")),
    }
    append_restart_log("server restart sequence initiated");
}

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod content_message;
mod context_actions;
mod context_menu;
mod context_menu_handler;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod export;
mod header_policy;
mod launch_config;
mod launch_plan;
mod logging;
mod main_window;
mod preferences;
mod readiness;
mod runtime_paths;
mod session_url;
mod shell_locale;
mod shortcuts;
mod startup_task;
mod ui_dispatch;
mod wait_window;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_proxy_log, append_shutdown_log, append_startup_log,
};
pub(crate) use app_types::{AtomicFlagGuard, BridgeResult, LaunchState, SessionInfo, ShellState};

fn main() {
    app_runtime::run();
}

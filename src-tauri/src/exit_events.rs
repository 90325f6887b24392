use std::sync::atomic::Ordering;

use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{append_shutdown_log, ShellState};

pub(crate) const MAIN_WINDOW_FAILURE_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExitContext {
    pub(crate) startup_pending: bool,
    pub(crate) rebuilding: bool,
    pub(crate) keep_alive_without_windows: bool,
}

/// Explicit exits (`app.exit(code)`) always go through. Exits caused by the
/// last window closing are held back while startup has not produced a main
/// window yet or a theme rebuild is swapping windows.
pub(crate) fn should_prevent_exit(code: Option<i32>, context: ExitContext) -> bool {
    if code.is_some() {
        return false;
    }
    context.startup_pending || context.rebuilding || context.keep_alive_without_windows
}

/// A failed window build ends the process unless a main window is still open.
pub(crate) fn exit_code_after_window_failure(main_window_remaining: bool) -> Option<i32> {
    (!main_window_remaining).then_some(MAIN_WINDOW_FAILURE_EXIT_CODE)
}

fn current_exit_context(app_handle: &AppHandle) -> ExitContext {
    let (startup_pending, rebuilding) = app_handle
        .try_state::<ShellState>()
        .map(|state| {
            (
                state.startup_pending.load(Ordering::Acquire),
                state.is_rebuilding.load(Ordering::Acquire),
            )
        })
        .unwrap_or((true, false));

    ExitContext {
        startup_pending,
        rebuilding,
        keep_alive_without_windows: cfg!(target_os = "macos"),
    }
}

pub(crate) fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &ExitRequestApi) {
    let context = current_exit_context(app_handle);
    if should_prevent_exit(code, context) {
        append_shutdown_log(&format!("exit request ignored: {context:?}"));
        api.prevent_exit();
        return;
    }

    append_shutdown_log(&format!("exit requested with code {code:?}"));
}

pub(crate) fn handle_exit_event(_app_handle: &AppHandle) {
    append_shutdown_log("desktop process exiting; server app left running");
}

/// macOS keeps the process alive with no windows; clicking the dock icon
/// opens a fresh main window.
#[cfg(target_os = "macos")]
pub(crate) fn handle_reopen(app_handle: &AppHandle, has_visible_windows: bool) {
    if has_visible_windows {
        return;
    }

    let state = app_handle.state::<ShellState>();
    if state.startup_pending.load(Ordering::Acquire) || state.main_window(app_handle).is_some() {
        return;
    }

    crate::ui_dispatch::spawn_window_task(app_handle, |app_handle| {
        if let Err(error) =
            crate::main_window::create_main_window(&app_handle, crate::append_desktop_log)
        {
            crate::append_desktop_log(&error);
        }
    });
}

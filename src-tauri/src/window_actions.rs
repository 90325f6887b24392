use tauri::{AppHandle, Manager};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use url::Url;

use crate::{
    append_desktop_log,
    content_message::{send_to_content, ContentMessage},
    desktop_bridge_commands::{open_with_system_handler, parse_openable_url},
    exit_events, main_window,
    preferences::{FontSize, Theme},
    ui_dispatch, AtomicFlagGuard, LaunchState, ShellState, APP_TITLE,
};

pub fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::reload_main_window(app_handle, log);
}

pub fn load_default_url<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::load_initial_url(app_handle, log);
}

pub fn toggle_always_on_top<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let always_on_top = !state.preferences().always_on_top;
    if let Err(error) = state.update_preferences(|store| store.set_always_on_top(always_on_top)) {
        log(&format!("failed to persist always-on-top: {error}"));
    }

    let Some(window) = state.main_window(app_handle) else {
        log("toggle_always_on_top skipped: main window not found");
        return;
    };
    if let Err(error) = window.set_always_on_top(always_on_top) {
        log(&format!("failed to set always-on-top: {error}"));
    }
}

pub(crate) fn set_font_size<F>(app_handle: &AppHandle, font_size: FontSize, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    if let Err(error) = state.update_preferences(|store| store.set_font_size(font_size)) {
        log(&format!("failed to persist font size: {error}"));
    }
    send_to_content(app_handle, &ContentMessage::SetFontSize(font_size), log);
}

/// Moves the font size one step; at either end of the legal range nothing
/// changes.
pub(crate) fn step_font_size<F>(app_handle: &AppHandle, larger: bool, log: F)
where
    F: Fn(&str),
{
    let current = app_handle.state::<ShellState>().preferences().font_size;
    let next = if larger {
        current.larger()
    } else {
        current.smaller()
    };
    if let Some(next) = next {
        set_font_size(app_handle, next, log);
    }
}

/// Saves the theme, then offers to rebuild the window so the page picks up
/// the new scheme.
pub(crate) fn change_theme<F>(app_handle: &AppHandle, theme: Theme, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    if let Err(error) = state.update_preferences(|store| store.set_theme(theme)) {
        log(&format!("failed to persist theme: {error}"));
    }

    let reload_app = app_handle.clone();
    app_handle
        .dialog()
        .message(format!("Do you want to reload {APP_TITLE} now?"))
        .title("Theme Saved")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .show(move |reload_now| {
            if reload_now {
                ui_dispatch::spawn_window_task(&reload_app, |app_handle| {
                    rebuild_main_window(&app_handle, append_desktop_log);
                });
            }
        });
}

/// Closes the current main window and opens a new one. Runs off the main
/// thread.
pub(crate) fn rebuild_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let Some(_rebuilding) = AtomicFlagGuard::try_set(&state.is_rebuilding) else {
        log("rebuild_main_window skipped: rebuild already in progress");
        return;
    };

    let mut old_window_kept = false;
    if let Some(window) = state.main_window(app_handle) {
        if let Err(error) = window.close() {
            log(&format!("failed to close main window for rebuild: {error}"));
            old_window_kept = true;
        }
    }

    if let Err(error) = main_window::create_main_window(app_handle, &log) {
        log(&error);
        if exit_events::exit_code_after_window_failure(old_window_kept).is_some() {
            main_window::exit_without_main_window(app_handle, &error);
        }
    }
}

/// Asks for confirmation, then clears cookies and storage and reloads.
pub fn reset_session<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    if app_handle.state::<ShellState>().main_window(app_handle).is_none() {
        log("reset_session skipped: main window not found");
        return;
    }

    let reset_app = app_handle.clone();
    app_handle
        .dialog()
        .message("Are you sure to clear the all cache data?")
        .title("Reset")
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::YesNo)
        .show(move |confirmed| {
            if !confirmed {
                return;
            }
            let Some(window) = reset_app.state::<ShellState>().main_window(&reset_app) else {
                append_desktop_log("reset skipped: main window closed before confirmation");
                return;
            };
            if let Err(error) = window.clear_all_browsing_data() {
                append_desktop_log(&format!("failed to clear browsing data: {error}"));
                return;
            }
            append_desktop_log("browsing data cleared");
            if let Err(error) = window.reload() {
                append_desktop_log(&format!("failed to reload after reset: {error}"));
            }
        });
}

pub fn show_current_url<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.state::<ShellState>().main_window(app_handle) else {
        log("show_current_url skipped: main window not found");
        return;
    };

    let url = match window.url() {
        Ok(url) => url.to_string(),
        Err(error) => {
            log(&format!("failed to read the current URL: {error}"));
            return;
        }
    };

    if let Err(error) = app_handle.clipboard().write_text(url.clone()) {
        log(&format!("failed to copy the current URL: {error}"));
    }
    app_handle
        .dialog()
        .message(format!("Current URL is\n{url}"))
        .title("Current URL")
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

pub fn load_url_from_clipboard<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let text = match app_handle.clipboard().read_text() {
        Ok(text) => text,
        Err(error) => {
            log(&format!("failed to read the clipboard: {error}"));
            String::new()
        }
    };
    confirm_load_url(app_handle, &text, log);
}

pub(crate) fn clipboard_url(text: &str) -> Result<Url, String> {
    if text.trim().is_empty() {
        return Err("The clipboard does not contain any text.".to_string());
    }
    parse_openable_url(text)
}

fn confirm_load_url<F>(app_handle: &AppHandle, text: &str, log: F)
where
    F: Fn(&str),
{
    let url = match clipboard_url(text) {
        Ok(url) => url,
        Err(error) => {
            log(&format!("clipboard URL rejected: {error}"));
            app_handle
                .dialog()
                .message(format!("Load URL is\n{}\n\n{error}", text.trim()))
                .title("Load URL")
                .kind(MessageDialogKind::Info)
                .show(|_| {});
            return;
        }
    };

    let load_app = app_handle.clone();
    app_handle
        .dialog()
        .message(format!("Load URL is\n{url}"))
        .title("Load URL")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .show(move |confirmed| {
            if confirmed {
                main_window::navigate_main_window(&load_app, url, append_desktop_log);
            }
        });
}

pub fn open_config_file<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let config_path = app_handle.state::<LaunchState>().config_path.clone();
    if let Err(error) = open_with_system_handler(&config_path.to_string_lossy()) {
        log(&format!(
            "failed to open config file {}: {error}",
            config_path.display()
        ));
    }
}

pub fn open_external_link<F>(url: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = open_with_system_handler(url) {
        log(&format!("failed to open {url}: {error}"));
    }
}

use tauri::{window::Color, AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use url::Url;

use crate::{
    append_desktop_log, append_shutdown_log, desktop_bridge,
    exit_events::MAIN_WINDOW_FAILURE_EXIT_CODE,
    header_policy::USER_AGENT,
    launch_config::proxy_url_from_rules,
    preferences::Theme,
    session_url::{self, background_rgb, initial_url, is_login_redirect},
    shell_locale, ui_dispatch, LaunchState, SessionInfo, ShellState, APP_TITLE, BLANK_PAGE,
    DEFAULT_CONTENT_LOCALE,
};

const MAIN_WINDOW_WIDTH: f64 = 601.0;
const MAIN_WINDOW_HEIGHT: f64 = 800.0;

/// Builds a new main window and loads the chat page into it.
///
/// The window starts hidden on a local blank page so that the OS theme can
/// be read from it before the initial URL (which encodes the scheme) is
/// computed. A window that fails after being built is destroyed before the
/// error is returned. Must not be called from a synchronous command or menu
/// handler.
pub(crate) fn create_main_window<F>(app_handle: &AppHandle, log: F) -> Result<WebviewWindow, String>
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let preferences = state.preferences();
    let label = state.next_window_label();
    let bridge_script = desktop_bridge::desktop_bridge_script(preferences.font_size)?;

    let navigation_app = app_handle.clone();
    #[cfg_attr(target_os = "macos", allow(unused_mut))]
    let mut builder =
        WebviewWindowBuilder::new(app_handle, label.as_str(), WebviewUrl::App(BLANK_PAGE.into()))
            .title(APP_TITLE)
            .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
            .user_agent(USER_AGENT)
            .always_on_top(preferences.always_on_top)
            .theme(session_url::window_theme_override(preferences.theme))
            .visible(false)
            .initialization_script(&bridge_script)
            .on_navigation(move |url| {
                if !is_login_redirect(url) {
                    return true;
                }
                reload_initial_url_later(&navigation_app);
                false
            });

    if let Some(rules) = app_handle.state::<LaunchState>().config.proxy_rules() {
        match proxy_url_from_rules(rules) {
            #[cfg(not(target_os = "macos"))]
            Ok(proxy_url) => {
                log(&format!("routing main window traffic through {proxy_url}"));
                builder = builder.proxy_url(proxy_url);
            }
            #[cfg(target_os = "macos")]
            Ok(proxy_url) => {
                log(&format!(
                    "proxy rules {proxy_url} ignored: per-window proxies are unsupported on macOS"
                ));
            }
            Err(error) => log(&format!("ignoring proxy rules: {error}")),
        }
    }

    let window = builder
        .build()
        .map_err(|error| format!("Failed to create main window '{label}': {error}"))?;

    if let Err(error) = load_session(app_handle, &window, preferences.theme, &log) {
        if let Err(destroy_error) = window.destroy() {
            log(&format!("failed to destroy half-built window '{label}': {destroy_error}"));
        }
        return Err(error);
    }

    state.finish_startup();
    Ok(window)
}

fn load_session<F>(
    app_handle: &AppHandle,
    window: &WebviewWindow,
    theme: Theme,
    log: F,
) -> Result<(), String>
where
    F: Fn(&str),
{
    let label = window.label().to_string();
    let os_prefers_dark = match window.theme() {
        Ok(theme) => theme == tauri::Theme::Dark,
        Err(error) => {
            log(&format!("failed to read window theme, assuming light: {error}"));
            false
        }
    };
    let is_dark_mode = session_url::resolve_dark_mode(theme, os_prefers_dark);
    let (red, green, blue) = background_rgb(is_dark_mode);
    if let Err(error) = window.set_background_color(Some(Color(red, green, blue, 255))) {
        log(&format!("failed to set main window background: {error}"));
    }

    let locale = shell_locale::resolve_content_locale(DEFAULT_CONTENT_LOCALE);
    let url = initial_url(is_dark_mode, &locale)?;
    log(&format!("initial URL: {url}"));
    window
        .navigate(url.clone())
        .map_err(|error| format!("Failed to load the chat page in '{label}': {error}"))?;
    app_handle.state::<ShellState>().set_session(SessionInfo {
        label,
        initial_url: url,
        is_dark_mode,
    });
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
    Ok(())
}

/// Without a main window there is nothing left to interact with, so the
/// failure is shown and the process exits with status 1.
pub(crate) fn exit_without_main_window(app_handle: &AppHandle, error: &str) {
    append_shutdown_log(&format!("exiting: no main window ({error})"));
    app_handle
        .dialog()
        .message(format!("{APP_TITLE} could not open its window.\n{error}"))
        .title(APP_TITLE)
        .kind(MessageDialogKind::Error)
        .blocking_show();
    app_handle.exit(MAIN_WINDOW_FAILURE_EXIT_CODE);
}

/// Navigation cannot be restarted from inside the navigation callback, so
/// the reload is queued behind it.
fn reload_initial_url_later(app_handle: &AppHandle) {
    if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
        app_handle,
        "reload initial URL after sign-in",
        |main_app| load_initial_url(main_app, append_desktop_log),
    ) {
        append_desktop_log(&error);
    }
}

/// Points the current main window back at the URL it was opened with.
pub(crate) fn load_initial_url<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let Some(session) = state.session() else {
        log("load_initial_url skipped: no main window session");
        return;
    };
    navigate_main_window(app_handle, session.initial_url, log);
}

pub(crate) fn navigate_main_window<F>(app_handle: &AppHandle, url: Url, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.state::<ShellState>().main_window(app_handle) else {
        log("navigate_main_window skipped: main window not found");
        return;
    };

    let target = url.to_string();
    if let Err(error) = window.navigate(url) {
        log(&format!("failed to navigate main window to {target}: {error}"));
    }
}

pub(crate) fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.state::<ShellState>().main_window(app_handle) else {
        log("reload_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.reload() {
        log(&format!("failed to reload main window: {error}"));
    }
}

pub(crate) fn focus_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.state::<ShellState>().main_window(app_handle) else {
        log("focus_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

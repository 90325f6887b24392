use std::process::{Command, Stdio};
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use url::Url;

use crate::{
    append_desktop_log,
    content_message::{send_to_content, ContentMessage},
    context_menu,
    export::{default_export_file_name, write_export, ExportFormat},
    preferences::FontSize,
    shortcuts::{self, ShortcutAction},
    window_actions, BridgeResult, ShellState, FONT_SIZE_PUSH_DELAY,
};

pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

/// Opens a URL or a file path with whatever the OS associates with it.
#[cfg(target_os = "macos")]
pub(crate) fn open_with_system_handler(target: &str) -> Result<(), String> {
    Command::new("open")
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
pub(crate) fn open_with_system_handler(target: &str) -> Result<(), String> {
    Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", target])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) fn open_with_system_handler(target: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
pub(crate) fn open_with_system_handler(_target: &str) -> Result<(), String> {
    Err("Opening files and URLs is not supported on this platform.".to_string())
}

fn show_error_dialog(app_handle: &AppHandle, detail: &str) {
    app_handle
        .dialog()
        .message(detail)
        .title("Error")
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

/// Asks where to save an export produced by the page and writes it there.
#[tauri::command]
pub(crate) async fn desktop_bridge_export_data(
    app_handle: AppHandle,
    format: String,
    data_url: String,
) -> BridgeResult {
    let Some(format) = ExportFormat::parse(&format) else {
        append_desktop_log(&format!("export ignored: unknown format '{format}'"));
        return BridgeResult::rejected("Unknown export format.");
    };

    let file_name = default_export_file_name(format, chrono::Utc::now().timestamp());
    let Some(target) = app_handle
        .dialog()
        .file()
        .set_title("Export")
        .set_file_name(&file_name)
        .add_filter(format.filter_name(), &[format.extension()])
        .blocking_save_file()
    else {
        return BridgeResult::rejected("Export cancelled.");
    };

    let result = target
        .into_path()
        .map_err(|error| format!("Invalid export path: {error}"))
        .and_then(|path| write_export(&path, &data_url));
    if let Err(error) = &result {
        append_desktop_log(&format!("export failed: {error}"));
        show_error_dialog(&app_handle, error);
    }
    result.into()
}

/// Pushes the stored font size to a freshly loaded page, unless it is the
/// page's own default.
#[tauri::command]
pub(crate) fn desktop_bridge_get_font_size(app_handle: AppHandle) -> u8 {
    let font_size = app_handle.state::<ShellState>().preferences().font_size;
    if font_size != FontSize::DEFAULT {
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(FONT_SIZE_PUSH_DELAY).await;
            send_to_content(
                &app_handle,
                &ContentMessage::SetFontSize(font_size),
                append_desktop_log,
            );
        });
    }
    font_size.value()
}

#[tauri::command]
pub(crate) fn desktop_bridge_report_error(app_handle: AppHandle, detail: String) -> BridgeResult {
    append_desktop_log(&format!("page reported error: {detail}"));
    show_error_dialog(&app_handle, &detail);
    BridgeResult::ok()
}

#[tauri::command]
pub(crate) fn desktop_bridge_key_chord(app_handle: AppHandle, code: String) -> BridgeResult {
    let Some(action) = shortcuts::action_for_key_code(&code) else {
        return BridgeResult::rejected(format!("Unknown shortcut '{code}'."));
    };

    match action {
        ShortcutAction::Reload => {
            window_actions::reload_main_window(&app_handle, append_desktop_log)
        }
        ShortcutAction::ToggleAlwaysOnTop => {
            window_actions::toggle_always_on_top(&app_handle, append_desktop_log)
        }
        ShortcutAction::FontLarger => {
            window_actions::step_font_size(&app_handle, true, append_desktop_log)
        }
        ShortcutAction::FontSmaller => {
            window_actions::step_font_size(&app_handle, false, append_desktop_log)
        }
        forwarded => {
            if let Some(message) = forwarded.content_message() {
                send_to_content(&app_handle, &message, append_desktop_log);
            }
        }
    }
    BridgeResult::ok()
}

#[tauri::command]
pub(crate) fn desktop_bridge_context_menu(
    app_handle: AppHandle,
    selection_text: String,
) -> BridgeResult {
    if !context_menu::should_show_context_menu(&selection_text) {
        return BridgeResult::rejected("Text is selected.");
    }

    context_menu::show_context_menu(&app_handle, append_desktop_log);
    BridgeResult::ok()
}

#[tauri::command]
pub(crate) fn desktop_bridge_open_external_url(url: String) -> BridgeResult {
    let parsed = match parse_openable_url(&url) {
        Ok(parsed) => parsed,
        Err(error) => return BridgeResult::rejected(error),
    };

    open_with_system_handler(parsed.as_ref()).into()
}

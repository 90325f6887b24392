use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log,
    content_message::{send_to_content, ContentMessage},
    context_actions::{self, ContextMenuAction},
    window_actions, ShellState, FEEDBACK_URL, RELEASES_URL,
};

pub fn handle_context_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(action) = context_actions::action_from_menu_id(menu_id) else {
        return;
    };

    match action {
        ContextMenuAction::Reload => {
            window_actions::reload_main_window(app_handle, append_desktop_log)
        }
        ContextMenuAction::ReloadDefaultUrl => {
            window_actions::load_default_url(app_handle, append_desktop_log)
        }
        ContextMenuAction::Export(format) => {
            let is_dark_mode = app_handle
                .state::<ShellState>()
                .session()
                .map(|session| session.is_dark_mode)
                .unwrap_or(false);
            send_to_content(
                app_handle,
                &ContentMessage::Export {
                    format,
                    is_dark_mode,
                },
                append_desktop_log,
            );
        }
        ContextMenuAction::ToggleAlwaysOnTop => {
            window_actions::toggle_always_on_top(app_handle, append_desktop_log)
        }
        ContextMenuAction::SetTheme(theme) => {
            append_desktop_log(&format!("theme changed to {}", theme.as_str()));
            window_actions::change_theme(app_handle, theme, append_desktop_log);
        }
        ContextMenuAction::SetFontSize(font_size) => {
            window_actions::set_font_size(app_handle, font_size, append_desktop_log)
        }
        ContextMenuAction::Reset => window_actions::reset_session(app_handle, append_desktop_log),
        ContextMenuAction::OpenFeedback => {
            window_actions::open_external_link(FEEDBACK_URL, append_desktop_log)
        }
        ContextMenuAction::OpenReleases => {
            window_actions::open_external_link(RELEASES_URL, append_desktop_log)
        }
        ContextMenuAction::OpenConfigFile => {
            window_actions::open_config_file(app_handle, append_desktop_log)
        }
        ContextMenuAction::ShowCurrentUrl => {
            window_actions::show_current_url(app_handle, append_desktop_log)
        }
        ContextMenuAction::LoadUrlFromClipboard => {
            window_actions::load_url_from_clipboard(app_handle, append_desktop_log)
        }
    }
}

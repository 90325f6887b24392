use serde::Serialize;
use serde_json::{json, Value};
use tauri::{AppHandle, Manager};

use crate::{export::ExportFormat, preferences::FontSize, ShellState, HOST_MESSAGE_EVENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ToneDirection {
    Left,
    Right,
}

/// Messages pushed from the shell into the embedded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContentMessage {
    Export {
        format: ExportFormat,
        is_dark_mode: bool,
    },
    SetFontSize(FontSize),
    NewTopic,
    FocusOnTextarea,
    StopResponding,
    SwitchTone(ToneDirection),
    QuickReply(u8),
}

impl ContentMessage {
    pub(crate) fn channel(&self) -> &'static str {
        match self {
            Self::Export { .. } => "export",
            Self::SetFontSize(_) => "set-font-size",
            Self::NewTopic => "new-topic",
            Self::FocusOnTextarea => "focus-on-textarea",
            Self::StopResponding => "stop-responding",
            Self::SwitchTone(_) => "switch-tone",
            Self::QuickReply(_) => "quick-reply",
        }
    }

    pub(crate) fn args(&self) -> Vec<Value> {
        match self {
            Self::Export {
                format,
                is_dark_mode,
            } => vec![json!(format), json!(is_dark_mode)],
            Self::SetFontSize(size) => vec![json!(size)],
            Self::NewTopic | Self::FocusOnTextarea | Self::StopResponding => Vec::new(),
            Self::SwitchTone(direction) => vec![json!(direction)],
            Self::QuickReply(index) => vec![json!(index)],
        }
    }

    pub(crate) fn to_dispatch_script(&self) -> String {
        let detail = json!({ "channel": self.channel(), "args": self.args() });
        let event = serde_json::to_string(HOST_MESSAGE_EVENT).unwrap_or_else(|_| "\"\"".to_string());
        format!("window.dispatchEvent(new CustomEvent({event}, {{ detail: {detail} }}));")
    }
}

/// Dispatches `message` into the current main window, if there is one.
pub(crate) fn send_to_content<F>(app_handle: &AppHandle, message: &ContentMessage, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.state::<ShellState>().main_window(app_handle) else {
        log(&format!(
            "content message '{}' dropped: main window not found",
            message.channel()
        ));
        return;
    };

    if let Err(error) = window.eval(&message.to_dispatch_script()) {
        log(&format!(
            "failed to send content message '{}': {error}",
            message.channel()
        ));
    }
}

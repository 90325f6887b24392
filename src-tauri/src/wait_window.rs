use tauri::{AppHandle, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::{readiness::WaitIndicator, APP_TITLE, WAIT_WINDOW_LABEL, WAIT_WINDOW_PAGE};

/// Frameless always-on-top window shown while the proxy is polled.
pub(crate) struct WaitWindow {
    window: WebviewWindow,
}

impl WaitWindow {
    pub(crate) fn open(app_handle: &AppHandle) -> Result<Self, String> {
        let window = WebviewWindowBuilder::new(
            app_handle,
            WAIT_WINDOW_LABEL,
            WebviewUrl::App(WAIT_WINDOW_PAGE.into()),
        )
        .title(APP_TITLE)
        .inner_size(500.0, 300.0)
        .resizable(false)
        .decorations(false)
        .always_on_top(true)
        .center()
        .build()
        .map_err(|error| format!("Failed to create proxy wait window: {error}"))?;
        Ok(Self { window })
    }
}

impl WaitIndicator for WaitWindow {
    fn dismiss(self) {
        if let Err(error) = self.window.close() {
            crate::append_proxy_log(&format!("failed to close proxy wait window: {error}"));
        }
    }
}

use std::{
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Mutex,
    },
};
use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

use crate::{
    launch_config::LaunchConfig,
    launch_plan,
    preferences::{Preferences, PreferencesStore},
    MAIN_WINDOW_LABEL,
};

/// Launch configuration resolved once at process start, plus the server app
/// it may have started.
#[derive(Debug)]
pub(crate) struct LaunchState {
    pub(crate) config: LaunchConfig,
    pub(crate) config_path: PathBuf,
    proxy_child: Mutex<Option<Child>>,
}

impl LaunchState {
    pub(crate) fn new(config: LaunchConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            proxy_child: Mutex::new(None),
        }
    }

    pub(crate) fn store_proxy_child(&self, child: Child) {
        match self.proxy_child.lock() {
            Ok(mut guard) => *guard = Some(child),
            Err(poisoned) => *poisoned.into_inner() = Some(child),
        }
    }

    pub(crate) fn proxy_child_exit_status(&self) -> Option<String> {
        let mut guard = self.proxy_child.lock().ok()?;
        let child = guard.as_mut()?;
        let status = launch_plan::poll_child_exit(child);
        if status.is_some() {
            *guard = None;
        }
        status
    }
}

/// What the current main window was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionInfo {
    pub(crate) label: String,
    pub(crate) initial_url: Url,
    pub(crate) is_dark_mode: bool,
}

#[derive(Debug)]
pub(crate) struct ShellState {
    preferences: Mutex<PreferencesStore>,
    session: Mutex<Option<SessionInfo>>,
    window_generation: AtomicU32,
    pub(crate) startup_pending: AtomicBool,
    pub(crate) is_rebuilding: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(preferences: PreferencesStore) -> Self {
        Self {
            preferences: Mutex::new(preferences),
            session: Mutex::new(None),
            window_generation: AtomicU32::new(0),
            startup_pending: AtomicBool::new(true),
            is_rebuilding: AtomicBool::new(false),
        }
    }

    pub(crate) fn preferences(&self) -> Preferences {
        self.preferences
            .lock()
            .map(|guard| guard.get())
            .unwrap_or_default()
    }

    /// Applies `change` to the store and returns the resulting preferences.
    /// The in-memory value changes even when persisting fails.
    pub(crate) fn update_preferences<F>(&self, change: F) -> Result<Preferences, String>
    where
        F: FnOnce(&mut PreferencesStore) -> Result<(), String>,
    {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|_| "Preferences lock poisoned".to_string())?;
        let result = change(&mut guard);
        result.map(|()| guard.get())
    }

    pub(crate) fn next_window_label(&self) -> String {
        window_label_for_generation(self.window_generation.fetch_add(1, Ordering::AcqRel))
    }

    pub(crate) fn session(&self) -> Option<SessionInfo> {
        self.session.lock().ok().and_then(|guard| guard.clone())
    }

    pub(crate) fn set_session(&self, session: SessionInfo) {
        match self.session.lock() {
            Ok(mut guard) => *guard = Some(session),
            Err(poisoned) => *poisoned.into_inner() = Some(session),
        }
    }

    pub(crate) fn main_window(&self, app_handle: &AppHandle) -> Option<WebviewWindow> {
        let label = self.session()?.label;
        app_handle.get_webview_window(&label)
    }

    pub(crate) fn finish_startup(&self) {
        self.startup_pending.store(false, Ordering::Release);
    }
}

pub(crate) fn window_label_for_generation(generation: u32) -> String {
    if generation == 0 {
        MAIN_WINDOW_LABEL.to_string()
    } else {
        format!("{MAIN_WINDOW_LABEL}-{generation}")
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), String>> for BridgeResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(reason) => Self::rejected(reason),
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::preferences::{FontSize, Theme};

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn window_labels_stay_unique_across_rebuilds() {
        let state = ShellState::new(PreferencesStore::in_memory());
        assert_eq!(state.next_window_label(), "main");
        assert_eq!(state.next_window_label(), "main-1");
        assert_eq!(state.next_window_label(), "main-2");
    }

    #[test]
    fn shell_state_starts_with_the_startup_gate_open() {
        let state = ShellState::new(PreferencesStore::in_memory());
        assert!(state.startup_pending.load(Ordering::Acquire));
        state.finish_startup();
        assert!(!state.startup_pending.load(Ordering::Acquire));
    }

    #[test]
    fn update_preferences_returns_the_new_values() {
        let state = ShellState::new(PreferencesStore::in_memory());
        let size = FontSize::new(20).expect("legal size");

        let updated = state
            .update_preferences(|store| {
                store.set_theme(Theme::Dark)?;
                store.set_font_size(size)
            })
            .expect("update");

        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.font_size, size);
        assert_eq!(state.preferences(), updated);
    }

    #[test]
    fn session_is_replaced_on_each_window() {
        let state = ShellState::new(PreferencesStore::in_memory());
        assert!(state.session().is_none());

        let url = Url::parse("https://edgeservices.bing.com/edgediscover/query").expect("url");
        state.set_session(SessionInfo {
            label: "main-1".to_string(),
            initial_url: url.clone(),
            is_dark_mode: true,
        });

        let session = state.session().expect("session stored");
        assert_eq!(session.label, "main-1");
        assert!(session.is_dark_mode);
    }

    #[test]
    fn bridge_result_wraps_errors_as_reasons() {
        let result = BridgeResult::from(Err("boom".to_string()));
        assert!(!result.ok);
        assert_eq!(result.reason.as_deref(), Some("boom"));
        assert!(BridgeResult::from(Ok(())).ok);
    }

    #[cfg(unix)]
    #[test]
    fn proxy_child_exit_status_reports_an_exited_child_once() {
        let child = std::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .spawn()
            .expect("spawn sh");
        let state = LaunchState::new(LaunchConfig::default(), PathBuf::from("config.json"));
        state.store_proxy_child(child);

        let mut status = None;
        for _ in 0..50 {
            status = state.proxy_child_exit_status();
            if status.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        assert!(status.expect("child exited").contains("exited early"));
        assert_eq!(state.proxy_child_exit_status(), None);
    }
}

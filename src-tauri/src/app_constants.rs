use std::time::Duration;

pub(crate) const APP_TITLE: &str = "BingGPT";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const WAIT_WINDOW_LABEL: &str = "proxy-wait";
pub(crate) const WAIT_WINDOW_PAGE: &str = "waiting.html";
pub(crate) const BLANK_PAGE: &str = "index.html";

pub(crate) const CONFIG_SWITCH: &str = "--config";
pub(crate) const DEFAULT_CONFIG_FILE: &str = "config.json";
pub(crate) const PREFERENCES_FILE: &str = "preferences.json";
pub(crate) const LOG_DIR_ENV: &str = "BINGGPT_LOG_DIR";
pub(crate) const LOG_DIR_NAME: &str = "BingGPT";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const PROXY_SERVER_LOG_FILE: &str = "proxy-server.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;

pub(crate) const DEFAULT_CHECKER_ADDRESS: &str = "127.0.0.1";
pub(crate) const DEFAULT_CHECKER_TIMEOUT_SECS: u32 = 60;
pub(crate) const READINESS_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub(crate) const FONT_SIZE_PUSH_DELAY: Duration = Duration::from_secs(1);

pub(crate) const DEFAULT_CONTENT_LOCALE: &str = "en-US";
pub(crate) const HOST_MESSAGE_EVENT: &str = "binggpt:host-message";

pub(crate) const FEEDBACK_URL: &str = "https://github.com/dice2o/BingGPT/issues";
pub(crate) const RELEASES_URL: &str = "https://github.com/dice2o/BingGPT/releases";

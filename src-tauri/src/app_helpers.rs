use std::sync::{Mutex, OnceLock};

use crate::{
    logging::{self, DesktopLogCategory},
    runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, LOG_BACKUP_COUNT,
};

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Startup, message);
}

pub(crate) fn append_proxy_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Proxy, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        runtime_paths::default_log_dir(),
        DESKTOP_LOG_FILE,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    )
}

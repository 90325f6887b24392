use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{CONFIG_SWITCH, DEFAULT_CONFIG_FILE, LOG_DIR_ENV, LOG_DIR_NAME};

pub fn executable_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

pub fn default_log_dir() -> Option<PathBuf> {
    if let Ok(raw) = env::var(LOG_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::data_local_dir().map(|dir| dir.join(LOG_DIR_NAME).join("logs"))
}

/// Accepts both `--config=<path>` and `--config <path>`; the last occurrence wins.
pub(crate) fn config_switch_value<I, S>(args: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix = format!("{CONFIG_SWITCH}=");
    let mut value = None;
    let mut expect_value = false;

    for arg in args {
        let arg = arg.as_ref();
        if expect_value {
            expect_value = false;
            if !arg.starts_with("--") {
                value = Some(arg.to_string());
                continue;
            }
        }

        if arg == CONFIG_SWITCH {
            expect_value = true;
        } else if let Some(raw) = arg.strip_prefix(&prefix) {
            value = Some(raw.to_string());
        }
    }

    value.filter(|raw| !raw.trim().is_empty())
}

pub(crate) fn resolve_config_path<I, S>(args: I, cwd: &Path, exe_dir: Option<&Path>) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match config_switch_value(args) {
        Some(raw) => cwd.join(raw.trim()),
        None => exe_dir
            .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_FILE)),
    }
}

pub fn resolve_process_config_path() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_path(env::args().skip(1), &cwd, executable_dir().as_deref())
}

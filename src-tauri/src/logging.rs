use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Proxy,
    Shutdown,
}

impl DesktopLogCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Proxy => "proxy",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(log_dir: Option<PathBuf>, log_file_name: &str) -> PathBuf {
    match log_dir {
        Some(dir) => dir.join(log_file_name),
        None => std::env::temp_dir().join(log_file_name),
    }
}

pub(crate) fn format_log_line(category: DesktopLogCategory, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false),
        category.as_str(),
        message
    )
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(format!(".{index}"));
    PathBuf::from(raw)
}

/// Shifts `desktop.log` to `desktop.log.1`, `.1` to `.2` and so on once the
/// file reaches `max_bytes`. The oldest backup beyond `backup_count` is dropped.
pub(crate) fn rotate_log_if_needed(
    path: &Path,
    max_bytes: u64,
    backup_count: usize,
) -> Result<(), String> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(format!(
                "Failed to read log metadata {}: {}",
                path.display(),
                error
            ))
        }
    };
    if size < max_bytes {
        return Ok(());
    }

    if backup_count == 0 {
        return fs::remove_file(path)
            .map_err(|error| format!("Failed to truncate log {}: {}", path.display(), error));
    }

    let oldest = backup_path(path, backup_count);
    if oldest.exists() {
        fs::remove_file(&oldest).map_err(|error| {
            format!("Failed to drop old log {}: {}", oldest.display(), error)
        })?;
    }
    for index in (1..backup_count).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            let to = backup_path(path, index + 1);
            fs::rename(&from, &to).map_err(|error| {
                format!(
                    "Failed to rotate log {} -> {}: {}",
                    from.display(),
                    to.display(),
                    error
                )
            })?;
        }
    }
    let first = backup_path(path, 1);
    fs::rename(path, &first).map_err(|error| {
        format!(
            "Failed to rotate log {} -> {}: {}",
            path.display(),
            first.display(),
            error
        )
    })
}

fn write_log_line(path: &Path, line: &str, max_bytes: u64, backup_count: usize) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!("Failed to create log directory {}: {}", parent.display(), error)
        })?;
    }
    rotate_log_if_needed(path, max_bytes, backup_count)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open log {}: {}", path.display(), error))?;
    writeln!(file, "{line}").map_err(|error| format!("Failed to write log {}: {}", path.display(), error))
}

pub(crate) fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    log_dir: Option<PathBuf>,
    log_file_name: &str,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(category, message);
    eprintln!("{line}");

    let path = resolve_desktop_log_path(log_dir, log_file_name);
    let lock = write_lock.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Err(error) = write_log_line(&path, &line, max_bytes, backup_count) {
        eprintln!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_line_includes_category_and_message() {
        let line = format_log_line(DesktopLogCategory::Proxy, "proxy no ready...");
        assert!(line.contains("] [proxy] proxy no ready..."));
        assert!(line.starts_with('['));
    }

    #[test]
    fn resolve_desktop_log_path_falls_back_to_temp_dir() {
        let path = resolve_desktop_log_path(None, "desktop.log");
        assert_eq!(path, std::env::temp_dir().join("desktop.log"));
    }

    #[test]
    fn append_desktop_log_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_dir = dir.path().join("nested").join("logs");
        let lock = OnceLock::new();

        append_desktop_log(
            DesktopLogCategory::Startup,
            "config file is: /tmp/config.json",
            Some(log_dir.clone()),
            "desktop.log",
            1024,
            2,
            &lock,
        );

        let written = fs::read_to_string(log_dir.join("desktop.log")).expect("log written");
        assert!(written.contains("[startup] config file is: /tmp/config.json"));
    }

    #[test]
    fn rotate_log_if_needed_shifts_backups_and_drops_the_oldest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("desktop.log");
        fs::write(&path, "current-current").expect("write current");
        fs::write(backup_path(&path, 1), "first").expect("write .1");
        fs::write(backup_path(&path, 2), "second").expect("write .2");

        rotate_log_if_needed(&path, 4, 2).expect("rotate");

        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(backup_path(&path, 1)).expect("read .1"),
            "current-current"
        );
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).expect("read .2"), "first");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn rotate_log_if_needed_keeps_small_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("desktop.log");
        fs::write(&path, "ok").expect("write");

        rotate_log_if_needed(&path, 1024, 3).expect("rotate");

        assert_eq!(fs::read_to_string(&path).expect("read"), "ok");
        assert!(!backup_path(&path, 1).exists());
    }
}

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

use crate::launch_config::ServerAppConfig;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.to_string_lossy().to_string()];
    parts.extend(plan.args.clone());
    parts
}

/// Relative executable paths are anchored at `base_dir` (the shell's working
/// directory) so the child's working directory cannot change what runs.
pub(crate) fn resolve_launch_plan(
    server_app: &ServerAppConfig,
    base_dir: &Path,
) -> Result<LaunchPlan, String> {
    let raw_cmd = server_app
        .executable()
        .ok_or_else(|| "Server app path is not configured.".to_string())?;
    let cmd = base_dir.join(raw_cmd);

    let args = shlex::split(server_app.raw_args())
        .ok_or_else(|| format!("Invalid server app args: {}", server_app.raw_args()))?;

    let cwd = match server_app.work_dir() {
        Some(work_dir) => base_dir.join(work_dir),
        None => cmd
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base_dir.to_path_buf()),
    };

    Ok(LaunchPlan { cmd, args, cwd })
}

fn open_output_log(log_path: &Path) -> Result<(Stdio, Stdio), String> {
    if let Some(log_parent) = log_path.parent() {
        fs::create_dir_all(log_parent).map_err(|error| {
            format!(
                "Failed to create proxy log directory {}: {}",
                log_parent.display(),
                error
            )
        })?;
    }
    let stdout_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open proxy log {}: {}", log_path.display(), error))?;
    let stderr_file = stdout_file
        .try_clone()
        .map_err(|error| format!("Failed to clone proxy log handle: {error}"))?;
    Ok((Stdio::from(stdout_file), Stdio::from(stderr_file)))
}

/// Starts the server app and hands back its handle. Nothing waits on the
/// child; a broken server only shows up as a readiness timeout.
pub(crate) fn spawn_server_app<F>(
    plan: &LaunchPlan,
    log_path: Option<&Path>,
    log: F,
) -> Result<Child, String>
where
    F: Fn(&str),
{
    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null());

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    match log_path.map(open_output_log) {
        Some(Ok((stdout, stderr))) => {
            command.stdout(stdout).stderr(stderr);
        }
        Some(Err(error)) => {
            log(&format!("{error}; discarding proxy output"));
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        None => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
    }

    let child = command.spawn().map_err(|error| {
        format!(
            "Failed to spawn server app with command {:?} in {}: {}",
            build_debug_command(plan),
            plan.cwd.display(),
            error
        )
    })?;
    log(&format!(
        "server app started: pid={} command={:?} cwd={}",
        child.id(),
        build_debug_command(plan),
        plan.cwd.display()
    ));
    Ok(child)
}

/// Reports whether a launched child has already exited, for diagnostics only.
pub(crate) fn poll_child_exit(child: &mut Child) -> Option<String> {
    match child.try_wait() {
        Ok(Some(status)) => Some(format!("server app exited early: {status}")),
        Ok(None) => None,
        Err(error) => Some(format!("failed to poll server app status: {error}")),
    }
}

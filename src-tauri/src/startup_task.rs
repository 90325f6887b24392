use std::{env, path::Path};

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_proxy_log, append_shutdown_log, append_startup_log,
    launch_config::ServerAppConfig,
    launch_plan::{resolve_launch_plan, spawn_server_app},
    logging, main_window,
    readiness::{ConnectProbe, ReadinessChecker, ReadinessOutcome, ReadinessTarget, TcpProbe},
    runtime_paths,
    wait_window::WaitWindow,
    LaunchState, APP_TITLE, PROXY_SERVER_LOG_FILE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartupOutcome {
    /// No checker configured; the window opens immediately.
    Skipped,
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl StartupOutcome {
    pub(crate) fn from_readiness(outcome: Option<ReadinessOutcome>) -> Self {
        match outcome {
            None => Self::Skipped,
            Some(ReadinessOutcome::Ready { attempts }) => Self::Ready { attempts },
            Some(ReadinessOutcome::TimedOut { attempts }) => Self::TimedOut { attempts },
        }
    }

    pub(crate) fn opens_main_window(self) -> bool {
        !matches!(self, Self::TimedOut { .. })
    }
}

pub(crate) fn proxy_not_ready_message(config_path: &Path) -> String {
    format!(
        "The proxy is not ready!\nPlease check the configuration file.\n({})",
        config_path.display()
    )
}

/// TCP probe that also reports, once, when the launched server app has
/// already died.
struct SupervisedProbe {
    app_handle: AppHandle,
    inner: TcpProbe,
}

impl ConnectProbe for SupervisedProbe {
    async fn probe(&mut self, target: &ReadinessTarget) -> Result<(), String> {
        if let Some(status) = self
            .app_handle
            .state::<LaunchState>()
            .proxy_child_exit_status()
        {
            append_proxy_log(&status);
        }
        self.inner.probe(target).await
    }
}

pub(crate) fn spawn_startup_task(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let outcome = run_startup(&app_handle).await;
        append_startup_log(&format!("startup finished: {outcome:?}"));
        finish_startup(&app_handle, outcome);
    });
}

async fn run_startup(app_handle: &AppHandle) -> StartupOutcome {
    let (server_app, target) = {
        let launch = app_handle.state::<LaunchState>();
        (
            launch.config.server_app().cloned(),
            launch.config.readiness_target(),
        )
    };

    if let Some(server_app) = server_app {
        launch_server_app(app_handle, &server_app);
    }

    let Some(target) = target else {
        append_startup_log("proxy checker not configured; skipping readiness check");
        return StartupOutcome::Skipped;
    };

    let mut checker = ReadinessChecker::new(target);
    append_proxy_log(&format!(
        "waiting for proxy at {} for up to {} second(s)",
        checker.target().describe(),
        checker.target().timeout_secs
    ));
    let indicator = match WaitWindow::open(app_handle) {
        Ok(window) => Some(window),
        Err(error) => {
            append_proxy_log(&error);
            None
        }
    };

    let mut probe = SupervisedProbe {
        app_handle: app_handle.clone(),
        inner: TcpProbe,
    };
    let outcome = checker.run(&mut probe, indicator, append_proxy_log).await;
    if !outcome.is_ready() {
        append_proxy_log(&format!(
            "proxy at {} still not ready after {} attempt(s)",
            checker.target().describe(),
            outcome.attempts()
        ));
    }
    StartupOutcome::from_readiness(Some(outcome))
}

fn launch_server_app(app_handle: &AppHandle, server_app: &ServerAppConfig) {
    let base_dir = match env::current_dir() {
        Ok(dir) => dir,
        Err(error) => {
            append_proxy_log(&format!("failed to read working directory: {error}"));
            return;
        }
    };

    let plan = match resolve_launch_plan(server_app, &base_dir) {
        Ok(plan) => plan,
        Err(error) => {
            append_proxy_log(&error);
            return;
        }
    };

    let output_log =
        logging::resolve_desktop_log_path(runtime_paths::default_log_dir(), PROXY_SERVER_LOG_FILE);
    match spawn_server_app(&plan, Some(&output_log), append_proxy_log) {
        Ok(child) => app_handle.state::<LaunchState>().store_proxy_child(child),
        Err(error) => append_proxy_log(&error),
    }
}

fn finish_startup(app_handle: &AppHandle, outcome: StartupOutcome) {
    if outcome.opens_main_window() {
        if let Err(error) = main_window::create_main_window(app_handle, append_startup_log) {
            append_startup_log(&error);
            main_window::exit_without_main_window(app_handle, &error);
        }
        return;
    }

    let config_path = app_handle.state::<LaunchState>().config_path.clone();
    append_startup_log(&format!(
        "proxy not ready; config file is {}",
        config_path.display()
    ));
    app_handle
        .dialog()
        .message(proxy_not_ready_message(&config_path))
        .title(APP_TITLE)
        .kind(MessageDialogKind::Error)
        .blocking_show();
    append_shutdown_log("exiting: proxy not ready");
    app_handle.exit(1);
}

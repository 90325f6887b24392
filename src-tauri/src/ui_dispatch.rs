use tauri::AppHandle;

pub(crate) fn run_on_main_thread_dispatch<F>(
    app_handle: &AppHandle,
    task_name: &str,
    task: F,
) -> Result<(), String>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let main_app = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&main_app))
        .map_err(|error| format!("Failed to dispatch '{task_name}' to main thread: {error}"))
}

/// Runs `task` on the async runtime. Window builds go through here because
/// building from a synchronous menu or command handler deadlocks on Windows.
pub(crate) fn spawn_window_task<F>(app_handle: &AppHandle, task: F)
where
    F: FnOnce(AppHandle) + Send + 'static,
{
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        task(app_handle);
    });
}

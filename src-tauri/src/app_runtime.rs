use tauri::{Manager, RunEvent};

use crate::{
    append_desktop_log, append_startup_log, context_menu_handler, exit_events,
    launch_config::LaunchConfig,
    logging, main_window,
    preferences::PreferencesStore,
    runtime_paths, startup_task, LaunchState, ShellState, DESKTOP_LOG_FILE, PREFERENCES_FILE,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(runtime_paths::default_log_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    let config_path = runtime_paths::resolve_process_config_path();
    append_startup_log(&format!("config file is: {}", config_path.display()));
    let config = LaunchConfig::load(&config_path, append_startup_log);

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second instance started; focusing the existing window");
            main_window::focus_main_window(app, append_desktop_log);
        }))
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(LaunchState::new(config, config_path))
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_export_data,
            crate::desktop_bridge_commands::desktop_bridge_get_font_size,
            crate::desktop_bridge_commands::desktop_bridge_report_error,
            crate::desktop_bridge_commands::desktop_bridge_key_chord,
            crate::desktop_bridge_commands::desktop_bridge_context_menu,
            crate::desktop_bridge_commands::desktop_bridge_open_external_url,
        ])
        .on_menu_event(|app, event| {
            context_menu_handler::handle_context_menu_event(app, event.id().as_ref())
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let preferences = match app_handle.path().app_config_dir() {
                Ok(config_dir) => {
                    let path = config_dir.join(PREFERENCES_FILE);
                    append_startup_log(&format!("preferences file is: {}", path.display()));
                    PreferencesStore::load(path, append_startup_log)
                }
                Err(error) => {
                    append_startup_log(&format!(
                        "failed to resolve app config dir, preferences kept in memory: {error}"
                    ));
                    PreferencesStore::in_memory()
                }
            };
            app_handle.manage(ShellState::new(preferences));

            startup_task::spawn_startup_task(app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows,
                ..
            } => {
                exit_events::handle_reopen(app_handle, has_visible_windows);
            }
            _ => {}
        });
}

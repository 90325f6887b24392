const DESKTOP_BRIDGE_COMMANDS: &[&str] = &[
    "desktop_bridge_export_data",
    "desktop_bridge_get_font_size",
    "desktop_bridge_report_error",
    "desktop_bridge_key_chord",
    "desktop_bridge_context_menu",
    "desktop_bridge_open_external_url",
];

fn main() {
    println!("cargo:rerun-if-changed=bridge/desktop_bridge.js");

    // Declaring the commands generates `allow-*` permissions so the remote
    // chat origin can be granted exactly these in capabilities/.
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(DESKTOP_BRIDGE_COMMANDS)),
    )
    .expect("failed to run tauri build script");
}

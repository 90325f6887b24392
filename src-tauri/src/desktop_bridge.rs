use serde::Serialize;

use crate::{
    header_policy::{forwarded_for_override, HeaderOverride},
    preferences::FontSize,
    shortcuts::{FONT_LARGER_KEY_CODE, FONT_SMALLER_KEY_CODE, SHORTCUT_KEY_CODES},
    HOST_MESSAGE_EVENT,
};

const DESKTOP_BRIDGE_TEMPLATE: &str = include_str!("../bridge/desktop_bridge.js");
const BRIDGE_CONFIG_PLACEHOLDER: &str = "__BINGGPT_BRIDGE_CONFIG__";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BridgeConfig {
    event: &'static str,
    shortcut_codes: &'static [&'static str],
    is_mac: bool,
    forwarded_for: HeaderOverride,
    /// Starting value only; the page keeps it current from `set-font-size`.
    font_size: u8,
    font_sizes: &'static [u8],
    font_larger_code: &'static str,
    font_smaller_code: &'static str,
}

impl BridgeConfig {
    fn for_current_platform(font_size: FontSize) -> Self {
        Self {
            event: HOST_MESSAGE_EVENT,
            shortcut_codes: &SHORTCUT_KEY_CODES,
            is_mac: cfg!(target_os = "macos"),
            forwarded_for: forwarded_for_override(),
            font_size: font_size.value(),
            font_sizes: &FontSize::LEGAL,
            font_larger_code: FONT_LARGER_KEY_CODE,
            font_smaller_code: FONT_SMALLER_KEY_CODE,
        }
    }
}

/// Initialization script installed into every main window.
pub(crate) fn desktop_bridge_script(font_size: FontSize) -> Result<String, String> {
    render_bridge_script(&BridgeConfig::for_current_platform(font_size))
}

fn render_bridge_script(config: &BridgeConfig) -> Result<String, String> {
    let config_json = serde_json::to_string(config)
        .map_err(|error| format!("Failed to serialize desktop bridge config: {error}"))?;
    Ok(DESKTOP_BRIDGE_TEMPLATE.replacen(BRIDGE_CONFIG_PLACEHOLDER, &config_json, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_script_embeds_its_config() {
        let script = desktop_bridge_script(FontSize::DEFAULT).expect("renders");
        assert!(!script.contains(BRIDGE_CONFIG_PLACEHOLDER));
        assert!(script.contains("\"event\":\"binggpt:host-message\""));
        assert!(script.contains("\"name\":\"x-forwarded-for\""));
        assert!(script.contains("\"KeyN\""));
    }

    #[test]
    fn bridge_script_reports_the_command_modifier_platform() {
        let config = BridgeConfig {
            is_mac: true,
            ..BridgeConfig::for_current_platform(FontSize::DEFAULT)
        };
        let script = render_bridge_script(&config).expect("renders");
        assert!(script.contains("\"isMac\":true"));
    }

    #[test]
    fn bridge_script_carries_the_font_size_range_for_zoom_fallthrough() {
        let size = FontSize::new(20).expect("legal size");
        let script = desktop_bridge_script(size).expect("renders");
        assert!(script.contains("\"fontSize\":20"));
        assert!(script.contains("\"fontSizes\":[14,16,18,20]"));
        assert!(script.contains("\"fontLargerCode\":\"Equal\""));
        assert!(script.contains("\"fontSmallerCode\":\"Minus\""));
        assert!(script.contains("fontChordApplies(event.code)"));
    }

    #[test]
    fn bridge_script_leaves_the_clipboard_to_the_host() {
        let script = desktop_bridge_script(FontSize::DEFAULT).expect("renders");
        assert!(!script.contains("navigator.clipboard"));
        assert!(!script.contains("desktop_bridge_clipboard_text"));
    }

    #[test]
    fn bridge_script_invokes_every_registered_command() {
        let script = desktop_bridge_script(FontSize::DEFAULT).expect("renders");
        for command in [
            "desktop_bridge_export_data",
            "desktop_bridge_get_font_size",
            "desktop_bridge_report_error",
            "desktop_bridge_key_chord",
            "desktop_bridge_context_menu",
            "desktop_bridge_open_external_url",
        ] {
            assert!(script.contains(command), "{command} is never invoked");
        }
    }
}

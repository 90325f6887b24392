use crate::{
    export::ExportFormat,
    preferences::{FontSize, Theme},
};

pub(crate) const CONTEXT_MENU_RELOAD: &str = "ctx_reload";
pub(crate) const CONTEXT_MENU_RELOAD_DEFAULT_URL: &str = "ctx_reload_default_url";
pub(crate) const CONTEXT_MENU_ALWAYS_ON_TOP: &str = "ctx_always_on_top";
pub(crate) const CONTEXT_MENU_RESET: &str = "ctx_reset";
pub(crate) const CONTEXT_MENU_FEEDBACK: &str = "ctx_feedback";
pub(crate) const CONTEXT_MENU_RELEASES: &str = "ctx_releases";
pub(crate) const CONTEXT_MENU_OPEN_CONFIG: &str = "ctx_open_config";
pub(crate) const CONTEXT_MENU_SHOW_URL: &str = "ctx_show_url";
pub(crate) const CONTEXT_MENU_LOAD_URL: &str = "ctx_load_url";

const EXPORT_PREFIX: &str = "ctx_export_";
const THEME_PREFIX: &str = "ctx_theme_";
const FONT_SIZE_PREFIX: &str = "ctx_font_size_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextMenuAction {
    Reload,
    ReloadDefaultUrl,
    Export(ExportFormat),
    ToggleAlwaysOnTop,
    SetTheme(Theme),
    SetFontSize(FontSize),
    Reset,
    OpenFeedback,
    OpenReleases,
    OpenConfigFile,
    ShowCurrentUrl,
    LoadUrlFromClipboard,
}

impl ContextMenuAction {
    pub(crate) fn menu_id(self) -> String {
        match self {
            Self::Reload => CONTEXT_MENU_RELOAD.to_string(),
            Self::ReloadDefaultUrl => CONTEXT_MENU_RELOAD_DEFAULT_URL.to_string(),
            Self::Export(format) => format!("{EXPORT_PREFIX}{}", format.extension()),
            Self::ToggleAlwaysOnTop => CONTEXT_MENU_ALWAYS_ON_TOP.to_string(),
            Self::SetTheme(theme) => format!("{THEME_PREFIX}{}", theme.as_str()),
            Self::SetFontSize(size) => format!("{FONT_SIZE_PREFIX}{}", size.value()),
            Self::Reset => CONTEXT_MENU_RESET.to_string(),
            Self::OpenFeedback => CONTEXT_MENU_FEEDBACK.to_string(),
            Self::OpenReleases => CONTEXT_MENU_RELEASES.to_string(),
            Self::OpenConfigFile => CONTEXT_MENU_OPEN_CONFIG.to_string(),
            Self::ShowCurrentUrl => CONTEXT_MENU_SHOW_URL.to_string(),
            Self::LoadUrlFromClipboard => CONTEXT_MENU_LOAD_URL.to_string(),
        }
    }
}

pub(crate) fn action_from_menu_id(menu_id: &str) -> Option<ContextMenuAction> {
    match menu_id {
        CONTEXT_MENU_RELOAD => return Some(ContextMenuAction::Reload),
        CONTEXT_MENU_RELOAD_DEFAULT_URL => return Some(ContextMenuAction::ReloadDefaultUrl),
        CONTEXT_MENU_ALWAYS_ON_TOP => return Some(ContextMenuAction::ToggleAlwaysOnTop),
        CONTEXT_MENU_RESET => return Some(ContextMenuAction::Reset),
        CONTEXT_MENU_FEEDBACK => return Some(ContextMenuAction::OpenFeedback),
        CONTEXT_MENU_RELEASES => return Some(ContextMenuAction::OpenReleases),
        CONTEXT_MENU_OPEN_CONFIG => return Some(ContextMenuAction::OpenConfigFile),
        CONTEXT_MENU_SHOW_URL => return Some(ContextMenuAction::ShowCurrentUrl),
        CONTEXT_MENU_LOAD_URL => return Some(ContextMenuAction::LoadUrlFromClipboard),
        _ => {}
    }

    if let Some(raw) = menu_id.strip_prefix(EXPORT_PREFIX) {
        return ExportFormat::parse(raw).map(ContextMenuAction::Export);
    }
    if let Some(raw) = menu_id.strip_prefix(THEME_PREFIX) {
        return Theme::parse(raw).map(ContextMenuAction::SetTheme);
    }
    if let Some(raw) = menu_id.strip_prefix(FONT_SIZE_PREFIX) {
        return raw
            .parse::<u8>()
            .ok()
            .and_then(FontSize::new)
            .map(ContextMenuAction::SetFontSize);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_from_menu_id_maps_fixed_items() {
        assert_eq!(
            action_from_menu_id(CONTEXT_MENU_RELOAD),
            Some(ContextMenuAction::Reload)
        );
        assert_eq!(
            action_from_menu_id(CONTEXT_MENU_RESET),
            Some(ContextMenuAction::Reset)
        );
        assert_eq!(
            action_from_menu_id(CONTEXT_MENU_LOAD_URL),
            Some(ContextMenuAction::LoadUrlFromClipboard)
        );
    }

    #[test]
    fn action_from_menu_id_decodes_parameterized_items() {
        assert_eq!(
            action_from_menu_id("ctx_export_pdf"),
            Some(ContextMenuAction::Export(ExportFormat::Pdf))
        );
        assert_eq!(
            action_from_menu_id("ctx_theme_dark"),
            Some(ContextMenuAction::SetTheme(Theme::Dark))
        );
        assert_eq!(
            action_from_menu_id("ctx_font_size_18"),
            FontSize::new(18).map(ContextMenuAction::SetFontSize)
        );
    }

    #[test]
    fn action_from_menu_id_rejects_illegal_parameters() {
        assert_eq!(action_from_menu_id("ctx_export_docx"), None);
        assert_eq!(action_from_menu_id("ctx_theme_sepia"), None);
        assert_eq!(action_from_menu_id("ctx_font_size_15"), None);
        assert_eq!(action_from_menu_id("unknown-menu"), None);
    }

    #[test]
    fn menu_ids_identify_their_action() {
        let actions = ExportFormat::ALL
            .into_iter()
            .map(ContextMenuAction::Export)
            .chain(Theme::ALL.into_iter().map(ContextMenuAction::SetTheme))
            .chain(
                FontSize::LEGAL
                    .into_iter()
                    .filter_map(FontSize::new)
                    .map(ContextMenuAction::SetFontSize),
            );
        for action in actions {
            assert_eq!(action_from_menu_id(&action.menu_id()), Some(action));
        }
    }
}

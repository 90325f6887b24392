use tauri::{
    menu::{CheckMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Manager, Wry,
};

use crate::{
    context_actions::ContextMenuAction,
    export::ExportFormat,
    preferences::{FontSize, Preferences, Theme},
    ShellState, APP_TITLE,
};

/// Right clicks on selected text keep the webview's native menu.
pub(crate) fn should_show_context_menu(selection_text: &str) -> bool {
    selection_text.trim().is_empty()
}

pub(crate) fn version_label(version: &str) -> String {
    format!("{APP_TITLE} v{version}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Item(ContextMenuAction, &'static str),
    Export,
    AlwaysOnTop,
    Appearance,
    Releases,
    Separator,
}

const CONTEXT_MENU_LAYOUT: [MenuEntry; 17] = [
    MenuEntry::Item(ContextMenuAction::Reload, "Reload"),
    MenuEntry::Item(ContextMenuAction::ReloadDefaultUrl, "Reload the default URL"),
    MenuEntry::Separator,
    MenuEntry::Export,
    MenuEntry::Separator,
    MenuEntry::AlwaysOnTop,
    MenuEntry::Separator,
    MenuEntry::Appearance,
    MenuEntry::Separator,
    MenuEntry::Item(ContextMenuAction::Reset, "Reset"),
    MenuEntry::Separator,
    MenuEntry::Item(ContextMenuAction::OpenFeedback, "Feedback"),
    MenuEntry::Releases,
    MenuEntry::Separator,
    MenuEntry::Item(ContextMenuAction::OpenConfigFile, "Configuration File..."),
    MenuEntry::Item(ContextMenuAction::ShowCurrentUrl, "Show and Copy the current URL"),
    MenuEntry::Item(ContextMenuAction::LoadUrlFromClipboard, "Load a URL from the clipboard"),
];

fn menu_item(
    app_handle: &AppHandle,
    action: ContextMenuAction,
    label: &str,
) -> Result<MenuItem<Wry>, String> {
    MenuItem::with_id(app_handle, action.menu_id(), label, true, None::<&str>)
        .map_err(|error| format!("Failed to create context menu item '{label}': {error}"))
}

fn check_item(
    app_handle: &AppHandle,
    action: ContextMenuAction,
    label: &str,
    checked: bool,
) -> Result<CheckMenuItem<Wry>, String> {
    CheckMenuItem::with_id(app_handle, action.menu_id(), label, true, checked, None::<&str>)
        .map_err(|error| format!("Failed to create context menu item '{label}': {error}"))
}

fn separator(app_handle: &AppHandle) -> Result<PredefinedMenuItem<Wry>, String> {
    PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create context menu separator: {error}"))
}

fn submenu(
    app_handle: &AppHandle,
    label: &str,
    items: &[&dyn IsMenuItem<Wry>],
) -> Result<Submenu<Wry>, String> {
    Submenu::with_items(app_handle, label, true, items)
        .map_err(|error| format!("Failed to create '{label}' submenu: {error}"))
}

fn export_submenu(app_handle: &AppHandle) -> Result<Submenu<Wry>, String> {
    let items = ExportFormat::ALL
        .into_iter()
        .map(|format| menu_item(app_handle, ContextMenuAction::Export(format), format.menu_label()))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&dyn IsMenuItem<Wry>> = items
        .iter()
        .map(|item| item as &dyn IsMenuItem<Wry>)
        .collect();
    submenu(app_handle, "Export", &refs)
}

fn appearance_submenu(
    app_handle: &AppHandle,
    preferences: Preferences,
) -> Result<Submenu<Wry>, String> {
    let theme_items = Theme::ALL
        .into_iter()
        .map(|theme| {
            check_item(
                app_handle,
                ContextMenuAction::SetTheme(theme),
                theme.menu_label(),
                preferences.theme == theme,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let theme_refs: Vec<&dyn IsMenuItem<Wry>> = theme_items
        .iter()
        .map(|item| item as &dyn IsMenuItem<Wry>)
        .collect();
    let theme = submenu(app_handle, "Theme", &theme_refs)?;

    let font_items = FontSize::LEGAL
        .into_iter()
        .filter_map(FontSize::new)
        .map(|size| {
            check_item(
                app_handle,
                ContextMenuAction::SetFontSize(size),
                size.menu_label(),
                preferences.font_size == size,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let font_refs: Vec<&dyn IsMenuItem<Wry>> = font_items
        .iter()
        .map(|item| item as &dyn IsMenuItem<Wry>)
        .collect();
    let font_size = submenu(app_handle, "Font Size", &font_refs)?;

    submenu(app_handle, "Appearance", &[&theme, &font_size])
}

pub(crate) fn build_context_menu(
    app_handle: &AppHandle,
    preferences: Preferences,
) -> Result<Menu<Wry>, String> {
    let mut items: Vec<Box<dyn IsMenuItem<Wry>>> = Vec::with_capacity(CONTEXT_MENU_LAYOUT.len());
    for entry in CONTEXT_MENU_LAYOUT {
        let item: Box<dyn IsMenuItem<Wry>> = match entry {
            MenuEntry::Item(action, label) => Box::new(menu_item(app_handle, action, label)?),
            MenuEntry::Export => Box::new(export_submenu(app_handle)?),
            MenuEntry::AlwaysOnTop => Box::new(check_item(
                app_handle,
                ContextMenuAction::ToggleAlwaysOnTop,
                "Always on Top",
                preferences.always_on_top,
            )?),
            MenuEntry::Appearance => Box::new(appearance_submenu(app_handle, preferences)?),
            MenuEntry::Releases => Box::new(menu_item(
                app_handle,
                ContextMenuAction::OpenReleases,
                &version_label(&app_handle.package_info().version.to_string()),
            )?),
            MenuEntry::Separator => Box::new(separator(app_handle)?),
        };
        items.push(item);
    }
    let item_refs: Vec<&dyn IsMenuItem<Wry>> = items.iter().map(|item| item.as_ref()).collect();

    Menu::with_items(app_handle, &item_refs)
        .map_err(|error| format!("Failed to build context menu: {error}"))
}

pub(crate) fn show_context_menu<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let Some(window) = state.main_window(app_handle) else {
        log("context menu skipped: main window not found");
        return;
    };

    let menu = match build_context_menu(app_handle, state.preferences()) {
        Ok(menu) => menu,
        Err(error) => {
            log(&error);
            return;
        }
    };

    if let Err(error) = window.popup_menu(&menu) {
        log(&format!("failed to show context menu: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_menu_is_shown_only_without_a_selection() {
        assert!(should_show_context_menu(""));
        assert!(should_show_context_menu("  \n"));
        assert!(!should_show_context_menu("copy me"));
    }

    #[test]
    fn export_always_on_top_and_appearance_are_separated() {
        let position = |wanted: MenuEntry| {
            CONTEXT_MENU_LAYOUT
                .iter()
                .position(|entry| *entry == wanted)
                .expect("entry present")
        };
        let export = position(MenuEntry::Export);
        let always_on_top = position(MenuEntry::AlwaysOnTop);
        let appearance = position(MenuEntry::Appearance);

        assert_eq!(always_on_top, export + 2);
        assert_eq!(appearance, always_on_top + 2);
        assert_eq!(CONTEXT_MENU_LAYOUT[export + 1], MenuEntry::Separator);
        assert_eq!(CONTEXT_MENU_LAYOUT[always_on_top + 1], MenuEntry::Separator);
    }

    #[test]
    fn layout_never_starts_ends_or_doubles_a_separator() {
        assert_ne!(CONTEXT_MENU_LAYOUT[0], MenuEntry::Separator);
        assert_ne!(CONTEXT_MENU_LAYOUT[CONTEXT_MENU_LAYOUT.len() - 1], MenuEntry::Separator);
        for pair in CONTEXT_MENU_LAYOUT.windows(2) {
            assert!(!(pair[0] == MenuEntry::Separator && pair[1] == MenuEntry::Separator));
        }
    }

    #[test]
    fn version_label_names_the_app() {
        assert_eq!(version_label("0.3.2"), "BingGPT v0.3.2");
    }
}

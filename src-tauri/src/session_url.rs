use url::Url;

use crate::preferences::Theme;

const CHAT_QUERY_ENDPOINT: &str = "https://edgeservices.bing.com/edgediscover/query";
const LOGIN_REDIRECT_ENDPOINT: &str = "https://edgeservices.bing.com/edgesvc/urlredirect";

pub(crate) const DARK_BACKGROUND: (u8, u8, u8) = (0x2b, 0x2b, 0x2b);
pub(crate) const LIGHT_BACKGROUND: (u8, u8, u8) = (0xf3, 0xf3, 0xf3);

/// The page loaded into every new main window. The query string is passed
/// through as-is (including the leading `&` and trailing comma) because the
/// endpoint is sensitive to its exact shape.
pub(crate) fn initial_url(is_dark_mode: bool, locale: &str) -> Result<Url, String> {
    let scheme = if is_dark_mode { "dark" } else { "light" };
    let raw = format!(
        "{CHAT_QUERY_ENDPOINT}?&{scheme}schemeovr=1&FORM=SHORUN&udscs=1&udsnav=1&setlang={locale}&features=udssydinternal&clientscopes=windowheader,coauthor,chat,&udsframed=1"
    );
    Url::parse(&raw).map_err(|error| format!("Invalid chat URL {raw}: {error}"))
}

/// Any navigation mentioning the sign-in completion endpoint counts, wherever
/// it appears in the URL.
pub(crate) fn is_login_redirect(url: &Url) -> bool {
    url.as_str().contains(LOGIN_REDIRECT_ENDPOINT)
}

pub(crate) fn resolve_dark_mode(theme: Theme, os_prefers_dark: bool) -> bool {
    match theme {
        Theme::System => os_prefers_dark,
        Theme::Light => false,
        Theme::Dark => true,
    }
}

pub(crate) fn window_theme_override(theme: Theme) -> Option<tauri::Theme> {
    match theme {
        Theme::System => None,
        Theme::Light => Some(tauri::Theme::Light),
        Theme::Dark => Some(tauri::Theme::Dark),
    }
}

pub(crate) fn background_rgb(is_dark_mode: bool) -> (u8, u8, u8) {
    if is_dark_mode {
        DARK_BACKGROUND
    } else {
        LIGHT_BACKGROUND
    }
}

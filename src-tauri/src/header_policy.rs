use serde::Serialize;

/// Every request from the main window identifies as Edge on macOS.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36 Edg/112.0.0.0";

pub(crate) const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub(crate) const FORWARDED_FOR_PLACEHOLDER: &str = "1.1.1.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct HeaderOverride {
    pub(crate) name: &'static str,
    pub(crate) value: &'static str,
}

/// Added by the bridge to requests the page issues itself; the initial page
/// load is a navigation and never passes through it.
pub(crate) fn forwarded_for_override() -> HeaderOverride {
    HeaderOverride {
        name: FORWARDED_FOR_HEADER,
        value: FORWARDED_FOR_PLACEHOLDER,
    }
}

use crate::content_message::{ContentMessage, ToneDirection};

pub(crate) const FONT_LARGER_KEY_CODE: &str = "Equal";
pub(crate) const FONT_SMALLER_KEY_CODE: &str = "Minus";

/// Key codes the bridge intercepts when pressed with the platform command
/// modifier (Cmd on macOS, Ctrl elsewhere).
pub(crate) const SHORTCUT_KEY_CODES: [&str; 19] = [
    "KeyN", "KeyR", "KeyT", "KeyI", "KeyS", "Equal", "Minus", "Comma", "Period", "Digit0",
    "Digit1", "Digit2", "Digit3", "Digit4", "Digit5", "Digit6", "Digit7", "Digit8", "Digit9",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShortcutAction {
    NewTopic,
    Reload,
    ToggleAlwaysOnTop,
    FocusInput,
    StopResponding,
    FontLarger,
    FontSmaller,
    SwitchTone(ToneDirection),
    QuickReply(u8),
}

impl ShortcutAction {
    /// The page message this chord forwards, for chords that only relay to
    /// the page.
    pub(crate) fn content_message(self) -> Option<ContentMessage> {
        match self {
            Self::NewTopic => Some(ContentMessage::NewTopic),
            Self::FocusInput => Some(ContentMessage::FocusOnTextarea),
            Self::StopResponding => Some(ContentMessage::StopResponding),
            Self::SwitchTone(direction) => Some(ContentMessage::SwitchTone(direction)),
            Self::QuickReply(index) => Some(ContentMessage::QuickReply(index)),
            Self::Reload | Self::ToggleAlwaysOnTop | Self::FontLarger | Self::FontSmaller => None,
        }
    }
}

pub(crate) fn action_for_key_code(code: &str) -> Option<ShortcutAction> {
    match code {
        "KeyN" => Some(ShortcutAction::NewTopic),
        "KeyR" => Some(ShortcutAction::Reload),
        "KeyT" => Some(ShortcutAction::ToggleAlwaysOnTop),
        "KeyI" => Some(ShortcutAction::FocusInput),
        "KeyS" => Some(ShortcutAction::StopResponding),
        FONT_LARGER_KEY_CODE => Some(ShortcutAction::FontLarger),
        FONT_SMALLER_KEY_CODE => Some(ShortcutAction::FontSmaller),
        "Comma" => Some(ShortcutAction::SwitchTone(ToneDirection::Left)),
        "Period" => Some(ShortcutAction::SwitchTone(ToneDirection::Right)),
        _ => {
            let digit = code.strip_prefix("Digit")?;
            match digit.as_bytes() {
                [d @ b'0'..=b'9'] => Some(ShortcutAction::QuickReply(d - b'0')),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_intercepted_key_code_maps_to_an_action() {
        for code in SHORTCUT_KEY_CODES {
            assert!(action_for_key_code(code).is_some(), "{code} has no action");
        }
    }

    #[test]
    fn digit_codes_map_to_quick_reply_indices() {
        assert_eq!(action_for_key_code("Digit0"), Some(ShortcutAction::QuickReply(0)));
        assert_eq!(action_for_key_code("Digit7"), Some(ShortcutAction::QuickReply(7)));
        assert_eq!(action_for_key_code("Digit10"), None);
        assert_eq!(action_for_key_code("Digit"), None);
    }

    #[test]
    fn tone_keys_switch_left_and_right() {
        assert_eq!(
            action_for_key_code("Comma"),
            Some(ShortcutAction::SwitchTone(ToneDirection::Left))
        );
        assert_eq!(
            action_for_key_code("Period"),
            Some(ShortcutAction::SwitchTone(ToneDirection::Right))
        );
    }

    #[test]
    fn unknown_codes_are_ignored() {
        assert_eq!(action_for_key_code("KeyQ"), None);
        assert_eq!(action_for_key_code(""), None);
    }

    #[test]
    fn host_side_actions_do_not_forward_to_the_page() {
        assert_eq!(ShortcutAction::Reload.content_message(), None);
        assert_eq!(ShortcutAction::FontLarger.content_message(), None);
        assert_eq!(
            ShortcutAction::QuickReply(2).content_message(),
            Some(ContentMessage::QuickReply(2))
        );
    }
}
